use crate::{
    config::EngineConfig,
    dsp::{mixer::Mixer, wavetable::WavetableBank},
    engine::queue::EventReceiver,
    error::Error,
    io::{converter::midi_to_synth, midi::DEFAULT_CHANNEL},
    synth::{poly::VoicePool, voice::Voice},
};

/// Counters the audio context keeps instead of logging.
///
/// Plain `Copy` data, cheap to hand back to the host through a ring buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Held notes cut off because every voice was busy.
    pub stolen_voices: u64,
    /// Note-ons lost to an empty voice pool.
    pub dropped_notes: u64,
    /// Program changes naming an instrument outside the table.
    pub rejected_programs: u64,
    /// Packets that did not decode to a supported message.
    pub rejected_packets: u64,
}

/// The audio-rendering context.
///
/// Owns every voice outright. The only way in is the event queue, drained at
/// the start of each buffer, so nothing here takes a lock. Nothing here logs
/// either: problems are counted in [`EngineStats`].
pub struct AudioEngine {
    pool: VoicePool,
    bank: WavetableBank,
    mixer: Mixer,
    rx: EventReceiver,
    rejected_programs: u64,
    rejected_packets: u64,
}

impl AudioEngine {
    /// Builds the wavetables, so call it before the audio callback starts.
    pub fn new(config: &EngineConfig, rx: EventReceiver) -> Result<Self, Error> {
        config.validate()?;

        let mut pool = VoicePool::new(config.voice_count, config.sample_rate);
        pool.all_off();
        pool.load_instrument(0)?;

        Ok(Self {
            pool,
            bank: WavetableBank::new(config.sample_rate),
            mixer: Mixer::new(config.sample_rate, config.master_volume, config.voice_count),
            rx,
            rejected_programs: 0,
            rejected_packets: 0,
        })
    }

    /// Apply every queued event. An empty queue is a no-op.
    pub fn process_events(&mut self) {
        while let Some(packet) = self.rx.recv() {
            let Ok(event) = packet.decode() else {
                self.rejected_packets += 1;
                continue;
            };

            if let Some(msg) = midi_to_synth(event, DEFAULT_CHANNEL) {
                if self.pool.apply(msg).is_err() {
                    self.rejected_programs += 1;
                }
            }
        }
    }

    /// One output sample. Does not look at the queue.
    #[inline]
    pub fn next_sample(&mut self) -> i16 {
        self.pool.next_sample(&self.mixer, &self.bank)
    }

    /// Drain the queue once, then fill `out`.
    pub fn render(&mut self, out: &mut [i16]) {
        self.process_events();
        self.pool.render(&self.mixer, &self.bank, out);
    }

    /// Like [`render`](Self::render), scaled to `-1.0..=1.0` for float output devices.
    pub fn render_f32(&mut self, out: &mut [f32]) {
        self.process_events();
        for sample in out.iter_mut() {
            *sample = f32::from(self.pool.next_sample(&self.mixer, &self.bank)) / 32768.0;
        }
    }

    /// Whether anything audible can come out right now.
    pub fn is_playing(&self) -> bool {
        self.mixer.master_volume() != 0
            && self
                .pool
                .voices()
                .iter()
                .any(|v| v.is_active() && v.volume() > 0)
    }

    pub fn set_master_volume(&mut self, master_volume: u16) {
        self.mixer.set_master_volume(master_volume);
    }

    pub fn voices(&self) -> &[Voice] {
        self.pool.voices()
    }

    pub fn instrument(&self) -> usize {
        self.pool.instrument()
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    pub fn stats(&self) -> EngineStats {
        let pool = self.pool.stats();
        EngineStats {
            stolen_voices: pool.stolen,
            dropped_notes: pool.dropped,
            rejected_programs: self.rejected_programs,
            rejected_packets: self.rejected_packets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dsp::envelope::EnvelopeState,
        engine::queue::{event_queue, EventSender},
        io::midi::{MidiEvent, UsbMidiPacket},
    };

    fn engine() -> (EventSender, AudioEngine) {
        let config = EngineConfig::default();
        let (tx, rx) = event_queue(config.queue_capacity);
        let engine = AudioEngine::new(&config, rx).unwrap();
        (tx, engine)
    }

    #[test]
    fn starts_silent_on_instrument_zero() {
        let (_tx, mut engine) = engine();
        assert!(!engine.is_playing());
        assert_eq!(engine.instrument(), 0);
        assert_eq!(engine.next_sample(), 0);
    }

    #[test]
    fn note_on_and_off_through_the_queue() {
        let (mut tx, mut engine) = engine();
        tx.send(MidiEvent::note_on(60).to_packet(0)).unwrap();
        engine.process_events();
        assert!(engine.is_playing());
        assert_eq!(engine.pool().active_voice_count(), 1);

        tx.send(MidiEvent::note_off(60).to_packet(0)).unwrap();
        engine.process_events();
        assert_eq!(engine.voices()[0].state(), EnvelopeState::Release);
    }

    #[test]
    fn zero_velocity_note_on_releases() {
        let (mut tx, mut engine) = engine();
        tx.send(MidiEvent::note_on(60).to_packet(0)).unwrap();
        let silent_on = MidiEvent::NoteOn {
            channel: 0,
            key: 60,
            velocity: 0,
        };
        tx.send(silent_on.to_packet(0)).unwrap();
        engine.process_events();

        assert_eq!(engine.voices()[0].state(), EnvelopeState::Release);
    }

    #[test]
    fn program_change_cuts_and_switches() {
        let (mut tx, mut engine) = engine();
        tx.send(MidiEvent::note_on(60).to_packet(0)).unwrap();
        tx.send(MidiEvent::program_change(5).to_packet(0)).unwrap();
        engine.process_events();

        assert!(!engine.is_playing());
        assert_eq!(engine.instrument(), 5);
    }

    #[test]
    fn unknown_program_keeps_current_instrument() {
        let (mut tx, mut engine) = engine();
        tx.send(MidiEvent::program_change(3).to_packet(0)).unwrap();
        tx.send(MidiEvent::program_change(99).to_packet(0)).unwrap();
        engine.process_events();
        assert_eq!(engine.instrument(), 3);
        assert_eq!(engine.stats().rejected_programs, 1);
    }

    #[test]
    fn malformed_packets_are_skipped() {
        let (mut tx, mut engine) = engine();
        tx.send(UsbMidiPacket::from_bytes([0x0B, 0xB0, 7, 100])).unwrap();
        tx.send(MidiEvent::note_on(64).to_packet(0)).unwrap();
        engine.process_events();
        assert_eq!(engine.pool().active_voice_count(), 1);
        assert_eq!(engine.stats().rejected_packets, 1);
    }

    #[test]
    fn saturated_pool_is_counted() {
        let config = EngineConfig::default().with_voice_count(2);
        let (mut tx, rx) = event_queue(config.queue_capacity);
        let mut engine = AudioEngine::new(&config, rx).unwrap();

        tx.send(MidiEvent::program_change(3).to_packet(0)).unwrap();
        for note in [60, 62, 64] {
            tx.send(MidiEvent::note_on(note).to_packet(0)).unwrap();
        }
        engine.render(&mut [0i16; 64]);

        assert_eq!(engine.instrument(), 3);
        assert_eq!(
            engine.stats(),
            EngineStats {
                stolen_voices: 1,
                ..EngineStats::default()
            }
        );
    }

    #[test]
    fn render_drains_then_sounds() {
        let (mut tx, mut engine) = engine();
        tx.send(MidiEvent::note_on(57).to_packet(0)).unwrap();

        let mut out = [0i16; 512];
        engine.render(&mut out);
        assert!(out.iter().any(|&s| s != 0));
    }

    #[test]
    fn muted_master_is_not_playing() {
        let (mut tx, mut engine) = engine();
        tx.send(MidiEvent::note_on(60).to_packet(0)).unwrap();
        engine.process_events();
        engine.set_master_volume(0);
        assert!(!engine.is_playing());
    }
}
