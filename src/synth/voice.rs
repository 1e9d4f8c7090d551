use crate::{
    dsp::{
        envelope::{AdsrParams, Envelope, EnvelopeState},
        mixer::{PHASE_FRACTION_BITS, PHASE_MASK},
        wavetable::Waveform,
    },
    io::converter::note_frequency,
    synth::instrument::Instrument,
    WAVETABLE_LEN,
};

/// A single synthesis voice: one wavetable oscillator shaped by one envelope.
#[derive(Debug, Clone)]
pub struct Voice {
    note: u8,
    frequency: u16,
    volume: u16,
    waveform: Waveform,
    phase_offset: u32,
    envelope: Envelope,
    age: u64,
}

impl Voice {
    pub fn new(instrument: &Instrument, sample_rate: u32) -> Self {
        Self {
            note: 0,
            frequency: 0,
            volume: instrument.master_level,
            waveform: instrument.waveform,
            phase_offset: 0,
            envelope: Envelope::new(AdsrParams::from(instrument), sample_rate),
            age: 0,
        }
    }

    /// Take on a new timbre. Whatever is sounding keeps its envelope stage.
    pub fn load(&mut self, instrument: &Instrument) {
        self.waveform = instrument.waveform;
        self.volume = instrument.master_level;
        self.envelope.set_params(AdsrParams::from(instrument));
    }

    /// Assign `note` and start its attack from silence.
    pub fn start(&mut self, note: u8, age: u64) {
        self.note = note;
        self.frequency = note_frequency(note);
        self.phase_offset = 0;
        self.age = age;
        self.envelope.trigger_attack();
    }

    /// Restart the attack of the note already sounding, from its current level.
    pub fn retrigger(&mut self, age: u64) {
        self.age = age;
        self.envelope.retrigger_attack();
    }

    /// Enter release unless the voice is already silent or releasing.
    pub fn release(&mut self) {
        if matches!(self.state(), EnvelopeState::Off | EnvelopeState::Release) {
            return;
        }
        self.envelope.trigger_release();
    }

    pub fn off(&mut self) {
        self.envelope.off();
    }

    /// Move the oscillator one sample forward.
    #[inline]
    pub fn advance_phase(&mut self, sample_rate: u32) {
        let increment =
            ((u32::from(self.frequency) * WAVETABLE_LEN as u32) << PHASE_FRACTION_BITS) / sample_rate;
        self.phase_offset = (self.phase_offset + increment) & PHASE_MASK;
    }

    pub fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    pub fn is_releasing(&self) -> bool {
        self.state() == EnvelopeState::Release
    }

    pub fn state(&self) -> EnvelopeState {
        self.envelope.state()
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn frequency(&self) -> u16 {
        self.frequency
    }

    pub fn volume(&self) -> u16 {
        self.volume
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn phase_offset(&self) -> u32 {
        self.phase_offset
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_silent() {
        let voice = Voice::new(&Instrument::default(), 44_100);
        assert!(!voice.is_active());
        assert_eq!(voice.state(), EnvelopeState::Off);
    }

    #[test]
    fn start_assigns_pitch() {
        let mut voice = Voice::new(&Instrument::default(), 44_100);
        voice.start(69, 0);
        assert_eq!(voice.note(), 69);
        assert_eq!(voice.frequency(), 440);
        assert_eq!(voice.state(), EnvelopeState::Attack);
    }

    #[test]
    fn phase_wraps_inside_the_table() {
        let mut voice = Voice::new(&Instrument::default(), 44_100);
        voice.start(127, 0);
        for _ in 0..10_000 {
            voice.advance_phase(44_100);
            assert!(voice.phase_offset() <= PHASE_MASK);
        }
    }

    #[test]
    fn a4_completes_a_cycle_in_about_a_hundred_samples() {
        let mut voice = Voice::new(&Instrument::default(), 44_100);
        voice.start(69, 0);

        // 440 Hz at 44.1 kHz: one table cycle every ~100.2 samples
        let mut wraps = 0;
        let mut last = voice.phase_offset();
        for _ in 0..44_100 {
            voice.advance_phase(44_100);
            if voice.phase_offset() < last {
                wraps += 1;
            }
            last = voice.phase_offset();
        }
        assert!((438..=441).contains(&wraps), "{wraps} cycles");
    }

    #[test]
    fn release_is_idempotent() {
        let mut voice = Voice::new(&Instrument::default(), 44_100);
        voice.release();
        assert_eq!(voice.state(), EnvelopeState::Off);

        voice.start(60, 0);
        voice.release();
        let frames = voice.envelope().frames_target_in_phase();
        voice.release();
        assert!(voice.is_releasing());
        assert_eq!(voice.envelope().frames_target_in_phase(), frames);
    }
}
