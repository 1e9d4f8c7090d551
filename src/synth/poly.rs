use crate::{
    dsp::{mixer::Mixer, wavetable::WavetableBank},
    error::Error,
    synth::{instrument::Instrument, message::SynthMessage, voice::Voice},
};

/// Running totals of what the pool had to give up.
///
/// The pool runs inside the audio callback and never logs; the host reads
/// these and reports changes from its own thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Sounding (not releasing) voices cut off to make room.
    pub stolen: u64,
    /// Note-ons lost to an empty pool.
    pub dropped: u64,
}

/// Fixed pool of voices driven by note events.
///
/// Lives entirely in the audio context: nothing here allocates after
/// construction.
pub struct VoicePool {
    voices: Vec<Voice>,
    instrument: usize,
    frame_counter: u64,
    stats: PoolStats,
}

impl VoicePool {
    /// All voices start silent with instrument 0 loaded.
    pub fn new(voice_count: usize, sample_rate: u32) -> Self {
        let instrument = Instrument::default();
        let voices = (0..voice_count)
            .map(|_| Voice::new(&instrument, sample_rate))
            .collect();

        Self {
            voices,
            instrument: 0,
            frame_counter: 0,
            stats: PoolStats::default(),
        }
    }

    /// Sound `note`, returning the index of the voice that plays it.
    ///
    /// A note that is still sounding is retriggered on its own voice rather
    /// than doubled. `None` only for an empty pool.
    pub fn note_on(&mut self, note: u8) -> Option<usize> {
        let age = self.frame_counter;

        if let Some(idx) = self.find_voice(note) {
            self.voices[idx].retrigger(age);
            return Some(idx);
        }

        match self.allocate_voice() {
            Some(idx) => {
                self.voices[idx].start(note, age);
                Some(idx)
            }
            None => {
                self.stats.dropped += 1;
                None
            }
        }
    }

    /// Release every voice sounding `note`. Unknown notes are ignored.
    pub fn note_off(&mut self, note: u8) {
        for voice in self
            .voices
            .iter_mut()
            .filter(|v| v.is_active() && v.note() == note)
        {
            voice.release();
        }
    }

    /// Silence every voice immediately.
    pub fn all_off(&mut self) {
        for voice in &mut self.voices {
            voice.off();
        }
    }

    /// Release every sounding voice.
    pub fn release_all(&mut self) {
        for voice in &mut self.voices {
            voice.release();
        }
    }

    /// Copy an instrument's timbre into every voice. Running phases and
    /// envelope stages are left alone.
    pub fn load_instrument(&mut self, index: usize) -> Result<(), Error> {
        let instrument = Instrument::get(index).ok_or(Error::UnknownInstrument(index))?;
        for voice in &mut self.voices {
            voice.load(instrument);
        }
        self.instrument = index;
        Ok(())
    }

    /// Apply one control message. A program change naming an unknown
    /// instrument still silences the pool, then keeps the old timbre.
    pub fn apply(&mut self, msg: SynthMessage) -> Result<(), Error> {
        match msg {
            SynthMessage::NoteOn { note } => {
                self.note_on(note);
            }
            SynthMessage::NoteOff { note } => self.note_off(note),
            SynthMessage::ProgramChange { program } => {
                self.all_off();
                self.load_instrument(usize::from(program))?;
            }
            SynthMessage::AllNotesOff => self.release_all(),
        }
        Ok(())
    }

    /// One mixed output sample.
    #[inline]
    pub fn next_sample(&mut self, mixer: &Mixer, bank: &WavetableBank) -> i16 {
        let sample = mixer.generate_sample(&mut self.voices, bank);
        self.frame_counter += 1;
        sample
    }

    pub fn render(&mut self, mixer: &Mixer, bank: &WavetableBank, out: &mut [i16]) {
        mixer.render(&mut self.voices, bank, out);
        self.frame_counter += out.len() as u64;
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn is_playing(&self) -> bool {
        self.voices.iter().any(Voice::is_active)
    }

    pub fn instrument(&self) -> usize {
        self.instrument
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    fn allocate_voice(&mut self) -> Option<usize> {
        // First pass: silent voice
        if let Some(idx) = self.voices.iter().position(|v| !v.is_active()) {
            return Some(idx);
        }

        // Second pass: steal the oldest releasing voice
        let releasing = self
            .voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_releasing())
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| idx);
        if releasing.is_some() {
            return releasing;
        }

        // Last resort: cut off the oldest held note
        let oldest = self
            .voices
            .iter()
            .enumerate()
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| idx);
        if oldest.is_some() {
            self.stats.stolen += 1;
        }
        oldest
    }

    fn find_voice(&self, note: u8) -> Option<usize> {
        self.voices
            .iter()
            .position(|v| v.is_active() && v.note() == note)
    }
}
