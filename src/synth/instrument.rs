//! Static instrument table.
//!
//! Each row is the complete timbre of one program number: which wavetable to
//! read, the envelope timings, and the per-voice output level. Levels stay well
//! below full scale so a full chord plus bass does not clip after mixing.

use crate::dsp::wavetable::Waveform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instrument {
    pub name: &'static str,
    pub waveform: Waveform,
    pub attack_ms: u16,
    pub decay_ms: u16,
    /// Level held during sustain, 16-bit full scale.
    pub sustain_level: u16,
    /// How long the sustain lasts before the release starts on its own.
    pub sustain_ms: u16,
    pub release_ms: u16,
    /// Per-voice output level, 16-bit full scale.
    pub master_level: u16,
}

/// 0xAFFF is roughly 70% of full scale.
const SUSTAIN_70: u16 = 0xAFFF;

const fn instrument(
    name: &'static str,
    waveform: Waveform,
    attack_ms: u16,
    decay_ms: u16,
    sustain_ms: u16,
    release_ms: u16,
    master_level: u16,
) -> Instrument {
    Instrument {
        name,
        waveform,
        attack_ms,
        decay_ms,
        sustain_level: SUSTAIN_70,
        sustain_ms,
        release_ms,
        master_level,
    }
}

pub const INSTRUMENTS: [Instrument; 11] = [
    instrument("piano", Waveform::Piano, 30, 20, 2000, 1000, 10_000),
    instrument("piano 2", Waveform::Piano2, 30, 20, 2000, 1000, 10_000),
    instrument("reed", Waveform::Reed, 30, 20, 2000, 1000, 10_000),
    instrument("guitar", Waveform::Guitar, 10, 10, 1000, 500, 10_000),
    instrument("plucked guitar", Waveform::PluckedGuitar, 10, 10, 1000, 500, 10_000),
    instrument("bass", Waveform::Square, 10, 10, 1000, 500, 5_000),
    instrument("violin", Waveform::Violin, 50, 200, 500, 5000, 10_000),
    instrument("horn", Waveform::Horn, 120, 50, 2000, 100, 10_000),
    instrument("oboe", Waveform::Oboe, 120, 50, 2000, 100, 10_000),
    instrument("clarinet", Waveform::Clarinet, 120, 50, 2000, 100, 10_000),
    instrument("flute", Waveform::Flute, 120, 50, 2000, 100, 10_000),
];

impl Instrument {
    /// Look up a program number.
    pub fn get(index: usize) -> Option<&'static Instrument> {
        INSTRUMENTS.get(index)
    }

    pub fn count() -> usize {
        INSTRUMENTS.len()
    }
}

impl Default for Instrument {
    fn default() -> Self {
        INSTRUMENTS[0]
    }
}
