#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{io::converter::midi_note_to_freq, WAVETABLE_LEN};

/*
Wavetable Bank
==============

One cycle of each waveform is stored as 256 signed 16-bit samples. Playing a
note just walks through the table at a rate proportional to its frequency.

Band Limiting
-------------

A table that sounds rich at C1 aliases badly at C7: harmonics above half the
sample rate fold back as inharmonic noise. Each waveform therefore has 8
tables, one per register band, and each band only contains the harmonics that
stay below Nyquist for the HIGHEST note of that band:

    band   notes      top note    harmonics at 44.1kHz
      0    0..=35       B1 (62Hz)      64 (capped)
      1   36..=47       B2            64
      2   48..=59       B3            64
      3   60..=71       B4            44
      4   72..=83       B5            22
      5   84..=95       B6            11
      6   96..=107      B7             5
      7  108..=127      G9             1

Low notes get full-bodied tables, high notes get progressively simpler ones.

Timbres
-------

The acoustic-sounding waveforms are additive approximations: each is a
harmonic amplitude profile (how loud harmonic n is relative to the
fundamental). Noise is a fixed pseudo-random table, identical in every band.
*/

/// Number of register bands per waveform.
pub const BAND_COUNT: usize = 8;
/// Upper bound on additive harmonics per table.
pub const MAX_HARMONICS: u32 = 64;
/// Highest note of each band.
const BAND_TOP_NOTE: [u8; BAND_COUNT] = [35, 47, 59, 71, 83, 95, 107, 127];

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
    Saw,
    Square,
    Noise,
    Piano,
    Piano2,
    Reed,
    Guitar,
    PluckedGuitar,
    Violin,
    Horn,
    Oboe,
    Clarinet,
    Flute,
}

impl Waveform {
    pub const ALL: [Waveform; 15] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Saw,
        Waveform::Square,
        Waveform::Noise,
        Waveform::Piano,
        Waveform::Piano2,
        Waveform::Reed,
        Waveform::Guitar,
        Waveform::PluckedGuitar,
        Waveform::Violin,
        Waveform::Horn,
        Waveform::Oboe,
        Waveform::Clarinet,
        Waveform::Flute,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Relative amplitude of harmonic `n` (1 = fundamental).
    fn harmonic(self, n: u32) -> f32 {
        let nf = n as f32;
        let odd = n % 2 == 1;
        match self {
            Waveform::Sine => {
                if n == 1 {
                    1.0
                } else {
                    0.0
                }
            }
            Waveform::Triangle => {
                if !odd {
                    0.0
                } else if (n / 2) % 2 == 0 {
                    1.0 / (nf * nf)
                } else {
                    -1.0 / (nf * nf)
                }
            }
            Waveform::Saw => {
                if odd {
                    1.0 / nf
                } else {
                    -1.0 / nf
                }
            }
            Waveform::Square => {
                if odd {
                    1.0 / nf
                } else {
                    0.0
                }
            }
            Waveform::Noise => 0.0,
            Waveform::Piano => (-0.35 * (nf - 1.0)).exp(),
            Waveform::Piano2 => (-0.2 * (nf - 1.0)).exp() / nf.sqrt(),
            Waveform::Reed => {
                if odd {
                    1.0 / nf
                } else {
                    0.3 / nf
                }
            }
            // plucked a fifth of the way along the string: every fifth harmonic vanishes
            Waveform::Guitar => (std::f32::consts::PI * nf / 5.0).sin().abs() / nf,
            Waveform::PluckedGuitar => (std::f32::consts::PI * nf / 8.0).sin().abs() / nf.powf(1.2),
            Waveform::Violin => {
                let formant = if (3..=6).contains(&n) { 1.6 } else { 1.0 };
                formant / nf
            }
            Waveform::Horn => (-0.5 * (nf - 1.0)).exp(),
            Waveform::Oboe => match n {
                1 => 0.4,
                2 => 1.0,
                3 => 0.9,
                4 => 0.6,
                _ => 1.0 / nf,
            },
            Waveform::Clarinet => {
                if odd {
                    1.0 / nf.powf(0.8)
                } else {
                    0.05 / nf
                }
            }
            Waveform::Flute => match n {
                1 => 1.0,
                2 => 0.2,
                3 => 0.05,
                _ => 0.0,
            },
        }
    }
}

/// Register band used to play `note`.
#[inline]
pub fn band_for_note(note: u8) -> usize {
    if note < 36 {
        0
    } else {
        (usize::from(note - 24) / 12).min(BAND_COUNT - 1)
    }
}

type Table = [i16; WAVETABLE_LEN];

/// All waveforms, all bands, generated once at startup and read-only afterwards.
pub struct WavetableBank {
    tables: Vec<[Table; BAND_COUNT]>,
}

impl WavetableBank {
    pub fn new(sample_rate: u32) -> Self {
        let nyquist = sample_rate as f32 / 2.0;
        let tables = Waveform::ALL
            .iter()
            .map(|&waveform| {
                let mut bands = [[0i16; WAVETABLE_LEN]; BAND_COUNT];
                if waveform == Waveform::Noise {
                    let noise = noise_table();
                    bands.iter_mut().for_each(|band| *band = noise);
                } else {
                    for (band, table) in bands.iter_mut().enumerate() {
                        let top = midi_note_to_freq(BAND_TOP_NOTE[band]);
                        let harmonics = ((nyquist / top) as u32).clamp(1, MAX_HARMONICS);
                        *table = additive_table(waveform, harmonics);
                    }
                }
                bands
            })
            .collect();

        Self { tables }
    }

    /// One table entry. `position` is the integer table index.
    #[inline]
    pub fn sample(&self, waveform: Waveform, band: usize, position: u8) -> i16 {
        self.tables[waveform.index()][band][usize::from(position)]
    }

    pub fn table(&self, waveform: Waveform, band: usize) -> &[i16; WAVETABLE_LEN] {
        &self.tables[waveform.index()][band]
    }
}

fn additive_table(waveform: Waveform, harmonics: u32) -> Table {
    let mut cycle = [0.0f32; WAVETABLE_LEN];
    for n in 1..=harmonics {
        let amplitude = waveform.harmonic(n);
        if amplitude == 0.0 {
            continue;
        }
        for (i, sample) in cycle.iter_mut().enumerate() {
            let phase = std::f32::consts::TAU * n as f32 * i as f32 / WAVETABLE_LEN as f32;
            *sample += amplitude * phase.sin();
        }
    }

    let peak = cycle.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    let scale = if peak > 0.0 { i16::MAX as f32 / peak } else { 0.0 };

    let mut table = [0i16; WAVETABLE_LEN];
    for (out, &x) in table.iter_mut().zip(cycle.iter()) {
        *out = (x * scale).round() as i16;
    }
    table
}

fn noise_table() -> Table {
    let mut state: u32 = 0x32B7_1700;
    let mut table = [0i16; WAVETABLE_LEN];
    for out in table.iter_mut() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        *out = (state >> 16) as u16 as i16;
    }
    table
}
