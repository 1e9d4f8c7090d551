//! Integer wavetable mixer.

/*
Wavetable Mixing
================

Every output sample, each voice contributes one table lookup shaped by its
envelope and volume, and the contributions are summed into one 16-bit sample.

Phase
-----

Each voice carries a phase accumulator with 8 fractional bits:

    phase_offset   16 bits total, wraps every 256 << 8
    table index    phase_offset >> 8

    increment      ((frequency × 256) << 8) / sample_rate

The accumulator advances for every voice on every sample, sounding or not.

Per-Voice Scaling
-----------------

    s = table[index]                  signed 16-bit
    s = (s × (envelope >> 8)) >> 16   envelope is 24-bit, keep its top 16
    s = (s × volume) >> 16            instrument level, 16-bit

Summing
-------

    out = (Σ s × master_volume) >> shift
    shift = 16 + ceil(log2(voice_count))

The extra log2 term gives every voice its share of the 16-bit range: with 16
voices all at full scale the sum still fits. Partial sums are carried in 64
bits and the final value saturates to the i16 range, so an unexpectedly loud
instrument table clips instead of wrapping around.
*/

use crate::{
    dsp::wavetable::{band_for_note, WavetableBank},
    synth::voice::Voice,
    WAVETABLE_LEN,
};

/// Fractional bits in a voice's phase accumulator.
pub const PHASE_FRACTION_BITS: u32 = 8;
/// Phase accumulators wrap at one full table.
pub const PHASE_MASK: u32 = ((WAVETABLE_LEN as u32) << PHASE_FRACTION_BITS) - 1;

/// Right shift applied to the summed voices.
pub fn mix_shift(voice_count: usize) -> u32 {
    16 + voice_count.max(1).next_power_of_two().trailing_zeros()
}

#[derive(Debug, Clone, Copy)]
pub struct Mixer {
    sample_rate: u32,
    master_volume: u16,
    shift: u32,
}

impl Mixer {
    pub fn new(sample_rate: u32, master_volume: u16, voice_count: usize) -> Self {
        Self {
            sample_rate,
            master_volume,
            shift: mix_shift(voice_count),
        }
    }

    pub fn master_volume(&self) -> u16 {
        self.master_volume
    }

    pub fn set_master_volume(&mut self, master_volume: u16) {
        self.master_volume = master_volume;
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// Produce one output sample, advancing every voice by one sample.
    pub fn generate_sample(&self, voices: &mut [Voice], bank: &WavetableBank) -> i16 {
        let mut sum: i64 = 0;

        for voice in voices.iter_mut() {
            voice.advance_phase(self.sample_rate);
            if !voice.is_active() {
                continue;
            }

            voice.envelope_mut().tick();
            if voice.frequency() == 0 {
                continue;
            }

            let position = (voice.phase_offset() >> PHASE_FRACTION_BITS) as u8;
            let raw = i64::from(bank.sample(voice.waveform(), band_for_note(voice.note()), position));

            let shaped = (raw * i64::from(voice.envelope().value() >> 8)) >> 16;
            sum += (shaped * i64::from(voice.volume())) >> 16;
        }

        let out = (sum * i64::from(self.master_volume)) >> self.shift;
        out.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16
    }

    /// Fill `out` with consecutive samples.
    pub fn render(&self, voices: &mut [Voice], bank: &WavetableBank, out: &mut [i16]) {
        for sample in out.iter_mut() {
            *sample = self.generate_sample(voices, bank);
        }
    }
}
