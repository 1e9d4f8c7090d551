//! Benchmarks for the wavetable mixer.
//!
//! The interesting number is a full pool: every voice sounding, which is the
//! worst case the audio callback has to survive.

use std::hint::black_box;

use chordbox::{
    dsp::{mixer::Mixer, wavetable::WavetableBank, Waveform},
    synth::{Instrument, Voice},
    SAMPLE_RATE, VOICE_COUNT,
};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

// Long sustain so voices stay up for most of a measurement
const HELD: Instrument = Instrument {
    name: "held",
    waveform: Waveform::Piano,
    attack_ms: 10,
    decay_ms: 10,
    sustain_level: 0xAFFF,
    sustain_ms: u16::MAX,
    release_ms: 100,
    master_level: 10_000,
};

fn pool(sounding: usize) -> Vec<Voice> {
    (0..VOICE_COUNT)
        .map(|i| {
            let mut voice = Voice::new(&HELD, SAMPLE_RATE);
            if i < sounding {
                voice.start(36 + 5 * i as u8, 0);
            }
            voice
        })
        .collect()
}

fn keep_sounding(voices: &mut [Voice], sounding: usize) {
    for voice in voices.iter_mut().take(sounding) {
        if !voice.is_active() {
            let note = voice.note();
            voice.start(note, 0);
        }
    }
}

pub fn bench_mixer(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mixer");
    let bank = WavetableBank::new(SAMPLE_RATE);
    let mixer = Mixer::new(SAMPLE_RATE, u16::MAX, VOICE_COUNT);

    for &size in BLOCK_SIZES {
        let mut out = vec![0i16; size];

        // Idle pool: phases still advance
        let mut voices = pool(0);
        group.bench_with_input(BenchmarkId::new("silent", size), &size, |b, _| {
            b.iter(|| mixer.render(black_box(&mut voices), &bank, black_box(&mut out)))
        });

        // A typical chord plus bass
        let mut voices = pool(5);
        group.bench_with_input(BenchmarkId::new("chord", size), &size, |b, _| {
            b.iter(|| {
                keep_sounding(&mut voices, 5);
                mixer.render(black_box(&mut voices), &bank, black_box(&mut out))
            })
        });

        // Every voice sounding
        let mut voices = pool(VOICE_COUNT);
        group.bench_with_input(BenchmarkId::new("full_pool", size), &size, |b, _| {
            b.iter(|| {
                keep_sounding(&mut voices, VOICE_COUNT);
                mixer.render(black_box(&mut voices), &bank, black_box(&mut out))
            })
        });
    }

    group.bench_function("wavetable_bank_build", |b| {
        b.iter(|| WavetableBank::new(black_box(SAMPLE_RATE)))
    });

    group.finish();
}
