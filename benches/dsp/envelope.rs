//! Benchmarks for the fixed-point ADSR envelope.

use std::hint::black_box;

use chordbox::dsp::envelope::{AdsrParams, Envelope};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: u32 = 44_100;

fn params(attack_ms: u16, release_ms: u16) -> AdsrParams {
    AdsrParams {
        attack_ms,
        decay_ms: 20,
        sustain_level: 0xAFFF,
        sustain_ms: 60_000,
        release_ms,
    }
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        // Attack phase (ramping up, never finishes)
        let mut env = Envelope::new(params(60_000, 100), SAMPLE_RATE);
        env.trigger_attack();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, &n| {
            b.iter(|| {
                for _ in 0..n {
                    env.tick();
                }
                black_box(env.value())
            })
        });

        // Sustain phase (holding steady)
        let mut env = Envelope::new(params(1, 100), SAMPLE_RATE);
        env.trigger_attack();
        for _ in 0..2_000 {
            env.tick();
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, &n| {
            b.iter(|| {
                for _ in 0..n {
                    env.tick();
                }
                black_box(env.value())
            })
        });

        // Retrigger from release, the O(1) catch-up path
        let mut env = Envelope::new(params(500, 60_000), SAMPLE_RATE);
        env.trigger_attack();
        for _ in 0..5_000 {
            env.tick();
        }
        env.trigger_release();
        group.bench_with_input(BenchmarkId::new("retrigger", size), &size, |b, _| {
            b.iter(|| {
                env.retrigger_attack();
                env.trigger_release();
                black_box(env.frames_in_phase())
            })
        });
    }

    group.finish();
}
