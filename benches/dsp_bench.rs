//! Benchmarks for the per-sample path and the input cycle.
//!
//! Run with: cargo bench
//!
//! The audio callback must fill its buffer well inside the buffer's duration.
//!
//! Reference timing at 44.1kHz sample rate:
//!   - 64 samples  = 1.45ms deadline
//!   - 128 samples = 2.90ms deadline
//!   - 256 samples = 5.80ms deadline
//!   - 512 samples = 11.61ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Envelope ticking and the wavetable mixer
//!   - scenarios/*  Full engine buffers and controller chord changes

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    // Per-sample primitives
    dsp::bench_envelope,
    dsp::bench_mixer,
    // Whole contexts
    scenarios::bench_engine,
    scenarios::bench_chords,
);
criterion_main!(benches);
