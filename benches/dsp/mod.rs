//! Benchmarks for per-sample primitives.

mod envelope;
mod mixer;

pub use envelope::bench_envelope;
pub use mixer::bench_mixer;
