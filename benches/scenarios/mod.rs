//! Whole-context benchmarks.
//!
//! These drive the audio engine and the controller the way the host binary
//! does: packets through the queue, buffers out of the engine.

mod chords;
mod engine;

pub use chords::bench_chords;
pub use engine::bench_engine;
