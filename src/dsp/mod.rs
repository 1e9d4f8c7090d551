//! Fixed-point signal primitives used by the voice pool.
//!
//! Nothing here allocates after construction or touches floating point on the
//! per-sample path, so all of it can run inside the audio callback.

/// Timed attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Sums shaped wavetable lookups into output samples.
pub mod mixer;
/// Band-limited single-cycle tables for every instrument timbre.
pub mod wavetable;

pub use envelope::EnvelopeState;
pub use mixer::Mixer;
pub use wavetable::{Waveform, WavetableBank};
