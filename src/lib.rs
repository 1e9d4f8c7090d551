pub mod chord; // Chord model, voicing and note-set diffing
pub mod config;
pub mod dsp;
pub mod engine; // Input and audio execution contexts
pub mod error;
pub mod io;
pub mod surface; // Keypad layout and control dispatch
pub mod synth; // Voice management and polyphony

pub use config::{ControllerConfig, EngineConfig};
pub use error::{Error, Result};

/// Default output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44_100;
/// Default size of the synthesis voice pool.
pub const VOICE_COUNT: usize = 16;
/// Samples per wavetable cycle.
pub const WAVETABLE_LEN: usize = 256;
/// Capacity of a note list: root, nine alterations and the bass fit with room to spare.
pub const MAX_NOTES: usize = 16;
/// Full-scale master volume.
pub const MASTER_VOLUME: u16 = 0xFFFF;
