// Purpose: Voice management, polyphony, instrument timbres
// This layer sits above the dsp primitives and owns every sounding note

pub mod instrument;
pub mod message;
pub mod poly;
pub mod voice;

pub use instrument::{Instrument, INSTRUMENTS};
pub use message::SynthMessage;
pub use poly::{PoolStats, VoicePool};
pub use voice::Voice;
