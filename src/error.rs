use thiserror::Error;

use crate::io::midi::UsbMidiPacket;

/// Errors surfaced by the controller and audio engine.
///
/// Expected conditions on the realtime path (invalid chord roots, exhausted
/// voice pool) are not errors; they are reported through return values or
/// silently absorbed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("event queue full, dropped packet {packet:?}")]
    QueueFull { packet: UsbMidiPacket },

    #[error("no instrument at index {0}")]
    UnknownInstrument(usize),

    #[error("unsupported USB-MIDI packet {0:#010x}")]
    UnsupportedPacket(u32),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
