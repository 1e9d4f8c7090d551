//! Runtime configuration for the two execution contexts.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::Error, MASTER_VOLUME, SAMPLE_RATE, VOICE_COUNT};

/// Highest anchor either voicing may take: one octave below the top of the MIDI range.
pub const VOICING_MAX: i32 = 127 - 12;

/// Settings for the audio-rendering context.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Number of synthesis voices in the pool.
    pub voice_count: usize,
    /// Master volume applied after all voices are summed.
    pub master_volume: u16,
    /// Capacity of the cross-context event queue, in packets.
    pub queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            voice_count: VOICE_COUNT,
            master_volume: MASTER_VOLUME,
            queue_capacity: 64,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_voice_count(mut self, voice_count: usize) -> Self {
        self.voice_count = voice_count;
        self
    }

    pub fn with_master_volume(mut self, master_volume: u16) -> Self {
        self.master_volume = master_volume;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidConfig("sample rate must be non-zero"));
        }
        if self.voice_count == 0 {
            return Err(Error::InvalidConfig("voice pool must hold at least one voice"));
        }
        if self.queue_capacity == 0 {
            return Err(Error::InvalidConfig("event queue capacity must be non-zero"));
        }
        Ok(())
    }
}

/// Settings for the input-processing context.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Nominal period between two input polling cycles.
    pub poll_period: Duration,
    /// Initial anchor note for the chord body.
    pub voicing: i32,
    /// Initial anchor note for the bass, -1 to start with the bass disabled.
    pub voicing_bass: i32,
    /// USB-MIDI cable number stamped on outgoing packets.
    pub cable: u8,
    /// Semitones moved per encoder detent.
    pub encoder_step: i32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_period: Duration::from_millis(20),
            voicing: 60,
            voicing_bass: 36,
            cable: 0,
            encoder_step: 1,
        }
    }
}

impl ControllerConfig {
    pub fn with_poll_period(mut self, poll_period: Duration) -> Self {
        self.poll_period = poll_period;
        self
    }

    pub fn with_voicing(mut self, voicing: i32, voicing_bass: i32) -> Self {
        self.voicing = voicing;
        self.voicing_bass = voicing_bass;
        self
    }

    pub fn with_cable(mut self, cable: u8) -> Self {
        self.cable = cable;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(0..=VOICING_MAX).contains(&self.voicing) {
            return Err(Error::InvalidConfig("chord voicing out of range"));
        }
        if !(-1..=VOICING_MAX).contains(&self.voicing_bass) {
            return Err(Error::InvalidConfig("bass voicing out of range"));
        }
        if self.cable > 0x0F {
            return Err(Error::InvalidConfig("cable number must fit in four bits"));
        }
        if self.encoder_step <= 0 {
            return Err(Error::InvalidConfig("encoder step must be positive"));
        }
        Ok(())
    }
}
