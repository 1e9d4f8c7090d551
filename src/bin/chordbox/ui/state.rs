//! Data sent from the audio callback to the UI
//!
//! Everything here is Copy and fixed-size so the callback can build it without
//! allocating.

use chordbox::{dsp::EnvelopeState, engine::EngineStats, synth::Voice, VOICE_COUNT};

/// What one voice is doing, as seen at the end of an audio buffer.
#[derive(Clone, Copy, Debug)]
pub struct VoiceView {
    pub note: u8,
    pub state: EnvelopeState,
    /// Envelope level (0.0-1.0)
    pub level: f32,
}

impl Default for VoiceView {
    fn default() -> Self {
        Self {
            note: 0,
            state: EnvelopeState::Off,
            level: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct VoiceSnapshot {
    pub voices: [VoiceView; VOICE_COUNT],
    /// Engine counters at the end of the buffer
    pub stats: EngineStats,
}

impl VoiceSnapshot {
    pub fn capture(voices: &[Voice], stats: EngineStats) -> Self {
        let mut snapshot = Self {
            stats,
            ..Self::default()
        };
        for (view, voice) in snapshot.voices.iter_mut().zip(voices) {
            *view = VoiceView {
                note: voice.note(),
                state: voice.state(),
                level: voice.envelope().level(),
            };
        }
        snapshot
    }

    pub fn active(&self) -> usize {
        self.voices
            .iter()
            .filter(|v| v.state != EnvelopeState::Off)
            .count()
    }
}

const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Scientific pitch name, middle C = C4.
pub fn note_name(note: u8) -> String {
    let octave = i32::from(note / 12) - 1;
    format!("{}{}", NOTE_NAMES[usize::from(note % 12)], octave)
}

/// Name of a chord root or bass, 1 = C.
pub fn pitch_class_name(pc: u8) -> &'static str {
    match pc {
        1..=12 => NOTE_NAMES[usize::from(pc - 1)],
        _ => "-",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(69), "A4");
        assert_eq!(note_name(0), "C-1");
        assert_eq!(pitch_class_name(3), "D");
        assert_eq!(pitch_class_name(0), "-");
    }
}
