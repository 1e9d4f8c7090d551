use crate::{io::midi::MidiEvent, synth::message::SynthMessage};

/// Equal-tempered frequency of every MIDI note, rounded to the nearest hertz (A4 = 440 Hz).
pub const NOTE_FREQUENCIES: [u16; 128] = [
    8, 9, 9, 10, 10, 11, 12, 12, 13, 14, 15, 15, 16, 17, 18, 19, //
    21, 22, 23, 24, 26, 28, 29, 31, 33, 35, 37, 39, 41, 44, 46, 49, //
    52, 55, 58, 62, 65, 69, 73, 78, 82, 87, 92, 98, 104, 110, 117, 123, //
    131, 139, 147, 156, 165, 175, 185, 196, 208, 220, 233, 247, 262, 277, 294, 311, //
    330, 349, 370, 392, 415, 440, 466, 494, 523, 554, 587, 622, 659, 698, 740, 784, //
    831, 880, 932, 988, 1047, 1109, 1175, 1245, 1319, 1397, 1480, 1568, 1661, 1760, 1865, 1976, //
    2093, 2217, 2349, 2489, 2637, 2794, 2960, 3136, 3322, 3520, 3729, 3951, 4186, 4435, 4699, 4978, //
    5274, 5588, 5920, 6272, 6645, 7040, 7459, 7902, 8372, 8870, 9397, 9956, 10548, 11175, 11840, 12544,
];

/// Translate a decoded MIDI event into a synth control message.
///
/// Events on other channels are ignored. A note-on with velocity zero is a
/// note-off by MIDI convention.
pub fn midi_to_synth(midi: MidiEvent, channel_filter: u8) -> Option<SynthMessage> {
    match midi {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity: 0,
        } if channel == channel_filter => Some(SynthMessage::NoteOff { note: key }),
        MidiEvent::NoteOn { channel, key, .. } if channel == channel_filter => {
            Some(SynthMessage::NoteOn { note: key })
        }
        MidiEvent::NoteOff { channel, key, .. } if channel == channel_filter => {
            Some(SynthMessage::NoteOff { note: key })
        }
        MidiEvent::ProgramChange { channel, program } if channel == channel_filter => {
            Some(SynthMessage::ProgramChange { program })
        }
        _ => None,
    }
}

/// Integer frequency of a MIDI note as used by the wavetable oscillators.
#[inline]
pub fn note_frequency(note: u8) -> u16 {
    NOTE_FREQUENCIES[usize::from(note & 0x7F)]
}

pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_equal_temperament() {
        for note in 0..=127u8 {
            let exact = midi_note_to_freq(note);
            assert!((f32::from(note_frequency(note)) - exact).abs() <= 0.5 + exact * 1e-5);
        }
        assert_eq!(note_frequency(69), 440);
        assert_eq!(note_frequency(60), 262);
    }

    #[test]
    fn zero_velocity_note_on_releases() {
        let event = MidiEvent::NoteOn {
            channel: 0,
            key: 64,
            velocity: 0,
        };
        assert_eq!(midi_to_synth(event, 0), Some(SynthMessage::NoteOff { note: 64 }));
    }

    #[test]
    fn other_channels_are_filtered() {
        let event = MidiEvent::NoteOn {
            channel: 3,
            key: 64,
            velocity: 100,
        };
        assert_eq!(midi_to_synth(event, 0), None);
    }

    #[test]
    fn program_change_passes_through() {
        let event = MidiEvent::program_change(9);
        assert_eq!(midi_to_synth(event, 0), Some(SynthMessage::ProgramChange { program: 9 }));
    }
}
