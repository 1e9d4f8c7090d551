/*
Voicing
=======

A voicing is an anchor MIDI note. The anchor defines a 12-semitone window

    [anchor mod 12, anchor mod 12 + 11]   (pitch classes, possibly past 11)

transposed to the anchor's octave `12 * floor(anchor / 12)`. Every chord tone is
folded into the window and then lifted into that octave, so a whole chord always
spans less than an octave and moving the anchor by one semitone moves exactly
one tone by an octave.

    anchor = 64 (E4)     window = 4..=15 -> notes 64..=75

    C  (0)  -> 12 -> 72
    E  (4)  ->  4 -> 64
    G  (7)  ->  7 -> 67

The bass uses its own anchor and the same procedure, which keeps it in an
independent register below (or above) the chord body.

A final clamp keeps the result inside the MIDI range by whole octaves. Anchors
are first clamped to -12..=127, so any i32 is accepted and the octave loops run
at most twice.
*/

use crate::chord::{diff::NoteList, model::Chord};

/// Highest MIDI note number.
pub const MIDI_NOTE_MAX: i32 = 127;
/// Lowest anchor that still places notes: one octave below MIDI note 0.
const ANCHOR_MIN: i32 = -12;

/// Both octave anchors used to place a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voicing {
    pub chord: i32,
    pub bass: i32,
}

impl Voicing {
    pub const fn new(chord: i32, bass: i32) -> Self {
        Self { chord, bass }
    }

    pub fn resolve(&self, chord: &Chord) -> NoteList {
        resolve(chord, self.chord, self.bass)
    }
}

/// Fold a pitch (semitones above C) into the window of `anchor` and return the MIDI note.
pub fn place(pitch: i32, anchor: i32) -> u8 {
    let anchor = anchor.clamp(ANCHOR_MIN, MIDI_NOTE_MAX);
    let start = anchor.rem_euclid(12);
    let octave = anchor.div_euclid(12) * 12;

    let mut note = start + (pitch.rem_euclid(12) - start).rem_euclid(12) + octave;

    while note > MIDI_NOTE_MAX {
        note -= 12;
    }
    while note < 0 {
        note += 12;
    }
    note as u8
}

/// Concrete notes of `chord`: body tones highest bitmap bit first, bass last.
pub fn resolve(chord: &Chord, voicing: i32, voicing_bass: i32) -> NoteList {
    let mut notes = NoteList::new();
    if chord.is_empty() {
        return notes;
    }

    let root = i32::from(chord.root()) - 1;
    for offset in chord.offsets() {
        // at most ten degrees can be set, well under capacity
        let _ = notes.push(place(root + i32::from(offset), voicing));
    }

    if chord.bass() != 0 {
        let _ = notes.push(place(i32::from(chord.bass()) - 1, voicing_bass));
    }

    notes
}
