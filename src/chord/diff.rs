//! Note-set differencing between two chord snapshots.
//!
//! Lists are tiny (a chord resolves to at most a dozen notes), so a plain
//! membership scan beats anything cleverer. Results keep the order of the
//! first argument.

use crate::MAX_NOTES;

/// Fixed-capacity, allocation-free list of MIDI note numbers.
pub type NoteList = heapless::Vec<u8, MAX_NOTES>;

/// Outcome of comparing the current chord against the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDiff {
    /// Notes sounding in both chords: left untouched.
    pub held: NoteList,
    /// Notes new in the current chord: note-on.
    pub to_activate: NoteList,
    /// Notes gone from the current chord: note-off.
    pub to_deactivate: NoteList,
}

/// Elements of `a` that also appear in `b`, in `a`'s order.
pub fn intersection(a: &NoteList, b: &NoteList) -> NoteList {
    a.iter().copied().filter(|note| b.contains(note)).collect()
}

/// Elements of `a` that do not appear in `b`, in `a`'s order.
pub fn difference(a: &NoteList, b: &NoteList) -> NoteList {
    a.iter().copied().filter(|note| !b.contains(note)).collect()
}

/// Compare `current` against `previous`.
pub fn diff(current: &NoteList, previous: &NoteList) -> NoteDiff {
    NoteDiff {
        held: intersection(current, previous),
        to_activate: difference(current, previous),
        to_deactivate: difference(previous, current),
    }
}

impl NoteDiff {
    pub fn is_unchanged(&self) -> bool {
        self.to_activate.is_empty() && self.to_deactivate.is_empty()
    }
}
