// Purpose: turn pressed keys into concrete notes and note changes
// Everything here runs in the input-processing context

pub mod diff;
pub mod model;
pub mod voicing;

pub use diff::{diff, NoteDiff, NoteList};
pub use model::Chord;
pub use voicing::{resolve, Voicing};
