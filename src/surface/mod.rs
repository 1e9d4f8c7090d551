// Purpose: Front panel as the core sees it
// Keypad snapshots in, chord and instrument out; encoder and buttons move the voicing

pub mod controls;
pub mod keypad;

pub use controls::{ControlAction, ControlRegistry, InputEvent, InputId, VoicingControl};
pub use keypad::{Key, KeyboardSnapshot, Modifier};
