//! Computer keyboard -> keypad mapping
//!
//! Chromatic keys sit on the home row like a piano (a w s e d f t g y h u j),
//! modifiers on the number row, instrument switches on the bottom row.

use chordbox::surface::{Key, Modifier};

const CHROMATIC: [char; 12] = ['a', 'w', 's', 'e', 'd', 'f', 't', 'g', 'y', 'h', 'u', 'j'];
const MODIFIERS: [char; 8] = ['1', '2', '3', '4', '5', '6', '7', '8'];
const SWITCHES: [char; 8] = ['z', 'x', 'c', 'v', 'n', 'm', ',', '.'];

pub fn key_for(c: char) -> Option<Key> {
    let c = c.to_ascii_lowercase();
    if let Some(pc) = CHROMATIC.iter().position(|&k| k == c) {
        return Some(Key::Chromatic(pc as u8));
    }
    if let Some(i) = MODIFIERS.iter().position(|&k| k == c) {
        return Some(Key::Modifier(Modifier::ALL[i]));
    }
    SWITCHES
        .iter()
        .position(|&k| k == c)
        .map(|n| Key::Switch(n as u8))
}

/// Printable label for the help bar.
pub fn modifier_help() -> String {
    Modifier::ALL
        .iter()
        .zip(MODIFIERS)
        .map(|(m, c)| format!("[{c}] {}", m.label()))
        .collect::<Vec<_>>()
        .join(" ")
}
