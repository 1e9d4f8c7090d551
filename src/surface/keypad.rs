//! Logical keypad layout and the snapshot -> chord translation.
//!
//! The physical matrix scan and debouncing happen elsewhere; this module only
//! sees which logical keys are down and when each was last pressed.

use crate::chord::model::Chord;

/// C through B.
pub const CHROMATIC_KEYS: usize = 12;
pub const MODIFIER_KEYS: usize = 8;
/// Instrument selection switches, read as one binary number.
pub const SWITCH_KEYS: usize = 8;
pub const KEY_COUNT: usize = CHROMATIC_KEYS + MODIFIER_KEYS + SWITCH_KEYS;

const MODIFIER_BASE: usize = CHROMATIC_KEYS;
const SWITCH_BASE: usize = CHROMATIC_KEYS + MODIFIER_KEYS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Add11,
    No3,
    No5,
    No7,
    Add9,
    Maj3,
    Flat5,
    Maj7,
}

impl Modifier {
    pub const ALL: [Modifier; MODIFIER_KEYS] = [
        Modifier::Add11,
        Modifier::No3,
        Modifier::No5,
        Modifier::No7,
        Modifier::Add9,
        Modifier::Maj3,
        Modifier::Flat5,
        Modifier::Maj7,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Modifier::Add11 => "add11",
            Modifier::No3 => "no3",
            Modifier::No5 => "no5",
            Modifier::No7 => "no7",
            Modifier::Add9 => "add9",
            Modifier::Maj3 => "maj3",
            Modifier::Flat5 => "b5",
            Modifier::Maj7 => "maj7",
        }
    }
}

/// One logical key on the pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Pitch class 0 (C) ..= 11 (B).
    Chromatic(u8),
    Modifier(Modifier),
    /// Switch 0 (most significant) ..= 7.
    Switch(u8),
}

impl Key {
    /// Position in a [`KeyboardSnapshot`], `None` for a pitch class or
    /// switch number the pad does not have.
    pub fn index(self) -> Option<usize> {
        match self {
            Key::Chromatic(pc) if usize::from(pc) < CHROMATIC_KEYS => Some(usize::from(pc)),
            Key::Modifier(m) => Some(MODIFIER_BASE + m as usize),
            Key::Switch(n) if usize::from(n) < SWITCH_KEYS => Some(SWITCH_BASE + usize::from(n)),
            _ => None,
        }
    }

    pub fn from_index(index: usize) -> Option<Key> {
        match index {
            i if i < MODIFIER_BASE => Some(Key::Chromatic(i as u8)),
            i if i < SWITCH_BASE => Some(Key::Modifier(Modifier::ALL[i - MODIFIER_BASE])),
            i if i < KEY_COUNT => Some(Key::Switch((i - SWITCH_BASE) as u8)),
            _ => None,
        }
    }
}

/// Press state of every key plus the time of its latest press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardSnapshot {
    pub pressed: [bool; KEY_COUNT],
    pub press_times: [u64; KEY_COUNT],
}

impl Default for KeyboardSnapshot {
    fn default() -> Self {
        Self {
            pressed: [false; KEY_COUNT],
            press_times: [0; KEY_COUNT],
        }
    }
}

impl KeyboardSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys the pad does not have are ignored.
    pub fn press(&mut self, key: Key, time: u64) {
        if let Some(i) = key.index() {
            self.pressed[i] = true;
            self.press_times[i] = time;
        }
    }

    pub fn release(&mut self, key: Key) {
        if let Some(i) = key.index() {
            self.pressed[i] = false;
        }
    }

    /// Flip a latching key; returns whether it is now down.
    pub fn toggle(&mut self, key: Key, time: u64) -> bool {
        if self.is_pressed(key) {
            self.release(key);
            false
        } else {
            self.press(key, time);
            self.is_pressed(key)
        }
    }

    pub fn release_all(&mut self) {
        self.pressed = [false; KEY_COUNT];
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        key.index().is_some_and(|i| self.pressed[i])
    }

    /// Instrument switch bank as a number, switch 0 most significant.
    pub fn instrument(&self) -> u8 {
        (0..SWITCH_KEYS as u8).fold(0u8, |acc, n| {
            (acc << 1) | u8::from(self.is_pressed(Key::Switch(n)))
        })
    }

    /// Pressed chromatic key with the latest press, as a root 1..=12.
    /// Ties go to the higher key.
    pub fn latest_root(&self) -> Option<u8> {
        (0..CHROMATIC_KEYS)
            .filter(|&i| self.pressed[i])
            .max_by_key(|&i| self.press_times[i])
            .map(|i| i as u8 + 1)
    }
}

/// Rebuild `chord` from the pad and return the selected instrument.
///
/// The last-pressed chromatic key gives a minor seventh chord with the root in
/// the bass, then the modifiers alter it: add9, maj3, b5, maj7 and add11 add or
/// swap a degree, and no3/no5/no7 finally drop one. Modifiers without a root
/// leave the chord empty.
pub fn parse(snapshot: &KeyboardSnapshot, chord: &mut Chord) -> u8 {
    chord.reset();
    let instrument = snapshot.instrument();

    let Some(root) = snapshot.latest_root() else {
        return instrument;
    };
    chord.build_seventh_chord(root);

    let held = |m: Modifier| snapshot.is_pressed(Key::Modifier(m));

    if held(Modifier::Add9) {
        chord.set_ninth();
    }
    if held(Modifier::Maj3) {
        chord.reset_third();
        chord.set_third();
    }
    if held(Modifier::Flat5) {
        chord.reset_fifth();
        chord.set_flat_fifth();
    }
    if held(Modifier::Maj7) {
        chord.reset_seventh();
        chord.set_seventh();
    }
    if held(Modifier::Add11) {
        chord.set_eleventh();
    }
    if held(Modifier::No3) {
        chord.reset_third();
    }
    if held(Modifier::No5) {
        chord.reset_fifth();
    }
    if held(Modifier::No7) {
        chord.reset_seventh();
    }

    instrument
}
