/*
Chord Model
===========

A chord is stored as three small integers:

  root    pitch class of the chord, 1..=12 (C=1, C#=2 ... B=12), 0 = no chord
  bitmap  24-bit field, one bit per semitone above the root
  bass    pitch class of the bass note, 1..=12, 0 = no bass

Bitmap layout
-------------

The most significant bit (bit 23) is the root itself. Each lower bit is one
semitone further up, so a bit's offset above the root is `23 - bit`:

    bit  23 22 21 20 19 18 17 16 15 14 13 12 11 10  9  8  7  6  ...
    off   0  1  2  3  4  5  6  7  8  9 10 11 12 13 14 15 16 17  ...
          R        m3 M3  4 b5  5       m7 M7        9        11

Only the degrees the keypad can produce have setters. Setting a degree ORs its
bit in (and does nothing while there is no root); resetting a degree clears every alteration of it (both thirds, both
fifths, both sevenths). Setting never clears the opposite alteration: a caller
that wants "major third instead of minor third" resets first.
*/

const ROOT: u32 = 1 << 23;
const FLAT_THIRD: u32 = 1 << 20;
const THIRD: u32 = 1 << 19;
const FOURTH: u32 = 1 << 18;
const FLAT_FIFTH: u32 = 1 << 17;
const FIFTH: u32 = 1 << 16;
const FLAT_SEVENTH: u32 = 1 << 13;
const SEVENTH: u32 = 1 << 12;
const NINTH: u32 = 1 << 9;
const ELEVENTH: u32 = 1 << 6;

/// Width of the degree bitmap.
pub const BITMAP_BITS: u32 = 24;
/// Mask of the valid bitmap bits.
pub const BITMAP_MASK: u32 = (1 << BITMAP_BITS) - 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chord {
    root: u8,
    bitmap: u32,
    bass: u8,
}

#[inline]
fn is_pitch_class(n: u8) -> bool {
    (1..=12).contains(&n)
}

impl Chord {
    /// An empty chord: no root, no degrees, no bass.
    pub const fn new() -> Self {
        Self {
            root: 0,
            bitmap: 0,
            bass: 0,
        }
    }

    /// Clear root, degrees and bass.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Set the root pitch class. An out-of-range value empties the whole chord.
    pub fn set_root(&mut self, root: u8) -> bool {
        if !is_pitch_class(root) {
            self.reset();
            return false;
        }
        self.root = root;
        self.bitmap |= ROOT;
        true
    }

    pub fn root(&self) -> u8 {
        self.root
    }

    pub fn bitmap(&self) -> u32 {
        self.bitmap
    }

    pub fn bass(&self) -> u8 {
        self.bass
    }

    pub fn is_empty(&self) -> bool {
        self.root == 0
    }

    /// Set the bass pitch class independently of the root (a slash chord).
    /// Fails on an out-of-range value or when there is no root to sit under.
    pub fn set_bass(&mut self, bass: u8) -> bool {
        if !is_pitch_class(bass) || self.root == 0 {
            self.bass = 0;
            return false;
        }
        self.bass = bass;
        true
    }

    /// Double the root in the bass. Fails when no root is set.
    pub fn set_bass_from_root(&mut self) -> bool {
        if !is_pitch_class(self.root) {
            self.bass = 0;
            return false;
        }
        self.bass = self.root;
        true
    }

    pub fn reset_bass(&mut self) {
        self.bass = 0;
    }

    /// Root, minor third, fifth, minor seventh, with the root doubled in the bass.
    pub fn build_seventh_chord(&mut self, root: u8) -> bool {
        if !self.set_root(root) {
            return false;
        }
        self.set_flat_third();
        self.set_fifth();
        self.set_flat_seventh();
        self.set_bass_from_root()
    }

    // degrees only exist on top of a root
    fn add(&mut self, degree: u32) {
        if self.root != 0 {
            self.bitmap |= degree;
        }
    }

    pub fn set_third(&mut self) {
        self.add(THIRD);
    }

    pub fn set_flat_third(&mut self) {
        self.add(FLAT_THIRD);
    }

    pub fn reset_third(&mut self) {
        self.bitmap &= !(THIRD | FLAT_THIRD);
    }

    /// Suspended fourth.
    pub fn set_fourth(&mut self) {
        self.add(FOURTH);
    }

    pub fn reset_fourth(&mut self) {
        self.bitmap &= !FOURTH;
    }

    pub fn set_fifth(&mut self) {
        self.add(FIFTH);
    }

    pub fn set_flat_fifth(&mut self) {
        self.add(FLAT_FIFTH);
    }

    pub fn reset_fifth(&mut self) {
        self.bitmap &= !(FIFTH | FLAT_FIFTH);
    }

    /// Major seventh.
    pub fn set_seventh(&mut self) {
        self.add(SEVENTH);
    }

    /// Minor (dominant) seventh.
    pub fn set_flat_seventh(&mut self) {
        self.add(FLAT_SEVENTH);
    }

    pub fn reset_seventh(&mut self) {
        self.bitmap &= !(SEVENTH | FLAT_SEVENTH);
    }

    pub fn set_ninth(&mut self) {
        self.add(NINTH);
    }

    pub fn reset_ninth(&mut self) {
        self.bitmap &= !NINTH;
    }

    pub fn set_eleventh(&mut self) {
        self.add(ELEVENTH);
    }

    pub fn reset_eleventh(&mut self) {
        self.bitmap &= !ELEVENTH;
    }

    /// Semitone offsets above the root, highest bitmap bit first.
    pub fn offsets(&self) -> impl Iterator<Item = u8> + '_ {
        let bitmap = self.bitmap & BITMAP_MASK;
        (0..BITMAP_BITS as u8).filter(move |offset| bitmap & (ROOT >> offset) != 0)
    }
}
