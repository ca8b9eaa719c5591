//! Notes
//!
//! The twelve pitch classes, modulo-12 arithmetic, and a compact set type
//! used to compare which notes sound.

use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Number of pitch classes in an octave.
pub const SEMITONES: usize = 12;

/// Twelve chromatic pitch classes
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum NoteName {
    /// C
    C,
    /// C sharp / D flat
    Cs,
    /// D
    D,
    /// D sharp / E flat
    Ds,
    /// E
    E,
    /// F
    F,
    /// F sharp / G flat
    Fs,
    /// G
    G,
    /// G sharp / A flat
    Gs,
    /// A
    A,
    /// A sharp / B flat
    As,
    /// B
    B,
}

/// Error returned when text does not name a pitch class.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized note name: `{0}`")]
pub struct NoteParseError(pub String);

impl NoteName {
    /// All pitch classes in ascending order starting from C.
    pub const ALL: [NoteName; SEMITONES] = [
        NoteName::C,
        NoteName::Cs,
        NoteName::D,
        NoteName::Ds,
        NoteName::E,
        NoteName::F,
        NoteName::Fs,
        NoteName::G,
        NoteName::Gs,
        NoteName::A,
        NoteName::As,
        NoteName::B,
    ];

    /// Pitch class for any semitone count, reduced modulo 12.
    pub const fn from_index(idx: i32) -> NoteName {
        Self::ALL[idx.rem_euclid(SEMITONES as i32) as usize]
    }

    /// Position of this pitch class, C = 0 through B = 11.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Move up (or down, for negative values) by `semitones`.
    pub const fn shift(self, semitones: i32) -> NoteName {
        Self::from_index(self as i32 + semitones.rem_euclid(SEMITONES as i32))
    }

    /// Sharp spelling of the note.
    pub const fn name(self) -> &'static str {
        match self {
            NoteName::C => "C",
            NoteName::Cs => "C#",
            NoteName::D => "D",
            NoteName::Ds => "D#",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::Fs => "F#",
            NoteName::G => "G",
            NoteName::Gs => "G#",
            NoteName::A => "A",
            NoteName::As => "A#",
            NoteName::B => "B",
        }
    }
}

impl Display for NoteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NoteName {
    type Err = NoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars
            .next()
            .ok_or_else(|| NoteParseError(s.to_string()))?;

        let natural = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(NoteParseError(s.to_string())),
        };

        let mut offset = 0;
        for accidental in chars {
            match accidental {
                '#' | '♯' => offset += 1,
                'b' | '♭' => offset -= 1,
                _ => return Err(NoteParseError(s.to_string())),
            }
        }

        Ok(NoteName::from_index(natural + offset))
    }
}

/// A set of pitch classes packed into the low 12 bits of a mask.
///
/// Inserting a note twice has no effect, so two sets compare equal exactly
/// when the same pitch classes are present.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PitchClassSet(u16);

impl PitchClassSet {
    /// The empty set.
    pub const fn new() -> Self {
        PitchClassSet(0)
    }

    /// Add a note to the set.
    pub fn insert(&mut self, note: NoteName) {
        self.0 |= 1u16 << note.index() as u32;
    }

    /// Whether `note` is in the set.
    pub const fn contains(&self, note: NoteName) -> bool {
        self.0 & (1u16 << note.index() as u32) != 0
    }

    /// Number of distinct pitch classes.
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether no pitch class is present.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether every note of `self` is also in `other`.
    pub const fn is_subset(&self, other: &PitchClassSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Raw mask, bit `n` set for pitch class `n`.
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Notes in ascending order from C.
    pub fn iter(&self) -> impl Iterator<Item = NoteName> + '_ {
        let set = *self;
        NoteName::ALL.into_iter().filter(move |n| set.contains(*n))
    }
}

impl FromIterator<NoteName> for PitchClassSet {
    fn from_iter<I: IntoIterator<Item = NoteName>>(iter: I) -> Self {
        let mut set = PitchClassSet::new();
        for note in iter {
            set.insert(note);
        }
        set
    }
}

impl Display for PitchClassSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, note) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{note}")?;
        }
        f.write_str("}")
    }
}
