//! Scales
//!
//! Scale shapes used by the scale finder.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::{catalog::Catalog, named_interval::NamedInterval};

const NUM_SCALE_KINDS: usize = 10;

const SCALE_KINDS: [ScaleKind; NUM_SCALE_KINDS] = [
    ScaleKind::Major,
    ScaleKind::NaturalMinor,
    ScaleKind::HarmonicMinor,
    ScaleKind::MelodicMinor,
    ScaleKind::MajorPentatonic,
    ScaleKind::MinorPentatonic,
    ScaleKind::Blues,
    ScaleKind::Dorian,
    ScaleKind::Mixolydian,
    ScaleKind::Chromatic,
];

const SCALE_SPECS: [(&str, &[u8]); NUM_SCALE_KINDS] = [
    ("Major",            &[0, 2, 4, 5, 7, 9, 11]),
    ("Natural Minor",    &[0, 2, 3, 5, 7, 8, 10]),
    ("Harmonic Minor",   &[0, 2, 3, 5, 7, 8, 11]),
    ("Melodic Minor",    &[0, 2, 3, 5, 7, 9, 11]),
    ("Major Pentatonic", &[0, 2, 4, 7, 9]),
    ("Minor Pentatonic", &[0, 3, 5, 7, 10]),
    ("Blues",            &[0, 3, 5, 6, 7, 10]),
    ("Dorian",           &[0, 2, 3, 5, 7, 9, 10]),
    ("Mixolydian",       &[0, 2, 4, 5, 7, 9, 10]),
    ("Chromatic",        &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
];

/// Supported scales
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScaleKind {
    /// Ionian major scale
    Major,
    /// Aeolian minor scale
    NaturalMinor,
    /// Minor scale with a raised seventh
    HarmonicMinor,
    /// Minor scale with raised sixth and seventh
    MelodicMinor,
    /// Five-note major scale
    MajorPentatonic,
    /// Five-note minor scale
    MinorPentatonic,
    /// Minor pentatonic plus the flat fifth
    Blues,
    /// Dorian mode
    Dorian,
    /// Mixolydian mode
    Mixolydian,
    /// All twelve pitch classes
    Chromatic,
}

impl ScaleKind {
    /// Every known scale in catalog order.
    pub const ALL: [ScaleKind; NUM_SCALE_KINDS] = SCALE_KINDS;

    /// Display name.
    pub const fn name(self) -> &'static str {
        SCALE_SPECS[self as usize].0
    }

    /// Semitone offsets from the root.
    pub const fn intervals(self) -> &'static [u8] {
        SCALE_SPECS[self as usize].1
    }
}

impl Display for ScaleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A scale: either a known kind or a user-defined shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scale {
    /// One of the built-in scales.
    Known(ScaleKind),
    /// A scale defined by the user.
    Custom {
        /// Display name.
        name: String,
        /// Semitone offsets from the root.
        intervals: Vec<u8>,
    },
}

impl Scale {
    /// Build a user-defined scale.
    pub fn custom(name: impl Into<String>, intervals: impl Into<Vec<u8>>) -> Self {
        Scale::Custom {
            name: name.into(),
            intervals: intervals.into(),
        }
    }
}

impl NamedInterval for Scale {
    fn name(&self) -> &str {
        match self {
            Scale::Known(kind) => kind.name(),
            Scale::Custom { name, .. } => name,
        }
    }

    fn intervals(&self) -> &[u8] {
        match self {
            Scale::Known(kind) => kind.intervals(),
            Scale::Custom { intervals, .. } => intervals,
        }
    }
}

impl From<ScaleKind> for Scale {
    fn from(kind: ScaleKind) -> Self {
        Scale::Known(kind)
    }
}

impl Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered, read-only collection of scales.
pub type ScaleCatalog = Catalog<Scale>;

impl Catalog<Scale> {
    /// Catalog holding every [`ScaleKind`] in declaration order.
    pub fn known() -> Self {
        Catalog::from_trusted(SCALE_KINDS.iter().map(|&k| Scale::Known(k)).collect())
    }
}
