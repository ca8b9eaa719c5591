//! Chord Qualities
//!
//! Known chord qualities with their interval shapes, plus user-defined
//! entries loaded from configuration.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::{catalog::Catalog, named_interval::NamedInterval};

/// Number of known chord qualities
const NUM_CHORD_KINDS: usize = 15;

/// Known chord qualities in catalog order
const CHORD_KINDS: [ChordKind; NUM_CHORD_KINDS] = [
    ChordKind::Major,
    ChordKind::Minor,
    ChordKind::PowerFifth,
    ChordKind::DominantSeventh,
    ChordKind::MajorSeventh,
    ChordKind::MinorSeventh,
    ChordKind::Diminished,
    ChordKind::Augmented,
    ChordKind::SuspendedSecond,
    ChordKind::SuspendedFourth,
    ChordKind::MajorSixth,
    ChordKind::MinorSixth,
    ChordKind::DiminishedSeventh,
    ChordKind::HalfDiminishedSeventh,
    ChordKind::AddNine,
];

/// (name, abbreviation, intervals) matching `CHORD_KINDS` order
const CHORD_SPECS: [(&str, &str, &[u8]); NUM_CHORD_KINDS] = [
    ("Major",               "",     &[0, 4, 7]),
    ("Minor",               "m",    &[0, 3, 7]),
    ("Power Fifth",         "5",    &[0, 7]),
    ("Dominant 7th",        "7",    &[0, 4, 7, 10]),
    ("Major 7th",           "maj7", &[0, 4, 7, 11]),
    ("Minor 7th",           "m7",   &[0, 3, 7, 10]),
    ("Diminished",          "dim",  &[0, 3, 6]),
    ("Augmented",           "aug",  &[0, 4, 8]),
    ("Suspended 2nd",       "sus2", &[0, 2, 7]),
    ("Suspended 4th",       "sus4", &[0, 5, 7]),
    ("Major 6th",           "6",    &[0, 4, 7, 9]),
    ("Minor 6th",           "m6",   &[0, 3, 7, 9]),
    ("Diminished 7th",      "dim7", &[0, 3, 6, 9]),
    ("Half-Diminished 7th", "m7b5", &[0, 3, 6, 10]),
    ("Added 9th",           "add9", &[0, 4, 7, 14]),
];

/// Supported chord qualities
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChordKind {
    /// Major chord (e.g., C-E-G)
    Major,
    /// Minor chord (e.g., C-Eb-G)
    Minor,
    /// Power chord (e.g., C-G)
    PowerFifth,
    /// Dominant seventh chord (e.g., C-E-G-Bb)
    DominantSeventh,
    /// Major seventh chord (e.g., C-E-G-B)
    MajorSeventh,
    /// Minor seventh chord (e.g., C-Eb-G-Bb)
    MinorSeventh,
    /// Diminished chord (e.g., C-Eb-Gb)
    Diminished,
    /// Augmented chord (e.g., C-E-G#)
    Augmented,
    /// Suspended second chord (e.g., C-D-G)
    SuspendedSecond,
    /// Suspended fourth chord (e.g., C-F-G)
    SuspendedFourth,
    /// Major sixth chord (e.g., C-E-G-A)
    MajorSixth,
    /// Minor sixth chord (e.g., C-Eb-G-A)
    MinorSixth,
    /// Diminished seventh chord (e.g., C-Eb-Gb-A)
    DiminishedSeventh,
    /// Half-diminished seventh chord (e.g., C-Eb-Gb-Bb)
    HalfDiminishedSeventh,
    /// Added ninth chord (e.g., C-E-G-D)
    AddNine,
}

impl ChordKind {
    /// Every known quality in catalog order.
    pub const ALL: [ChordKind; NUM_CHORD_KINDS] = CHORD_KINDS;

    const fn spec(self) -> (&'static str, &'static str, &'static [u8]) {
        CHORD_SPECS[self as usize]
    }

    /// Long name, e.g. `"Minor 7th"`.
    pub const fn name(self) -> &'static str {
        self.spec().0
    }

    /// Chord symbol suffix, e.g. `"m7"`. Empty for a major triad.
    pub const fn abbreviation(self) -> &'static str {
        self.spec().1
    }

    /// Semitone offsets from the root.
    pub const fn intervals(self) -> &'static [u8] {
        self.spec().2
    }
}

impl Display for ChordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A chord quality: either a known kind or a user-defined shape.
///
/// In configuration a known quality is written as its kind name
/// (`"MinorSeventh"`) and a custom one as an object with `name`,
/// `abbreviation` and `intervals`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChordQuality {
    /// One of the built-in qualities.
    Known(ChordKind),
    /// A quality defined by the user.
    Custom {
        /// Display name.
        name: String,
        /// Chord symbol suffix.
        #[serde(default)]
        abbreviation: String,
        /// Semitone offsets from the root.
        intervals: Vec<u8>,
    },
}

impl ChordQuality {
    /// Build a user-defined quality.
    pub fn custom(
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        intervals: impl Into<Vec<u8>>,
    ) -> Self {
        ChordQuality::Custom {
            name: name.into(),
            abbreviation: abbreviation.into(),
            intervals: intervals.into(),
        }
    }

    /// Chord symbol suffix.
    pub fn abbreviation(&self) -> &str {
        match self {
            ChordQuality::Known(kind) => kind.abbreviation(),
            ChordQuality::Custom { abbreviation, .. } => abbreviation,
        }
    }

    /// The known kind, if this is not a custom quality.
    pub fn kind(&self) -> Option<ChordKind> {
        match self {
            ChordQuality::Known(kind) => Some(*kind),
            ChordQuality::Custom { .. } => None,
        }
    }
}

impl NamedInterval for ChordQuality {
    fn name(&self) -> &str {
        match self {
            ChordQuality::Known(kind) => kind.name(),
            ChordQuality::Custom { name, .. } => name,
        }
    }

    fn intervals(&self) -> &[u8] {
        match self {
            ChordQuality::Known(kind) => kind.intervals(),
            ChordQuality::Custom { intervals, .. } => intervals,
        }
    }

    fn short_name(&self) -> Option<&str> {
        Some(self.abbreviation())
    }
}

impl From<ChordKind> for ChordQuality {
    fn from(kind: ChordKind) -> Self {
        ChordQuality::Known(kind)
    }
}

impl Display for ChordQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered, read-only collection of chord qualities.
pub type ChordQualityCatalog = Catalog<ChordQuality>;

impl Catalog<ChordQuality> {
    /// Catalog holding every [`ChordKind`] in declaration order.
    pub fn known() -> Self {
        Catalog::from_trusted(CHORD_KINDS.iter().map(|&k| ChordQuality::Known(k)).collect())
    }

    /// Find a quality by its exact chord symbol suffix.
    pub fn find_by_abbreviation(&self, abbreviation: &str) -> Option<&ChordQuality> {
        self.iter().find(|q| q.abbreviation() == abbreviation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteName;

    #[test]
    fn known_specs_line_up_with_kinds() {
        assert_eq!(ChordKind::MinorSeventh.abbreviation(), "m7");
        assert_eq!(ChordKind::MajorSixth.intervals(), &[0, 4, 7, 9]);
        assert_eq!(ChordKind::ALL.len(), ChordQualityCatalog::known().len());
        for kind in ChordKind::ALL {
            assert_eq!(kind.intervals()[0], 0, "{kind} must start at the root");
        }
    }

    #[test]
    fn add_nine_folds_into_octave() {
        let set = ChordQuality::from(ChordKind::AddNine).pitch_classes(NoteName::C);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![NoteName::C, NoteName::D, NoteName::E, NoteName::G]
        );
    }

    #[test]
    fn deserializes_known_and_custom_entries() {
        let json = r#"["MinorSeventh", {"name": "Quartal", "abbreviation": "q", "intervals": [0, 5, 10]}]"#;
        let parsed: Vec<ChordQuality> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0], ChordQuality::Known(ChordKind::MinorSeventh));
        assert_eq!(parsed[1], ChordQuality::custom("Quartal", "q", vec![0, 5, 10]));
    }

    #[test]
    fn custom_abbreviation_defaults_to_empty() {
        let parsed: ChordQuality =
            serde_json::from_str(r#"{"name": "Cluster", "intervals": [0, 1, 2]}"#).unwrap();
        assert_eq!(parsed.abbreviation(), "");
        assert_eq!(parsed.kind(), None);
    }

    #[test]
    fn lookup_by_abbreviation_is_exact() {
        let catalog = ChordQualityCatalog::known();
        assert_eq!(
            catalog.find_by_abbreviation("m").and_then(ChordQuality::kind),
            Some(ChordKind::Minor)
        );
        assert!(catalog.find_by_abbreviation("M7").is_none());
    }
}
