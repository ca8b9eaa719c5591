//! Instruments
//!
//! Fretted instruments and their open-string tunings.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::{error::FinderError, note::NoteName};

/// Fretted instruments with a standard tuning
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentKind {
    /// Six-string guitar, E A D G B E
    Guitar,
    /// Four-string bass, E A D G
    Bass,
    /// Soprano/concert/tenor ukulele, G C E A
    Ukulele,
    /// Mandolin, G D A E
    Mandolin,
    /// Five-string banjo, open G (G D G B D)
    Banjo,
}

impl InstrumentKind {
    /// Every known instrument.
    pub const ALL: [InstrumentKind; 5] = [
        InstrumentKind::Guitar,
        InstrumentKind::Bass,
        InstrumentKind::Ukulele,
        InstrumentKind::Mandolin,
        InstrumentKind::Banjo,
    ];

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            InstrumentKind::Guitar => "Guitar",
            InstrumentKind::Bass => "Bass",
            InstrumentKind::Ukulele => "Ukulele",
            InstrumentKind::Mandolin => "Mandolin",
            InstrumentKind::Banjo => "Banjo",
        }
    }

    /// Open strings from lowest-numbered (leftmost in a diagram) to highest.
    pub const fn standard_notes(self) -> &'static [NoteName] {
        use NoteName::*;
        match self {
            InstrumentKind::Guitar => &[E, A, D, G, B, E],
            InstrumentKind::Bass => &[E, A, D, G],
            InstrumentKind::Ukulele => &[G, C, E, A],
            InstrumentKind::Mandolin => &[G, D, A, E],
            InstrumentKind::Banjo => &[G, D, G, B, D],
        }
    }
}

impl Display for InstrumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Open-string pitch classes, one per string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TuningConfig")]
pub struct Tuning {
    name: String,
    notes: Vec<NoteName>,
}

impl Tuning {
    /// A custom tuning. Fails if `notes` is empty.
    pub fn new(name: impl Into<String>, notes: Vec<NoteName>) -> Result<Self, FinderError> {
        if notes.is_empty() {
            return Err(FinderError::InvalidArgument {
                arg: "tuning",
                msg: "must have at least one string".to_string(),
            });
        }
        Ok(Tuning {
            name: name.into(),
            notes,
        })
    }

    /// Standard tuning for a known instrument.
    pub fn standard(kind: InstrumentKind) -> Self {
        Tuning {
            name: format!("{} Standard", kind.name()),
            notes: kind.standard_notes().to_vec(),
        }
    }

    /// Tuning name, e.g. `"Ukulele Standard"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Open-string notes.
    pub fn notes(&self) -> &[NoteName] {
        &self.notes
    }

    /// Number of strings.
    pub fn string_count(&self) -> usize {
        self.notes.len()
    }
}

#[derive(Deserialize)]
struct TuningConfig {
    name: String,
    notes: Vec<NoteName>,
}

impl TryFrom<TuningConfig> for Tuning {
    type Error = FinderError;

    fn try_from(config: TuningConfig) -> Result<Self, Self::Error> {
        Tuning::new(config.name, config.notes)
    }
}

impl From<InstrumentKind> for Tuning {
    fn from(kind: InstrumentKind) -> Self {
        Tuning::standard(kind)
    }
}
