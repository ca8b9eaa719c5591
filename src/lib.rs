//! # chordious
//!
//! Fretboard chord and scale finders for guitar, ukulele and other fretted
//! instruments. The reverse chord finder names the chord a set of fret
//! marks plays; the chord and scale finders go the other way.
//!
//! ## Example
//! ```rust
//! use chordious::{
//!     ChordQualityCatalog, InstrumentKind, NoteName, ReverseChordFinder,
//!     ReverseChordFinderOptions,
//! };
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1) Describe what is being played: open strings on a ukulele
//!     let options = ReverseChordFinderOptions::builder()
//!         .tuning(InstrumentKind::Ukulele)
//!         .marks(vec![0, 0, 0, 0])
//!         .qualities(ChordQualityCatalog::known())
//!         .build()?;
//!
//!     // 2) Search every root against every known quality
//!     let results = ReverseChordFinder::new().find_chords(&options)?;
//!
//!     // 3) G C E A is both C6 and Am7
//!     for result in results.results() {
//!         println!("{} ({} {})", result.name(), result.root(), result.quality());
//!     }
//!     assert!(results.contains(NoteName::C, "Major 6th"));
//!     assert!(results.contains(NoteName::A, "Minor 7th"));
//!
//!     Ok(())
//! }
//! # run().unwrap();
//! ```
//!
//! Catalogs of chord qualities and scales are plain JSON arrays: each entry
//! is either a known kind (`"MinorSeventh"`) or a custom shape
//! (`{"name": "Quartal", "abbreviation": "q", "intervals": [0, 5, 10]}`).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// Reverse chord lookup from fret marks.
pub use reverse_chord_finder::{
    ReverseChordFinder, ReverseChordFinderBuilder, ReverseChordFinderOptions,
    ReverseChordFinderOptionsBuilder, ReverseChordFinderResult, ReverseChordFinderResultSet,
    SearchStrategy, MUTED,
};

/// Forward chord and scale finders.
pub use chord_finder::{
    ChordFinder, ChordFinderOptions, ChordFinderOptionsBuilder, ChordFinderResult,
    ChordFinderResultSet,
};
pub use scale_finder::{
    ScaleFinder, ScaleFinderOptions, ScaleFinderOptionsBuilder, ScaleFinderResult,
    ScaleFinderResultSet,
};

/// Notes, shapes and catalogs.
pub use catalog::{Catalog, CatalogError};
pub use instrument::{InstrumentKind, Tuning};
pub use named_interval::NamedInterval;
pub use note::{NoteName, NoteParseError, PitchClassSet};
pub use quality::{ChordKind, ChordQuality, ChordQualityCatalog};
pub use scale::{Scale, ScaleCatalog, ScaleKind};

pub use cancel::CancellationToken;
pub use error::FinderError;

/// Cooperative cancellation.
pub mod cancel;

/// Ordered catalogs of named shapes.
pub mod catalog;

/// Forward chord finder.
pub mod chord_finder;

/// Finder errors.
pub mod error;

/// Instruments and tunings.
pub mod instrument;

/// Named interval shapes.
pub mod named_interval;

/// Pitch classes.
pub mod note;

/// Chord qualities.
pub mod quality;

/// Reverse chord finder.
pub mod reverse_chord_finder;

/// Scales.
pub mod scale;

/// Scale finder.
pub mod scale_finder;
