//! Chord Finder
//!
//! Enumerate fingerings of a chord on a fretted instrument.

use std::sync::Arc;

use crate::{
    cancel::CancellationToken,
    error::FinderError,
    instrument::Tuning,
    named_interval::NamedInterval,
    note::{NoteName, PitchClassSet},
    quality::ChordQuality,
    reverse_chord_finder::{sounding_notes, MUTED},
};

/// Builder for `ChordFinderOptions`
///
/// Defaults: 12 frets, a reach of 4 frets, open strings allowed, muted
/// strings not allowed, root required in the bass.
pub struct ChordFinderOptionsBuilder {
    tuning: Option<Tuning>,
    root: Option<NoteName>,
    quality: Option<ChordQuality>,
    num_frets: u8,
    max_reach: u8,
    allow_open_strings: bool,
    allow_muted_strings: bool,
    root_in_bass: bool,
}

impl ChordFinderOptionsBuilder {
    /// Start with the default search limits.
    pub fn new() -> Self {
        ChordFinderOptionsBuilder {
            tuning: None,
            root: None,
            quality: None,
            num_frets: 12,
            max_reach: 4,
            allow_open_strings: true,
            allow_muted_strings: false,
            root_in_bass: true,
        }
    }

    /// Set the instrument tuning.
    pub fn tuning(mut self, tuning: impl Into<Tuning>) -> Self {
        self.tuning = Some(tuning.into());
        self
    }

    /// Set the chord root.
    pub fn root(mut self, root: NoteName) -> Self {
        self.root = Some(root);
        self
    }

    /// Set the chord quality.
    pub fn quality(mut self, quality: impl Into<ChordQuality>) -> Self {
        self.quality = Some(quality.into());
        self
    }

    /// Highest fret considered.
    pub fn num_frets(mut self, frets: u8) -> Self {
        self.num_frets = frets;
        self
    }

    /// Number of frets the fretting hand can cover.
    pub fn max_reach(mut self, reach: u8) -> Self {
        self.max_reach = reach;
        self
    }

    /// Whether open strings may be part of a fingering.
    pub fn allow_open_strings(mut self, allow: bool) -> Self {
        self.allow_open_strings = allow;
        self
    }

    /// Whether strings may be left unplayed.
    pub fn allow_muted_strings(mut self, allow: bool) -> Self {
        self.allow_muted_strings = allow;
        self
    }

    /// Whether the lowest sounding string must play the root.
    pub fn root_in_bass(mut self, required: bool) -> Self {
        self.root_in_bass = required;
        self
    }

    /// Validate and freeze the options.
    pub fn build(self) -> Result<ChordFinderOptions, FinderError> {
        let tuning = self.tuning.ok_or_else(|| FinderError::InvalidArgument {
            arg: "tuning",
            msg: "a tuning is required".to_string(),
        })?;
        let root = self.root.ok_or_else(|| FinderError::InvalidArgument {
            arg: "root",
            msg: "a root note is required".to_string(),
        })?;
        let quality = self.quality.ok_or_else(|| FinderError::InvalidArgument {
            arg: "quality",
            msg: "a chord quality is required".to_string(),
        })?;
        if quality.intervals().is_empty() {
            return Err(FinderError::InvalidArgument {
                arg: "quality",
                msg: format!("`{}` has no intervals", quality.name()),
            });
        }
        if self.num_frets == 0 {
            return Err(FinderError::InvalidArgument {
                arg: "num_frets",
                msg: "must be >= 1".to_string(),
            });
        }
        if self.max_reach == 0 || self.max_reach > self.num_frets {
            return Err(FinderError::InvalidArgument {
                arg: "max_reach",
                msg: format!("must be in 1..={}", self.num_frets),
            });
        }

        Ok(ChordFinderOptions {
            tuning,
            root,
            quality,
            num_frets: self.num_frets,
            max_reach: self.max_reach,
            allow_open_strings: self.allow_open_strings,
            allow_muted_strings: self.allow_muted_strings,
            root_in_bass: self.root_in_bass,
        })
    }
}

impl Default for ChordFinderOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validated input to a chord search
#[derive(Debug, Clone)]
pub struct ChordFinderOptions {
    tuning: Tuning,
    root: NoteName,
    quality: ChordQuality,
    num_frets: u8,
    max_reach: u8,
    allow_open_strings: bool,
    allow_muted_strings: bool,
    root_in_bass: bool,
}

impl ChordFinderOptions {
    /// Return a builder with default search limits
    pub fn builder() -> ChordFinderOptionsBuilder {
        ChordFinderOptionsBuilder::new()
    }

    /// Instrument tuning.
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Chord root.
    pub fn root(&self) -> NoteName {
        self.root
    }

    /// Chord quality.
    pub fn quality(&self) -> &ChordQuality {
        &self.quality
    }

    /// Highest fret considered.
    pub fn num_frets(&self) -> u8 {
        self.num_frets
    }

    /// Frets the hand can cover.
    pub fn max_reach(&self) -> u8 {
        self.max_reach
    }

    /// Pitch classes every fingering must sound.
    pub fn chord_notes(&self) -> PitchClassSet {
        self.quality.pitch_classes(self.root)
    }
}

/// One fingering: a fret mark per string, [`MUTED`] for unplayed strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordFinderResult {
    marks: Vec<i32>,
}

impl ChordFinderResult {
    /// Fret marks, one per string.
    pub fn marks(&self) -> &[i32] {
        &self.marks
    }

    /// Lowest fretted position, or 0 when only open strings sound.
    pub fn position(&self) -> i32 {
        self.marks.iter().copied().filter(|&f| f > 0).min().unwrap_or(0)
    }

    /// Highest fret used.
    pub fn highest_fret(&self) -> i32 {
        self.marks.iter().copied().max().unwrap_or(0).max(0)
    }
}

/// Fingerings from one search, ordered by position then marks.
#[derive(Debug, Clone)]
pub struct ChordFinderResultSet {
    options: Arc<ChordFinderOptions>,
    results: Vec<ChordFinderResult>,
}

impl ChordFinderResultSet {
    /// Options the search ran with.
    pub fn options(&self) -> &ChordFinderOptions {
        &self.options
    }

    /// Fingerings in order.
    pub fn results(&self) -> &[ChordFinderResult] {
        &self.results
    }

    /// Number of fingerings.
    pub fn count(&self) -> usize {
        self.results.len()
    }

    /// Whether nothing was found.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Whether `marks` is among the fingerings.
    pub fn contains(&self, marks: &[i32]) -> bool {
        self.results.iter().any(|r| r.marks == marks)
    }
}

/// Finds fingerings that sound exactly the notes of a chord.
#[derive(Debug, Clone, Default)]
pub struct ChordFinder;

impl ChordFinder {
    /// Create a finder
    pub fn new() -> Self {
        ChordFinder
    }

    /// Enumerate every fingering.
    pub fn find_chords(&self, options: &ChordFinderOptions) -> Result<ChordFinderResultSet, FinderError> {
        self.find_chords_with_cancel(options, &CancellationToken::new())
    }

    /// Enumerate fingerings until done or `cancel` is set.
    pub fn find_chords_with_cancel(
        &self,
        options: &ChordFinderOptions,
        cancel: &CancellationToken,
    ) -> Result<ChordFinderResultSet, FinderError> {
        let target = options.chord_notes();
        log::debug!(
            "chord search: {}{} on `{}` ({} frets, reach {})",
            options.root,
            options.quality.abbreviation(),
            options.tuning.name(),
            options.num_frets,
            options.max_reach
        );

        let candidates = string_candidates(options, target);
        let mut search = Search {
            options,
            target,
            candidates: &candidates,
            cancel,
            marks: Vec::with_capacity(candidates.len()),
            found: Vec::new(),
        };
        search.descend(None);

        let mut results = search.found;
        results.sort_by(|a, b| {
            a.position()
                .cmp(&b.position())
                .then_with(|| a.marks.cmp(&b.marks))
        });

        if cancel.is_cancelled() {
            log::info!("chord search cancelled with {} partial fingerings", results.len());
        } else {
            log::debug!("chord search found {} fingerings", results.len());
        }

        Ok(ChordFinderResultSet {
            options: Arc::new(options.clone()),
            results,
        })
    }
}

/// Marks each string may take: muted (if allowed) plus every fret that
/// plays a chord tone.
fn string_candidates(options: &ChordFinderOptions, target: PitchClassSet) -> Vec<Vec<i32>> {
    let first_fret = if options.allow_open_strings { 0 } else { 1 };
    options
        .tuning
        .notes()
        .iter()
        .map(|open| {
            let mut marks = Vec::new();
            if options.allow_muted_strings {
                marks.push(MUTED);
            }
            marks.extend(
                (first_fret..=i32::from(options.num_frets))
                    .filter(|&fret| target.contains(open.shift(fret))),
            );
            marks
        })
        .collect()
}

struct Search<'a> {
    options: &'a ChordFinderOptions,
    target: PitchClassSet,
    candidates: &'a [Vec<i32>],
    cancel: &'a CancellationToken,
    marks: Vec<i32>,
    found: Vec<ChordFinderResult>,
}

impl Search<'_> {
    /// `span` is the (lowest, highest) fretted fret so far.
    fn descend(&mut self, span: Option<(i32, i32)>) {
        if self.cancel.is_cancelled() {
            return;
        }

        let string = self.marks.len();
        if string == self.candidates.len() {
            if self.accepts() {
                self.found.push(ChordFinderResult {
                    marks: self.marks.clone(),
                });
            }
            return;
        }

        let candidates = self.candidates;
        for &fret in &candidates[string] {
            let next_span = if fret > 0 {
                let (lo, hi) = span.map_or((fret, fret), |(lo, hi)| (lo.min(fret), hi.max(fret)));
                if hi - lo >= i32::from(self.options.max_reach) {
                    continue;
                }
                Some((lo, hi))
            } else {
                span
            };

            self.marks.push(fret);
            self.descend(next_span);
            self.marks.pop();
        }
    }

    fn accepts(&self) -> bool {
        if sounding_notes(&self.options.tuning, &self.marks) != self.target {
            return false;
        }
        if !self.options.root_in_bass {
            return true;
        }
        self.options
            .tuning
            .notes()
            .iter()
            .zip(&self.marks)
            .find(|(_, fret)| **fret >= 0)
            .is_some_and(|(open, fret)| open.shift(*fret) == self.options.root)
    }
}
