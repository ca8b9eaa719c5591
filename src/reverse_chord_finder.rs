//! Reverse Chord Finder
//!
//! Identify which root note and chord quality a set of fret marks plays.
//!
//! The search is exhaustive over the 12 roots and every quality in the
//! caller's catalog. A pair matches only when the pitch classes it builds
//! are exactly the pitch classes the marks sound: extra or missing notes
//! both disqualify it.

use rayon::prelude::*;
use std::sync::Arc;

use crate::{
    cancel::CancellationToken,
    error::FinderError,
    instrument::Tuning,
    named_interval::NamedInterval,
    note::{NoteName, PitchClassSet, SEMITONES},
    quality::{ChordQuality, ChordQualityCatalog},
};

/// Fret mark for a string that is not played.
pub const MUTED: i32 = -1;

/// Pitch classes sounded by `marks` on `tuning`. Negative marks are muted.
pub(crate) fn sounding_notes(tuning: &Tuning, marks: &[i32]) -> PitchClassSet {
    tuning
        .notes()
        .iter()
        .zip(marks)
        .filter(|(_, fret)| **fret >= 0)
        .map(|(&open, &fret)| open.shift(fret))
        .collect()
}

/// Builder for `ReverseChordFinderOptions`
///
/// Marks may be staged string by string with [`set_mark`](Self::set_mark);
/// unstaged strings start muted.
pub struct ReverseChordFinderOptionsBuilder {
    tuning: Option<Tuning>,
    marks: Option<Vec<i32>>,
    staged: Vec<(usize, i32)>,
    qualities: Arc<ChordQualityCatalog>,
}

impl ReverseChordFinderOptionsBuilder {
    /// Start with no tuning, no marks and the known chord catalog.
    pub fn new() -> Self {
        ReverseChordFinderOptionsBuilder {
            tuning: None,
            marks: None,
            staged: Vec::new(),
            qualities: Arc::new(ChordQualityCatalog::known()),
        }
    }

    /// Set the instrument tuning.
    pub fn tuning(mut self, tuning: impl Into<Tuning>) -> Self {
        self.tuning = Some(tuning.into());
        self
    }

    /// Set every fret mark at once, one per string; [`MUTED`] for unplayed.
    pub fn marks(mut self, marks: impl Into<Vec<i32>>) -> Self {
        self.marks = Some(marks.into());
        self
    }

    /// Stage a single mark. Applied after [`marks`](Self::marks).
    pub fn set_mark(mut self, string: usize, fret: i32) -> Self {
        self.staged.push((string, fret));
        self
    }

    /// Set the chord qualities to search.
    pub fn qualities(mut self, qualities: impl Into<Arc<ChordQualityCatalog>>) -> Self {
        self.qualities = qualities.into();
        self
    }

    /// Validate and freeze the options.
    ///
    /// Returns:
    /// - `Err(InvalidArgument)` if the tuning or marks are missing, or a
    ///   staged mark names a string the tuning does not have.
    /// - `Err(LengthMismatch)` if the marks and tuning differ in length.
    pub fn build(self) -> Result<ReverseChordFinderOptions, FinderError> {
        let tuning = self.tuning.ok_or_else(|| FinderError::InvalidArgument {
            arg: "tuning",
            msg: "a tuning is required".to_string(),
        })?;

        let mut marks = match self.marks {
            Some(marks) => marks,
            None if !self.staged.is_empty() => vec![MUTED; tuning.string_count()],
            None => {
                return Err(FinderError::InvalidArgument {
                    arg: "marks",
                    msg: "fret marks are required".to_string(),
                })
            }
        };

        if marks.len() != tuning.string_count() {
            return Err(FinderError::LengthMismatch {
                expected: tuning.string_count(),
                got: marks.len(),
            });
        }

        for (string, fret) in self.staged {
            let slot = marks.get_mut(string).ok_or_else(|| FinderError::InvalidArgument {
                arg: "string",
                msg: format!(
                    "string {string} out of range for {} strings",
                    tuning.string_count()
                ),
            })?;
            *slot = fret;
        }

        Ok(ReverseChordFinderOptions {
            tuning,
            marks,
            qualities: self.qualities,
        })
    }
}

impl Default for ReverseChordFinderOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validated input to a reverse chord search
#[derive(Debug, Clone)]
pub struct ReverseChordFinderOptions {
    tuning: Tuning,
    marks: Vec<i32>,
    qualities: Arc<ChordQualityCatalog>,
}

impl ReverseChordFinderOptions {
    /// Return a builder to stage tuning, marks and qualities
    pub fn builder() -> ReverseChordFinderOptionsBuilder {
        ReverseChordFinderOptionsBuilder::new()
    }

    /// Shorthand for building options from all three parts.
    pub fn new(
        tuning: impl Into<Tuning>,
        marks: impl Into<Vec<i32>>,
        qualities: impl Into<Arc<ChordQualityCatalog>>,
    ) -> Result<Self, FinderError> {
        Self::builder()
            .tuning(tuning)
            .marks(marks)
            .qualities(qualities)
            .build()
    }

    /// Instrument tuning.
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Fret marks, one per string.
    pub fn marks(&self) -> &[i32] {
        &self.marks
    }

    /// Chord qualities searched, in catalog order.
    pub fn qualities(&self) -> &ChordQualityCatalog {
        &self.qualities
    }

    /// Pitch classes the marks sound. Doubled notes count once.
    pub fn sounding_notes(&self) -> PitchClassSet {
        sounding_notes(&self.tuning, &self.marks)
    }
}

/// One matching (root, quality) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseChordFinderResult {
    root: NoteName,
    quality: ChordQuality,
    catalog_index: usize,
}

impl ReverseChordFinderResult {
    /// Root note of the match.
    pub fn root(&self) -> NoteName {
        self.root
    }

    /// Chord quality of the match.
    pub fn quality(&self) -> &ChordQuality {
        &self.quality
    }

    /// Position of the quality in the searched catalog.
    pub fn catalog_index(&self) -> usize {
        self.catalog_index
    }

    /// Chord symbol, e.g. `"C6"` or `"F#m7"`.
    pub fn name(&self) -> String {
        format!("{}{}", self.root, self.quality.abbreviation())
    }

    fn sort_key(&self) -> (NoteName, usize) {
        (self.root, self.catalog_index)
    }
}

/// Matches from one search, ordered by root then catalog position.
#[derive(Debug, Clone)]
pub struct ReverseChordFinderResultSet {
    options: Arc<ReverseChordFinderOptions>,
    results: Vec<ReverseChordFinderResult>,
}

impl ReverseChordFinderResultSet {
    fn new(options: Arc<ReverseChordFinderOptions>) -> Self {
        ReverseChordFinderResultSet {
            options,
            results: Vec::new(),
        }
    }

    /// Insert keeping (root, catalog index) order.
    fn add_result(&mut self, result: ReverseChordFinderResult) {
        let key = result.sort_key();
        let pos = self.results.partition_point(|r| r.sort_key() <= key);
        self.results.insert(pos, result);
    }

    /// Options the search ran with.
    pub fn options(&self) -> &ReverseChordFinderOptions {
        &self.options
    }

    /// Matches in order. May be iterated any number of times.
    pub fn results(&self) -> &[ReverseChordFinderResult] {
        &self.results
    }

    /// Iterate over matches in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ReverseChordFinderResult> {
        self.results.iter()
    }

    /// Number of matches.
    pub fn count(&self) -> usize {
        self.results.len()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Whether a match with this root and quality name was found.
    pub fn contains(&self, root: NoteName, quality_name: &str) -> bool {
        self.results
            .iter()
            .any(|r| r.root == root && r.quality.name().eq_ignore_ascii_case(quality_name))
    }
}

impl<'a> IntoIterator for &'a ReverseChordFinderResultSet {
    type Item = &'a ReverseChordFinderResult;
    type IntoIter = std::slice::Iter<'a, ReverseChordFinderResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// How the (root × quality) grid is evaluated
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Roots outer, qualities inner, one pair at a time.
    #[default]
    Sequential,
    /// Every pair tested on the rayon thread pool.
    Parallel,
}

/// Builder for `ReverseChordFinder` to choose the search strategy
pub struct ReverseChordFinderBuilder {
    strategy: SearchStrategy,
}

impl ReverseChordFinderBuilder {
    /// Create a new builder with the sequential strategy
    pub fn new() -> Self {
        ReverseChordFinderBuilder {
            strategy: SearchStrategy::Sequential,
        }
    }

    /// Set the search strategy
    pub fn strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Build the `ReverseChordFinder`
    pub fn build(self) -> ReverseChordFinder {
        ReverseChordFinder {
            strategy: self.strategy,
        }
    }
}

impl Default for ReverseChordFinderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Finds every (root, quality) pair that plays exactly the marked notes.
///
/// Every call shape returns results in the same order regardless of
/// strategy: root ascending from C, then catalog order.
#[derive(Debug, Clone, Default)]
pub struct ReverseChordFinder {
    strategy: SearchStrategy,
}

impl ReverseChordFinder {
    /// Return a builder to customize the search strategy
    pub fn builder() -> ReverseChordFinderBuilder {
        ReverseChordFinderBuilder::new()
    }

    /// Create a sequential finder
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Strategy this finder uses.
    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Run a full search.
    pub fn find_chords(
        &self,
        options: &ReverseChordFinderOptions,
    ) -> Result<ReverseChordFinderResultSet, FinderError> {
        self.find_chords_with_cancel(options, &CancellationToken::new())
    }

    /// Run a search that stops early once `cancel` is set.
    ///
    /// A cancelled search is not an error: it returns the matches
    /// accumulated before the cancellation was observed.
    pub fn find_chords_with_cancel(
        &self,
        options: &ReverseChordFinderOptions,
        cancel: &CancellationToken,
    ) -> Result<ReverseChordFinderResultSet, FinderError> {
        let options = Arc::new(options.clone());
        let target = options.sounding_notes();
        log_start(&options, target, self.strategy);

        let result_set = match self.strategy {
            SearchStrategy::Sequential => search_sequential(options, target, cancel),
            SearchStrategy::Parallel => search_parallel(options, target, cancel),
        };

        log_finish(&result_set, cancel);
        Ok(result_set)
    }

    /// Run a search on the tokio runtime.
    ///
    /// The sequential strategy walks the same cells as
    /// [`find_chords`](Self::find_chords) and yields to the runtime before
    /// each one. The parallel strategy runs the grid on a blocking
    /// worker; if that worker fails the error is `FinderError::Worker`.
    pub async fn find_chords_async(
        &self,
        options: ReverseChordFinderOptions,
        cancel: CancellationToken,
    ) -> Result<ReverseChordFinderResultSet, FinderError> {
        let options = Arc::new(options);
        let target = options.sounding_notes();
        log_start(&options, target, self.strategy);

        let result_set = match self.strategy {
            SearchStrategy::Sequential => {
                let mut result_set = ReverseChordFinderResultSet::new(options.clone());
                for (root, idx, quality) in cells(options.qualities()) {
                    tokio::task::yield_now().await;
                    if cancel.is_cancelled() {
                        break;
                    }
                    if let Some(hit) = test_pair(target, root, idx, quality) {
                        result_set.add_result(hit);
                    }
                }
                result_set
            }
            SearchStrategy::Parallel => {
                let worker_cancel = cancel.clone();
                tokio::task::spawn_blocking(move || {
                    search_parallel(options, target, &worker_cancel)
                })
                .await
                .map_err(|e| FinderError::Worker(e.to_string()))?
            }
        };

        log_finish(&result_set, &cancel);
        Ok(result_set)
    }
}

/// Grid cells in result order: roots from C, then catalog order.
fn cells<'a>(
    qualities: &'a ChordQualityCatalog,
) -> impl Iterator<Item = (NoteName, usize, &'a ChordQuality)> + 'a {
    NoteName::ALL.into_iter().flat_map(move |root| {
        qualities
            .iter()
            .enumerate()
            .map(move |(idx, quality)| (root, idx, quality))
    })
}

/// Test one (root, quality) cell of the grid.
#[inline]
fn test_pair(
    target: PitchClassSet,
    root: NoteName,
    catalog_index: usize,
    quality: &ChordQuality,
) -> Option<ReverseChordFinderResult> {
    if quality.pitch_classes(root) != target {
        return None;
    }
    log::trace!("match: {}{} ({})", root, quality.abbreviation(), quality.name());
    Some(ReverseChordFinderResult {
        root,
        quality: quality.clone(),
        catalog_index,
    })
}

fn search_sequential(
    options: Arc<ReverseChordFinderOptions>,
    target: PitchClassSet,
    cancel: &CancellationToken,
) -> ReverseChordFinderResultSet {
    let mut result_set = ReverseChordFinderResultSet::new(options.clone());

    for (root, idx, quality) in cells(options.qualities()) {
        if cancel.is_cancelled() {
            break;
        }
        if let Some(hit) = test_pair(target, root, idx, quality) {
            result_set.add_result(hit);
        }
    }

    result_set
}

fn search_parallel(
    options: Arc<ReverseChordFinderOptions>,
    target: PitchClassSet,
    cancel: &CancellationToken,
) -> ReverseChordFinderResultSet {
    let qualities = options.qualities().as_slice();
    let n = qualities.len();

    // A cell whose test has started is always recorded; cancellation only
    // stops cells that have not started yet.
    let hits: Vec<ReverseChordFinderResult> = (0..SEMITONES * n)
        .into_par_iter()
        .filter_map(|cell| {
            if cancel.is_cancelled() {
                return None;
            }
            let root = NoteName::ALL[cell / n];
            let idx = cell % n;
            test_pair(target, root, idx, &qualities[idx])
        })
        .collect();

    let mut result_set = ReverseChordFinderResultSet::new(options.clone());
    for hit in hits {
        result_set.add_result(hit);
    }
    result_set
}

fn log_start(options: &ReverseChordFinderOptions, target: PitchClassSet, strategy: SearchStrategy) {
    log::debug!(
        "reverse chord search: tuning `{}`, marks {:?}, sounding {}, {} qualities, {:?}",
        options.tuning().name(),
        options.marks(),
        target,
        options.qualities().len(),
        strategy
    );
}

fn log_finish(result_set: &ReverseChordFinderResultSet, cancel: &CancellationToken) {
    if cancel.is_cancelled() {
        log::info!(
            "reverse chord search cancelled with {} partial matches",
            result_set.count()
        );
    } else {
        log::debug!("reverse chord search found {} matches", result_set.count());
    }
}
