//! Scale Finder
//!
//! Lay a scale out across the fretboard, one hand position at a time.

use std::sync::Arc;

use crate::{
    cancel::CancellationToken,
    error::FinderError,
    instrument::Tuning,
    named_interval::NamedInterval,
    note::{NoteName, PitchClassSet},
    scale::Scale,
};

/// Builder for `ScaleFinderOptions`
pub struct ScaleFinderOptionsBuilder {
    tuning: Option<Tuning>,
    root: Option<NoteName>,
    scale: Option<Scale>,
    num_frets: u8,
    max_reach: u8,
}

impl ScaleFinderOptionsBuilder {
    /// Start with 12 frets and a reach of 4.
    pub fn new() -> Self {
        ScaleFinderOptionsBuilder {
            tuning: None,
            root: None,
            scale: None,
            num_frets: 12,
            max_reach: 4,
        }
    }

    /// Set the instrument tuning.
    pub fn tuning(mut self, tuning: impl Into<Tuning>) -> Self {
        self.tuning = Some(tuning.into());
        self
    }

    /// Set the scale root.
    pub fn root(mut self, root: NoteName) -> Self {
        self.root = Some(root);
        self
    }

    /// Set the scale.
    pub fn scale(mut self, scale: impl Into<Scale>) -> Self {
        self.scale = Some(scale.into());
        self
    }

    /// Highest fret considered.
    pub fn num_frets(mut self, frets: u8) -> Self {
        self.num_frets = frets;
        self
    }

    /// Width of one hand position in frets.
    pub fn max_reach(mut self, reach: u8) -> Self {
        self.max_reach = reach;
        self
    }

    /// Validate and freeze the options.
    pub fn build(self) -> Result<ScaleFinderOptions, FinderError> {
        let tuning = self.tuning.ok_or_else(|| FinderError::InvalidArgument {
            arg: "tuning",
            msg: "a tuning is required".to_string(),
        })?;
        let root = self.root.ok_or_else(|| FinderError::InvalidArgument {
            arg: "root",
            msg: "a root note is required".to_string(),
        })?;
        let scale = self.scale.ok_or_else(|| FinderError::InvalidArgument {
            arg: "scale",
            msg: "a scale is required".to_string(),
        })?;
        if scale.intervals().is_empty() {
            return Err(FinderError::InvalidArgument {
                arg: "scale",
                msg: format!("`{}` has no intervals", scale.name()),
            });
        }
        if self.max_reach == 0 || u16::from(self.max_reach) > u16::from(self.num_frets) + 1 {
            return Err(FinderError::InvalidArgument {
                arg: "max_reach",
                msg: format!("must be in 1..={}", u16::from(self.num_frets) + 1),
            });
        }

        Ok(ScaleFinderOptions {
            tuning,
            root,
            scale,
            num_frets: self.num_frets,
            max_reach: self.max_reach,
        })
    }
}

impl Default for ScaleFinderOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validated input to a scale search
#[derive(Debug, Clone)]
pub struct ScaleFinderOptions {
    tuning: Tuning,
    root: NoteName,
    scale: Scale,
    num_frets: u8,
    max_reach: u8,
}

impl ScaleFinderOptions {
    /// Return a builder with default limits
    pub fn builder() -> ScaleFinderOptionsBuilder {
        ScaleFinderOptionsBuilder::new()
    }

    /// Instrument tuning.
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Scale root.
    pub fn root(&self) -> NoteName {
        self.root
    }

    /// Scale searched.
    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    /// Pitch classes of the scale.
    pub fn scale_notes(&self) -> PitchClassSet {
        self.scale.pitch_classes(self.root)
    }
}

/// One hand position: the scale frets on each string within a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleFinderResult {
    start_fret: u8,
    marks: Vec<Vec<u8>>,
}

impl ScaleFinderResult {
    /// First fret of the window.
    pub fn start_fret(&self) -> u8 {
        self.start_fret
    }

    /// Frets to play, per string, ascending.
    pub fn marks(&self) -> &[Vec<u8>] {
        &self.marks
    }

    /// Total number of marked positions.
    pub fn mark_count(&self) -> usize {
        self.marks.iter().map(Vec::len).sum()
    }
}

/// Positions from one search, ordered by start fret.
#[derive(Debug, Clone)]
pub struct ScaleFinderResultSet {
    options: Arc<ScaleFinderOptions>,
    results: Vec<ScaleFinderResult>,
}

impl ScaleFinderResultSet {
    /// Options the search ran with.
    pub fn options(&self) -> &ScaleFinderOptions {
        &self.options
    }

    /// Positions in order.
    pub fn results(&self) -> &[ScaleFinderResult] {
        &self.results
    }

    /// Number of positions.
    pub fn count(&self) -> usize {
        self.results.len()
    }

    /// Whether nothing was found.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Finds hand positions covering every note of a scale.
#[derive(Debug, Clone, Default)]
pub struct ScaleFinder;

impl ScaleFinder {
    /// Create a finder
    pub fn new() -> Self {
        ScaleFinder
    }

    /// Find every position.
    pub fn find_scales(&self, options: &ScaleFinderOptions) -> Result<ScaleFinderResultSet, FinderError> {
        self.find_scales_with_cancel(options, &CancellationToken::new())
    }

    /// Find positions until done or `cancel` is set.
    pub fn find_scales_with_cancel(
        &self,
        options: &ScaleFinderOptions,
        cancel: &CancellationToken,
    ) -> Result<ScaleFinderResultSet, FinderError> {
        let target = options.scale_notes();
        log::debug!(
            "scale search: {} {} on `{}`",
            options.root,
            options.scale.name(),
            options.tuning.name()
        );

        let last_start = options.num_frets - (options.max_reach - 1);
        let mut results = Vec::new();
        for start in 0..=last_start {
            if cancel.is_cancelled() {
                log::info!("scale search cancelled at fret {start}");
                break;
            }
            let end = start + (options.max_reach - 1);

            let mut covered = PitchClassSet::new();
            let marks: Vec<Vec<u8>> = options
                .tuning
                .notes()
                .iter()
                .map(|open| {
                    (start..=end)
                        .filter(|&fret| {
                            let note = open.shift(i32::from(fret));
                            let hit = target.contains(note);
                            if hit {
                                covered.insert(note);
                            }
                            hit
                        })
                        .collect()
                })
                .collect();

            if covered == target {
                results.push(ScaleFinderResult {
                    start_fret: start,
                    marks,
                });
            }
        }

        log::debug!("scale search found {} positions", results.len());
        Ok(ScaleFinderResultSet {
            options: Arc::new(options.clone()),
            results,
        })
    }
}
