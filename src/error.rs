use thiserror::Error;

/// Errors when preparing or running a finder search
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FinderError {
    /// An invalid argument was provided to a finder.
    #[error("invalid argument `{arg}`: {msg}")]
    InvalidArgument {
        /// The name of the invalid argument.
        arg: &'static str,
        /// A description of the invalid argument.
        msg: String,
    },

    /// The fret marks do not have one entry per string.
    #[error("expected {expected} fret marks (one per string), got {got}")]
    LengthMismatch {
        /// Number of strings in the tuning.
        expected: usize,
        /// Number of marks provided.
        got: usize,
    },

    /// A background search worker failed before producing a result.
    #[error("search worker failed: {0}")]
    Worker(String),
}
