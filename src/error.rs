//! Error kinds for the search-result assembly pipeline.

use thiserror::Error;

/// All errors that can occur while searching, merging, or projecting
/// sub-results.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Shape mismatch between two sub-results passed to `merge`
    /// (differing `nq`, `topk`/`radius`, `metric`, or `round_decimal`).
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Invalid or contradictory configuration: a half-specified radius band,
    /// a non-positive `topk`/`dim`/`nq`, or an unknown metric.
    #[error("invalid config: {0}")]
    Config(String),

    /// The underlying numeric kernel raised a failure.
    #[error("kernel error: {0}")]
    Kernel(String),

    /// An invariant that only upstream corruption can violate: a bitset
    /// contract breach, or a candidate distance outside the range kernel's
    /// own polarity assertion.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl Error {
    /// Build a [`Error::Precondition`].
    pub fn precondition(message: impl Into<String>) -> Self {
        Error::Precondition(message.into())
    }

    /// Build a [`Error::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Build a [`Error::Kernel`].
    pub fn kernel(message: impl Into<String>) -> Self {
        Error::Kernel(message.into())
    }

    /// Raise an [`Error::Invariant`]. In debug builds this panics immediately,
    /// matching the "fatal unless assertions are disabled" semantics of the
    /// original system; in release builds it is returned for the caller to
    /// surface.
    pub fn invariant(message: impl Into<String>) -> Self {
        let message = message.into();
        debug_assert!(false, "invariant violated: {message}");
        Error::Invariant(message)
    }
}

/// Result type alias for this crate's operations.
pub type Result<T> = std::result::Result<T, Error>;
