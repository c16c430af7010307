//! Error taxonomy for the core analysis and filtering operations.

/// Errors produced by signal analysis and filter design.
///
/// All core operations fail fast with one of these variants. A failure is
/// either a caller bug (bad input) or genuinely undefined math, never a
/// transient condition, so there is no retry semantics anywhere.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Degenerate input: empty signal, zero-length filter, or a band
    /// selection with no bins where a ratio/log would be undefined.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Malformed stop-band specification: overlapping bands, bands outside
    /// the representable range, or non-monotonic frequency breakpoints.
    #[error("invalid filter spec: {0}")]
    InvalidSpec(String),

    /// Two signals (or a signal and a filter) have different sample rates.
    #[error("sample rate mismatch: expected {expected} Hz, got {actual} Hz")]
    MismatchedRate {
        /// Sample rate of the first operand.
        expected: u32,
        /// Sample rate of the second operand.
        actual: u32,
    },
}

/// Convenience result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
