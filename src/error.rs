//! Error types for the stopuhr crate.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while timing or exporting.
///
/// Panics raised inside a timed block are never converted into this type:
/// they propagate unchanged after the timer's exit bookkeeping has run.
#[derive(Debug, Error)]
pub enum Error {
    /// `stop` was called for a label with no pending `start`.
    #[error("label '{0}' was never started")]
    NotStarted(String),

    /// Export was requested but the crate was built without the `export`
    /// feature carrying the tabular dependencies.
    #[error("export is unavailable: stopuhr was built without the `export` feature")]
    ExportUnavailable,

    /// Export was requested from a chronometer configured with
    /// totals-only retention, so there are no samples to tabulate.
    #[error("export is unavailable: samples are not retained in totals-only mode")]
    SamplesNotRetained,

    #[cfg(feature = "export")]
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "export")]
    #[error("failed to flush csv output: {0}")]
    Io(#[from] std::io::Error),
}
