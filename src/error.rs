//! Error types for the extract-transform-report pipelines.

use std::path::PathBuf;

/// Errors that end a pipeline run.
///
/// Malformed rows are not errors: they are dropped and counted during
/// normalization. An empty result is reported through
/// [`crate::pipeline::RunOutcome::NoData`].
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The library database is missing, unreadable or not a SQLite file.
    #[error("cannot open photo library database at {}: {reason}", path.display())]
    Connection { path: PathBuf, reason: String },

    /// A read query failed.
    #[error("database query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// CSV serialization failed.
    #[error("CSV export failed: {0}")]
    Export(#[from] csv::Error),

    /// Filesystem failure while writing artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chart drawing or PNG encoding failed.
    #[error("chart rendering failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
