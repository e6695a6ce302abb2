use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type EtlResult<T> = Result<T, EtlError>;

/// Error type returned by ingestion, transformation and sink functions.
///
/// Per-cell coercion failures are not errors; they surface as nulls and the affected rows are
/// dropped by the completeness filter.
#[derive(Debug, Error)]
pub enum EtlError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// SQLite error raised by the table store.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Invalid input file pattern.
    #[error("glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    /// A path matched by the input pattern could not be read.
    #[error("glob error: {0}")]
    Glob(#[from] glob::GlobError),

    /// A column the transform cannot do without is absent from the whole table.
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    /// The input does not have a usable tabular shape (ragged rows, duplicate headers, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },
}
