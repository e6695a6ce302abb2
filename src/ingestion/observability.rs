use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::EtlError;

/// Severity classification for failed file reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// The file could not be ingested (malformed content).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Context about a single file being ingested.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// The input path.
    pub path: PathBuf,
}

/// Stats reported on successful ingestion of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Number of data rows read.
    pub rows: usize,
    /// Number of columns in the file header.
    pub columns: usize,
    /// Whether the file had to be decoded as Latin-1.
    pub latin1_fallback: bool,
}

/// Observer interface for per-file ingestion outcomes.
pub trait IngestionObserver: Send + Sync {
    /// Called when a file has been read into a table.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when a file is not valid UTF-8 and is re-decoded as Latin-1.
    fn on_encoding_fallback(&self, _ctx: &IngestionContext) {}

    /// Called when a file fails to ingest. The error is still returned to the caller.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &EtlError) {}
}

/// Severity for a failed file read.
pub fn severity_for_error(e: &EtlError) -> IngestionSeverity {
    match e {
        EtlError::Io(_) | EtlError::Glob(_) => IngestionSeverity::Critical,
        EtlError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        _ => IngestionSeverity::Error,
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_encoding_fallback(&self, ctx: &IngestionContext) {
        for o in &self.observers {
            o.on_encoding_fallback(ctx);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &EtlError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }
}

/// Emits ingestion events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        tracing::info!(
            path = %ctx.path.display(),
            rows = stats.rows,
            columns = stats.columns,
            latin1 = stats.latin1_fallback,
            "loaded csv file"
        );
    }

    fn on_encoding_fallback(&self, ctx: &IngestionContext) {
        tracing::warn!(path = %ctx.path.display(), "file is not valid UTF-8, decoding as Latin-1");
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &EtlError) {
        tracing::error!(path = %ctx.path.display(), ?severity, %error, "failed to load csv file");
    }
}
