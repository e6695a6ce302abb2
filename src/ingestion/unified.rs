//! Directory discovery and multi-file loading.
//!
//! [`find_csv_files`] lists the inputs, [`load_data`] reads each of them with
//! [`super::csv::read_csv_file`], tags every row with its origin and concatenates the results
//! into one raw table.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::EtlResult;
use crate::types::{DataSet, DataType, Field, Value};

use super::csv::{read_csv_file, TextEncoding};
use super::observability::{
    severity_for_error, IngestionContext, IngestionObserver, IngestionStats, TracingObserver,
};

/// Column added to every raw row, holding the base name of the file the row came from.
pub const SOURCE_FILE_COLUMN: &str = "source_file";

/// Find all non-hidden `*.csv` files directly inside `dir` (non-recursive), sorted by path.
///
/// A directory that does not exist yields an empty list.
pub fn find_csv_files(dir: impl AsRef<Path>) -> EtlResult<Vec<PathBuf>> {
    let dir = glob::Pattern::escape(&dir.as_ref().to_string_lossy());
    let pattern = Path::new(&dir).join("*.csv");

    // Hidden files (`.backup.csv`) are not inputs.
    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..glob::MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(&pattern.to_string_lossy(), options)? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Options controlling multi-file loading.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Receives per-file outcomes.
    pub observer: Arc<dyn IngestionObserver>,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions").finish_non_exhaustive()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            observer: Arc::new(TracingObserver),
        }
    }
}

/// Read one file and append the `source_file` column.
pub fn load_file(path: impl AsRef<Path>, options: &IngestionOptions) -> EtlResult<DataSet> {
    let path = path.as_ref();
    let ctx = IngestionContext {
        path: path.to_path_buf(),
    };

    let (ds, encoding) = match read_csv_file(path) {
        Ok(out) => out,
        Err(e) => {
            options.observer.on_failure(&ctx, severity_for_error(&e), &e);
            return Err(e);
        }
    };
    if encoding == TextEncoding::Latin1 {
        options.observer.on_encoding_fallback(&ctx);
    }
    options.observer.on_success(
        &ctx,
        IngestionStats {
            rows: ds.row_count(),
            columns: ds.schema.fields.len(),
            latin1_fallback: encoding == TextEncoding::Latin1,
        },
    );

    let base_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ds.with_column(Field::new(SOURCE_FILE_COLUMN, DataType::Utf8), |_| {
        Value::Utf8(base_name.clone())
    }))
}

/// Load and concatenate every file in `paths`, in the given order.
///
/// The first file that cannot be read aborts the load. If no file contributes any row, the
/// result is an empty table without columns.
pub fn load_data(paths: &[PathBuf], options: &IngestionOptions) -> EtlResult<DataSet> {
    let mut parts = Vec::with_capacity(paths.len());
    for path in paths {
        parts.push(load_file(path, options)?);
    }
    if parts.iter().all(DataSet::is_empty) {
        return Ok(DataSet::empty());
    }
    Ok(DataSet::concat(parts))
}
