//! Flat-file (CSV) export.

use std::path::Path;

use crate::error::EtlResult;
use crate::types::DataSet;

/// Write `dataset` to `path` as comma-delimited text with a header row and no index column.
///
/// Any existing file is overwritten; missing parent directories are created. Returns the number
/// of data rows written.
pub fn export_csv(dataset: &DataSet, path: impl AsRef<Path>) -> EtlResult<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::Writer::from_path(path)?;
    write_csv(dataset, &mut wtr)?;
    wtr.flush()?;
    Ok(dataset.row_count())
}

/// Write header and rows to an existing CSV writer.
pub fn write_csv<W: std::io::Write>(dataset: &DataSet, wtr: &mut csv::Writer<W>) -> EtlResult<()> {
    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    Ok(())
}
