//! End-to-end run: discover → load → transform → sinks.

use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::error::EtlResult;
use crate::ingestion::{find_csv_files, load_data, IngestionOptions};
use crate::processing::transform::{SALE_DATE, TOTAL_SALES};
use crate::processing::{reduce, transform_data, ReduceOp, TransformStatus};
use crate::sink::{export_csv, load_to_database, LoadOutcome, TableSink};
use crate::types::Value;

/// What a run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub files_found: usize,
    pub raw_rows: usize,
    pub output_rows: usize,
    /// `None` when the run stopped before the sink stage (no input files).
    pub transform_status: Option<TransformStatus>,
    pub load: Option<LoadOutcome>,
    /// Set when the flat-file export was written.
    pub export_path: Option<PathBuf>,
    /// Sum of `TotalSales` over the exported rows, if any.
    pub total_sales: Option<f64>,
}

impl RunSummary {
    fn no_input() -> Self {
        Self {
            files_found: 0,
            raw_rows: 0,
            output_rows: 0,
            transform_status: None,
            load: None,
            export_path: None,
            total_sales: None,
        }
    }
}

/// Run the whole job against `sink`.
///
/// The sink is opened by the caller and only used for the single table write. Database write
/// failures are reported in [`RunSummary::load`]; every other error (unreadable input, missing
/// `STATUS` column, failed flat-file export) aborts the run.
pub fn run<S>(config: &PipelineConfig, sink: &mut S) -> EtlResult<RunSummary>
where
    S: TableSink + ?Sized,
{
    tracing::info!(input = %config.input_dir.display(), "starting ETL run");

    let files = find_csv_files(&config.input_dir)?;
    if files.is_empty() {
        tracing::warn!(input = %config.input_dir.display(), "no CSV files found");
        return Ok(RunSummary::no_input());
    }

    let raw = load_data(&files, &IngestionOptions::default())?;
    let raw_rows = raw.row_count();
    tracing::info!(files = files.len(), rows = raw_rows, "ingested raw data");

    let transformed = transform_data(raw)?;
    let canonical = transformed.dataset;

    let load = load_to_database(&canonical, &config.table_name, sink);

    let mut export_path = None;
    let mut total_sales = None;
    if !canonical.is_empty() {
        let rows = export_csv(&canonical, &config.output_file)?;
        tracing::info!(path = %config.output_file.display(), rows, "saved transformed data");
        export_path = Some(config.output_file.clone());

        if let Some(Value::Float64(total)) = reduce(&canonical, TOTAL_SALES, ReduceOp::Sum) {
            total_sales = Some(total);
        }
        let first = reduce(&canonical, SALE_DATE, ReduceOp::Min).unwrap_or(Value::Null);
        let last = reduce(&canonical, SALE_DATE, ReduceOp::Max).unwrap_or(Value::Null);
        tracing::info!(
            rows = canonical.row_count(),
            total_sales = total_sales.unwrap_or_default(),
            first_sale = %first,
            last_sale = %last,
            "ETL run finished"
        );
    } else {
        tracing::info!("ETL run finished without output");
    }

    Ok(RunSummary {
        files_found: files.len(),
        raw_rows,
        output_rows: canonical.row_count(),
        transform_status: Some(transformed.status),
        load: Some(load),
        export_path,
        total_sales,
    })
}
