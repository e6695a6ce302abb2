//! `sales-etl` is a small batch job that turns a directory of sales CSV exports into one clean
//! table.
//!
//! A run has three stages, executed in order on one thread:
//!
//! 1. **Ingestion** ([`ingestion`]): every `*.csv` file in the input directory is decoded
//!    (UTF-8, falling back to Latin-1), tagged with its base name under `source_file`, and
//!    concatenated into one raw [`types::DataSet`] with the union of all columns.
//! 2. **Transformation** ([`processing::transform_data`]): columns are renamed to the canonical
//!    schema, dates and numbers are coerced (failures become null), rows are filtered on
//!    `STATUS` and completeness, and `TotalSales = Quantity * Price` is added.
//! 3. **Sinks** ([`sink`]): the result replaces the `sales` table in SQLite and is exported as
//!    a flat CSV file. Empty results are never written.
//!
//! [`pipeline::run`] wires the stages together; the `sales-etl` binary calls it with
//! [`config::PipelineConfig::default`].
//!
//! ## Example
//!
//! ```no_run
//! use sales_etl::config::PipelineConfig;
//! use sales_etl::pipeline::run;
//! use sales_etl::sink::SqliteStore;
//!
//! # fn main() -> Result<(), sales_etl::EtlError> {
//! let config = PipelineConfig::default();
//! let mut store = SqliteStore::open(&config.database_path)?;
//! let summary = run(&config, &mut store)?;
//! println!("rows={}", summary.output_rows);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: input discovery, decoding and the raw table
//! - [`processing`]: row filter/map/reduce helpers, cell coercion and the sales transform
//! - [`sink`]: SQLite table store and CSV export
//! - [`types`]: schema + in-memory dataset types
//! - [`config`], [`logging`], [`pipeline`]: run wiring
//! - [`error`]: the error type shared by all stages

pub mod config;
pub mod error;
pub mod ingestion;
pub mod logging;
pub mod pipeline;
pub mod processing;
pub mod sink;
pub mod types;

pub use error::{EtlError, EtlResult};
