//! Ingestion: input discovery, file decoding and the raw (all-text) table.
//!
//! Most callers should use [`find_csv_files`] followed by [`load_data`] (from [`unified`]),
//! which:
//!
//! - reads each file as UTF-8, falling back to Latin-1 for legacy exports
//! - tags every row with its originating file under [`SOURCE_FILE_COLUMN`]
//! - concatenates all files into one [`crate::types::DataSet`] with the union of their columns
//! - reports per-file outcomes to an [`IngestionObserver`]

pub mod csv;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver,
};
pub use unified::{find_csv_files, load_data, load_file, IngestionOptions, SOURCE_FILE_COLUMN};
