//! Fixed run configuration.
//!
//! The job takes no flags, environment variables or config files; [`PipelineConfig::default`]
//! is what the binary runs with. Tests build the struct directly to point it at temp paths.

use std::path::PathBuf;

pub const INPUT_DATA_PATH: &str = "./data/input/";
pub const OUTPUT_FILE_PATH: &str = "./data/processed/processed_sales_data.csv";
pub const DB_FILE_PATH: &str = "sales_data.db";
pub const SALES_TABLE: &str = "sales";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory scanned (non-recursively) for `*.csv` inputs.
    pub input_dir: PathBuf,
    /// Flat-file export destination.
    pub output_file: PathBuf,
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Destination table inside the database.
    pub table_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(INPUT_DATA_PATH),
            output_file: PathBuf::from(OUTPUT_FILE_PATH),
            database_path: PathBuf::from(DB_FILE_PATH),
            table_name: SALES_TABLE.to_string(),
        }
    }
}
