//! Sinks: where the canonical table ends up.
//!
//! - [`load_to_database`] writes to a [`TableSink`] (normally a [`SqliteStore`]) with replace
//!   semantics and never propagates write failures.
//! - [`export_csv`] writes the flat-file copy; its errors are returned to the caller.

pub mod database;
pub mod flat_file;

pub use database::{load_to_database, LoadOutcome, SqliteStore, TableSink};
pub use flat_file::{export_csv, write_csv};
