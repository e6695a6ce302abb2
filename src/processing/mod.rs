//! In-memory data transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion.
//!
//! - [`filter()`]: row filtering by predicate
//! - [`map()`]: row mapping by user function
//! - [`reduce()`]: column reductions (count/sum/min/max)
//! - [`coerce`]: per-cell conversions that return `None` instead of failing
//! - [`transform_data()`]: the raw → canonical sales transform built from the above
//!
//! ## Example: raw rows → canonical rows
//!
//! ```rust
//! use sales_etl::processing::{reduce, transform_data, ReduceOp, TransformStatus};
//! use sales_etl::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let columns = ["ORDERDATE", "PRODUCTCODE", "QUANTITYORDERED", "PRICEEACH", "STATUS"];
//! let schema = Schema::new(columns.iter().map(|c| Field::new(*c, DataType::Utf8)).collect());
//! let row = |date: &str, status: &str| -> Vec<Value> {
//!     [date, "S10_1678", "2", "3.5", status].into_iter().map(Value::text).collect()
//! };
//! let raw = DataSet::new(
//!     schema,
//!     vec![row("2003-02-24", "Shipped"), row("2003-02-25", "Cancelled")],
//! );
//!
//! let out = transform_data(raw).unwrap();
//! assert_eq!(out.status, TransformStatus::Transformed);
//! assert_eq!(out.dataset.row_count(), 1);
//! assert_eq!(
//!     reduce(&out.dataset, "TotalSales", ReduceOp::Sum),
//!     Some(Value::Float64(7.0))
//! );
//! ```

pub mod coerce;
pub mod filter;
pub mod map;
pub mod reduce;
pub mod transform;

pub use filter::filter;
pub use map::map;
pub use reduce::{reduce, ReduceOp};
pub use transform::{transform_data, TransformOutput, TransformStatus};
