//! The sales transform: raw table in, canonical table out.
//!
//! Steps, in order:
//!
//! 1. empty input short-circuits
//! 2. source columns are renamed to canonical names ([`COLUMN_MAP`])
//! 3. `SaleDate`, `Quantity` and `Price` are coerced; failures become null
//! 4. `Category` is defaulted to [`UNKNOWN_CATEGORY`] (whole column if absent, per cell if null)
//! 5. rows whose `STATUS` is not in [`ACCEPTED_STATUSES`] are dropped
//! 6. rows missing any of [`REQUIRED_COLUMNS`] are dropped
//! 7. `TotalSales = Quantity * Price` is computed
//! 8. the table is projected onto [`OUTPUT_COLUMNS`]

use crate::error::{EtlError, EtlResult};
use crate::ingestion::SOURCE_FILE_COLUMN;
use crate::types::{DataSet, DataType, Field, Value};

use super::coerce::{to_category, to_datetime, to_number, UNKNOWN_CATEGORY};
use super::{filter, map};

pub const SALE_DATE: &str = "SaleDate";
pub const ITEM: &str = "Item";
pub const QUANTITY: &str = "Quantity";
pub const PRICE: &str = "Price";
pub const CATEGORY: &str = "Category";
pub const TOTAL_SALES: &str = "TotalSales";
pub const STATUS: &str = "STATUS";

/// Source column → canonical column.
pub const COLUMN_MAP: &[(&str, &str)] = &[
    ("ORDERDATE", SALE_DATE),
    ("PRODUCTCODE", ITEM),
    ("QUANTITYORDERED", QUANTITY),
    ("PRICEEACH", PRICE),
    ("PRODUCTLINE", CATEGORY),
];

pub const ACCEPTED_STATUSES: &[&str] = &["Shipped", "Resolved"];

/// Columns a canonical row must have a value for.
pub const REQUIRED_COLUMNS: &[&str] = &[SALE_DATE, ITEM, QUANTITY, PRICE];

/// Canonical column order.
pub const OUTPUT_COLUMNS: &[&str] = &[
    SALE_DATE,
    ITEM,
    QUANTITY,
    PRICE,
    CATEGORY,
    TOTAL_SALES,
    SOURCE_FILE_COLUMN,
];

/// How a transform run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformStatus {
    /// At least one canonical row was produced.
    Transformed,
    /// The raw table had no rows; it is returned unchanged.
    EmptyInput,
    /// Every row was dropped by the status or completeness filters.
    EmptyAfterCleaning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub dataset: DataSet,
    pub status: TransformStatus,
}

fn canonical_name(source: &str) -> Option<&'static str> {
    COLUMN_MAP
        .iter()
        .find(|(from, _)| *from == source)
        .map(|(_, to)| *to)
}

/// Transform a raw table into canonical sales records.
///
/// Returns [`EtlError::MissingColumn`] if the table has rows but no `STATUS` column. Every
/// other problem with the data (unparsable cells, missing optional columns) is handled by
/// nulling cells and dropping rows.
pub fn transform_data(raw: DataSet) -> EtlResult<TransformOutput> {
    if raw.is_empty() {
        tracing::warn!("raw table is empty, skipping transformation");
        return Ok(TransformOutput {
            dataset: raw,
            status: TransformStatus::EmptyInput,
        });
    }

    let ds = raw.rename_columns(canonical_name);
    let status_idx = ds
        .schema
        .index_of(STATUS)
        .ok_or_else(|| EtlError::MissingColumn {
            column: STATUS.to_string(),
        })?;

    let ds = coerce_column(ds, SALE_DATE, DataType::DateTime, |v| {
        to_datetime(v).map_or(Value::Null, Value::DateTime)
    });
    let ds = coerce_column(ds, QUANTITY, DataType::Float64, number_cell);
    let ds = coerce_column(ds, PRICE, DataType::Float64, number_cell);
    let ds = match ds.schema.index_of(CATEGORY) {
        Some(_) => coerce_column(ds, CATEGORY, DataType::Utf8, |v| Value::Utf8(to_category(v))),
        None => ds.with_column(Field::new(CATEGORY, DataType::Utf8), |_| {
            Value::text(UNKNOWN_CATEGORY)
        }),
    };
    // Absent text columns behave like all-null ones for the completeness check.
    let ds = ensure_column(ds, ITEM, DataType::Utf8);

    let ds = filter(&ds, |row| {
        matches!(row[status_idx].as_str(), Some(s) if ACCEPTED_STATUSES.contains(&s))
    });

    let required: Vec<usize> = REQUIRED_COLUMNS
        .iter()
        .filter_map(|name| ds.schema.index_of(name))
        .collect();
    let ds = filter(&ds, |row| required.iter().all(|&i| !row[i].is_null()));

    if ds.is_empty() {
        tracing::warn!("no valid rows left after cleaning");
        return Ok(TransformOutput {
            dataset: ds.project(OUTPUT_COLUMNS),
            status: TransformStatus::EmptyAfterCleaning,
        });
    }

    let ds = add_total_sales(ds);

    Ok(TransformOutput {
        dataset: ds.project(OUTPUT_COLUMNS),
        status: TransformStatus::Transformed,
    })
}

fn number_cell(v: &Value) -> Value {
    to_number(v).map_or(Value::Null, Value::Float64)
}

/// Replace `name` with `coerce` applied to each of its cells. An absent column is added as
/// all-null, which the completeness filter then rejects.
fn coerce_column<F>(ds: DataSet, name: &str, data_type: DataType, coerce: F) -> DataSet
where
    F: Fn(&Value) -> Value,
{
    match ds.schema.index_of(name) {
        Some(idx) => ds.with_column(Field::new(name, data_type), |row| coerce(&row[idx])),
        None => ds.with_column(Field::new(name, data_type), |_| Value::Null),
    }
}

fn ensure_column(ds: DataSet, name: &str, data_type: DataType) -> DataSet {
    if ds.schema.contains(name) {
        ds
    } else {
        ds.with_column(Field::new(name, data_type), |_| Value::Null)
    }
}

fn add_total_sales(ds: DataSet) -> DataSet {
    let (Some(q), Some(p)) = (ds.schema.index_of(QUANTITY), ds.schema.index_of(PRICE)) else {
        return ds;
    };
    let ds = ds.with_column(Field::new(TOTAL_SALES, DataType::Float64), |_| Value::Null);
    let total_idx = ds.schema.fields.len() - 1;
    map(&ds, |row| {
        let mut out = row.to_vec();
        if let (Value::Float64(qty), Value::Float64(price)) = (&row[q], &row[p]) {
            out[total_idx] = Value::Float64(qty * price);
        }
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Schema;

    fn raw(columns: &[&str], rows: &[&[&str]]) -> DataSet {
        let schema = Schema::new(
            columns
                .iter()
                .map(|c| Field::new(*c, DataType::Utf8))
                .collect(),
        );
        let rows = rows
            .iter()
            .map(|r| {
                r.iter()
                    .map(|c| if c.is_empty() { Value::Null } else { Value::text(*c) })
                    .collect()
            })
            .collect();
        DataSet::new(schema, rows)
    }

    const SALES_COLUMNS: &[&str] = &[
        "ORDERDATE",
        "PRODUCTCODE",
        "QUANTITYORDERED",
        "PRICEEACH",
        "PRODUCTLINE",
        "STATUS",
        "source_file",
    ];

    #[test]
    fn canonical_name_maps_only_known_columns() {
        assert_eq!(canonical_name("ORDERDATE"), Some("SaleDate"));
        assert_eq!(canonical_name("PRODUCTLINE"), Some("Category"));
        assert_eq!(canonical_name("STATUS"), None);
        assert_eq!(canonical_name("orderdate"), None);
    }

    #[test]
    fn empty_input_is_returned_unchanged() {
        let out = transform_data(DataSet::empty()).unwrap();
        assert_eq!(out.status, TransformStatus::EmptyInput);
        assert_eq!(out.dataset, DataSet::empty());
    }

    #[test]
    fn status_is_matched_exactly() {
        let ds = raw(
            SALES_COLUMNS,
            &[
                &["2003-01-01", "A", "1", "1", "Cars", "Shipped", "f.csv"],
                &["2003-01-01", "B", "1", "1", "Cars", "shipped", "f.csv"],
                &["2003-01-01", "C", "1", "1", "Cars", "Resolved", "f.csv"],
                &["2003-01-01", "D", "1", "1", "Cars", "On Hold", "f.csv"],
                &["2003-01-01", "E", "1", "1", "Cars", "", "f.csv"],
            ],
        );
        let out = transform_data(ds).unwrap();
        let items: Vec<_> = out.dataset.column(ITEM).unwrap().cloned().collect();
        assert_eq!(items, vec![Value::text("A"), Value::text("C")]);
    }

    #[test]
    fn rows_missing_required_fields_are_dropped() {
        let ds = raw(
            SALES_COLUMNS,
            &[
                &["2003-01-01", "A", "1", "1", "", "Shipped", "f.csv"],
                &["", "B", "1", "1", "", "Shipped", "f.csv"],
                &["2003-01-01", "", "1", "1", "", "Shipped", "f.csv"],
                &["2003-01-01", "C", "many", "1", "", "Shipped", "f.csv"],
                &["2003-01-01", "D", "1", "", "", "Shipped", "f.csv"],
            ],
        );
        let out = transform_data(ds).unwrap();
        assert_eq!(out.status, TransformStatus::Transformed);
        assert_eq!(out.dataset.row_count(), 1);
        assert_eq!(out.dataset.rows[0][1], Value::text("A"));
        // Null category survives as the default label.
        assert_eq!(out.dataset.rows[0][4], Value::text("Unknown"));
    }

    #[test]
    fn missing_status_column_is_an_error() {
        let ds = raw(&["ORDERDATE", "PRODUCTCODE"], &[&["2003-01-01", "A"]]);
        let err = transform_data(ds).unwrap_err();
        assert!(matches!(err, EtlError::MissingColumn { ref column } if column == "STATUS"));
    }

    #[test]
    fn missing_price_column_empties_the_table() {
        let ds = raw(
            &["ORDERDATE", "PRODUCTCODE", "QUANTITYORDERED", "STATUS"],
            &[&["2003-01-01", "A", "1", "Shipped"]],
        );
        let out = transform_data(ds).unwrap();
        assert_eq!(out.status, TransformStatus::EmptyAfterCleaning);
        assert!(out.dataset.is_empty());
    }

    #[test]
    fn output_has_canonical_columns_in_order() {
        let ds = raw(
            &[
                "STATUS",
                "PRICEEACH",
                "EXTRA",
                "QUANTITYORDERED",
                "PRODUCTCODE",
                "ORDERDATE",
                "source_file",
            ],
            &[&["Shipped", "2.5", "x", "4", "S10", "2004-05-06", "a.csv"]],
        );
        let out = transform_data(ds).unwrap();
        assert_eq!(
            out.dataset.schema.field_names().collect::<Vec<_>>(),
            OUTPUT_COLUMNS.to_vec()
        );
        let types: Vec<DataType> = out.dataset.schema.fields.iter().map(|f| f.data_type).collect();
        assert_eq!(
            types,
            vec![
                DataType::DateTime,
                DataType::Utf8,
                DataType::Float64,
                DataType::Float64,
                DataType::Utf8,
                DataType::Float64,
                DataType::Utf8,
            ]
        );
        assert_eq!(out.dataset.rows[0][5], Value::Float64(10.0));
    }

    #[test]
    fn total_sales_uses_plain_float_multiplication() {
        let ds = raw(
            SALES_COLUMNS,
            &[&["2003-01-01", "A", "3", "0.1", "Cars", "Shipped", "f.csv"]],
        );
        let out = transform_data(ds).unwrap();
        assert_eq!(out.dataset.rows[0][5], Value::Float64(3.0 * 0.1));
    }
}
