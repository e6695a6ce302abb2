//! Column reductions for [`crate::types::DataSet`], used for run summaries.

use crate::types::{DataSet, DataType, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all rows (including nulls).
    Count,
    /// Sum numeric values, ignoring nulls.
    Sum,
    /// Minimum value, ignoring nulls. Works on numbers and date/times.
    Min,
    /// Maximum value, ignoring nulls. Works on numbers and date/times.
    Max,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - For `Sum`/`Min`/`Max`, returns `Some(Value::Null)` if there are no non-null values, or if
///   the operation does not apply to the column type (e.g. summing text or dates).
/// - For `Count`, always returns `Some(Value::Int64(row_count))`.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = dataset.schema.index_of(column)?;
    let data_type = dataset.schema.fields[idx].data_type;

    let result = match (op, data_type) {
        (ReduceOp::Count, _) => Value::Int64(dataset.row_count() as i64),
        (ReduceOp::Sum, DataType::Float64) => fold_column(dataset, idx, |acc: Option<f64>, v| {
            match v {
                Value::Float64(x) => Some(acc.unwrap_or(0.0) + x),
                _ => acc,
            }
        })
        .map_or(Value::Null, Value::Float64),
        (ReduceOp::Sum, DataType::Int64) => fold_column(dataset, idx, |acc: Option<i64>, v| {
            match v {
                Value::Int64(x) => Some(acc.unwrap_or(0) + x),
                _ => acc,
            }
        })
        .map_or(Value::Null, Value::Int64),
        (ReduceOp::Min | ReduceOp::Max, _) => extreme(dataset, idx, op),
        (ReduceOp::Sum, _) => Value::Null,
    };
    Some(result)
}

fn fold_column<A, F>(dataset: &DataSet, idx: usize, mut f: F) -> Option<A>
where
    F: FnMut(Option<A>, &Value) -> Option<A>,
{
    dataset.reduce_rows(None, |acc, row| f(acc, &row[idx]))
}

fn extreme(dataset: &DataSet, idx: usize, op: ReduceOp) -> Value {
    let keep_new = |ord: std::cmp::Ordering| match op {
        ReduceOp::Min => ord.is_lt(),
        _ => ord.is_gt(),
    };
    let best = fold_column(dataset, idx, |acc: Option<Value>, v| {
        if v.is_null() {
            return acc;
        }
        let Some(cur) = acc.as_ref() else {
            return Some(v.clone());
        };
        let ord = match (cur, v) {
            (Value::Float64(a), Value::Float64(b)) => b.partial_cmp(a),
            (Value::Int64(a), Value::Int64(b)) => Some(b.cmp(a)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(b.cmp(a)),
            _ => None,
        };
        match ord {
            Some(o) if keep_new(o) => Some(v.clone()),
            _ => acc,
        }
    });
    match best {
        Some(v @ (Value::Float64(_) | Value::Int64(_) | Value::DateTime(_))) => v,
        _ => Value::Null,
    }
}
