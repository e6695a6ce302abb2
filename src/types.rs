//! Core data model types.
//!
//! Every stage of the pipeline works on an in-memory [`DataSet`]: a [`Schema`] (an ordered list
//! of typed [`Field`]s) plus row-major [`Value`] storage.

use std::fmt;

use chrono::NaiveDateTime;

/// Text layout used whenever a [`Value::DateTime`] is rendered (CSV export, SQLite storage).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// UTF-8 string.
    Utf8,
    /// Date and time without a time zone.
    DateTime,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A list of fields describing the shape of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns `true` if a field with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }
}

/// A single loosely typed cell in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
    /// Date and time without a time zone.
    DateTime(NaiveDateTime),
}

impl Value {
    /// Convenience constructor for text cells.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Utf8(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Renders the cell the way it is written to flat files. Nulls render as an empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v:?}"),
            Self::Utf8(s) => f.write_str(s),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// A dataset with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate the values of one column, or `None` if the column does not exist.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Value> + use<'a>> {
        let idx = self.schema.index_of(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new dataset by applying `mapper` to every row.
    ///
    /// The returned dataset preserves the original schema.
    ///
    /// # Panics
    ///
    /// Panics if `mapper` returns a row with a different length than the schema field count.
    pub fn map_rows<F>(&self, mut mapper: F) -> Self
    where
        F: FnMut(&[Value]) -> Vec<Value>,
    {
        let expected_len = self.schema.fields.len();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let out = mapper(row.as_slice());
                assert!(
                    out.len() == expected_len,
                    "mapped row length {} does not match schema length {}",
                    out.len(),
                    expected_len
                );
                out
            })
            .collect();

        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Reduce (fold) all rows into an accumulator value.
    ///
    /// This is similar to `Iterator::fold`, but provides each row as `&[Value]`.
    pub fn reduce_rows<A, F>(&self, init: A, mut reducer: F) -> A
    where
        F: FnMut(A, &[Value]) -> A,
    {
        self.rows
            .iter()
            .fold(init, |acc, row| reducer(acc, row.as_slice()))
    }

    /// Rename columns through `lookup`; columns it returns `None` for keep their name.
    ///
    /// When several columns end up with the same name they are merged into the first one
    /// (keeping its position and type): each row takes the first non-null value among them.
    pub fn rename_columns<'a, F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut schema = Schema::default();
        let mut targets = Vec::with_capacity(self.schema.fields.len());
        for field in self.schema.fields {
            let name = lookup(&field.name).map_or(field.name.clone(), str::to_string);
            match schema.index_of(&name) {
                Some(idx) => targets.push(idx),
                None => {
                    targets.push(schema.fields.len());
                    schema.fields.push(Field::new(name, field.data_type));
                }
            }
        }

        let width = schema.fields.len();
        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                let mut out = vec![Value::Null; width];
                for (value, &target) in row.into_iter().zip(targets.iter()) {
                    if out[target].is_null() {
                        out[target] = value;
                    }
                }
                out
            })
            .collect();

        Self { schema, rows }
    }

    /// Add a column computed per row, or replace it in place if a column with the same name
    /// already exists.
    pub fn with_column<F>(mut self, field: Field, mut compute: F) -> Self
    where
        F: FnMut(&[Value]) -> Value,
    {
        match self.schema.index_of(&field.name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = compute(row.as_slice());
                }
                self.schema.fields[idx] = field;
            }
            None => {
                for row in &mut self.rows {
                    let v = compute(row.as_slice());
                    row.push(v);
                }
                self.schema.fields.push(field);
            }
        }
        self
    }

    /// Keep only the named columns, in the given order. Names not present are skipped.
    pub fn project(&self, names: &[&str]) -> Self {
        let idxs: Vec<usize> = names
            .iter()
            .filter_map(|name| self.schema.index_of(name))
            .collect();
        let schema = Schema::new(idxs.iter().map(|&i| self.schema.fields[i].clone()).collect());
        let rows = self
            .rows
            .iter()
            .map(|row| idxs.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Self { schema, rows }
    }

    /// Concatenate datasets row-wise, preserving part order and within-part row order.
    ///
    /// The resulting schema is the union of all part schemas, in first-seen column order.
    /// Rows from parts lacking a column get [`Value::Null`] there. A column seen with
    /// different types across parts keeps the first type it was seen with.
    pub fn concat(parts: Vec<DataSet>) -> Self {
        let mut schema = Schema::default();
        for part in &parts {
            for field in &part.schema.fields {
                if !schema.contains(&field.name) {
                    schema.fields.push(field.clone());
                }
            }
        }

        let total = parts.iter().map(DataSet::row_count).sum();
        let mut rows = Vec::with_capacity(total);
        for part in parts {
            let positions: Vec<usize> = part
                .schema
                .fields
                .iter()
                .filter_map(|f| schema.index_of(&f.name))
                .collect();
            for row in part.rows {
                let mut out = vec![Value::Null; schema.fields.len()];
                for (value, &pos) in row.into_iter().zip(positions.iter()) {
                    out[pos] = value;
                }
                rows.push(out);
            }
        }

        Self { schema, rows }
    }
}
