//! Table-store sink backed by SQLite.

use std::path::Path;

use rusqlite::types::{ToSqlOutput, Value as SqlValue};
use rusqlite::{params_from_iter, Connection, ToSql};

use crate::error::EtlResult;
use crate::types::{DataSet, DataType, Value, DATETIME_FORMAT};

/// A destination that can hold a whole [`DataSet`] under a table name.
pub trait TableSink {
    /// Replace the full contents of `table` with `dataset`, returning the number of rows written.
    ///
    /// Implementations must drop whatever the table held before (no append, no merge).
    fn replace_table(&mut self, table: &str, dataset: &DataSet) -> EtlResult<usize>;
}

/// Result of [`load_to_database`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The dataset was empty; the destination was left untouched.
    Skipped,
    /// The destination now holds exactly `rows` rows.
    Loaded { rows: usize },
    /// The write failed; the error was logged and swallowed.
    Failed { message: String },
}

/// Write `dataset` to `table`, replacing its previous contents.
///
/// Empty datasets are never written, so a bad run cannot clobber a good table. Write failures
/// are logged and reported as [`LoadOutcome::Failed`] instead of being returned as errors.
pub fn load_to_database<S>(dataset: &DataSet, table: &str, sink: &mut S) -> LoadOutcome
where
    S: TableSink + ?Sized,
{
    if dataset.is_empty() {
        tracing::warn!(table, "transformed data is empty, skipping database load");
        return LoadOutcome::Skipped;
    }

    match sink.replace_table(table, dataset) {
        Ok(rows) => {
            tracing::info!(table, rows, "loaded rows into table");
            LoadOutcome::Loaded { rows }
        }
        Err(e) => {
            tracing::error!(table, error = %e, "failed to load data to database");
            LoadOutcome::Failed {
                message: e.to_string(),
            }
        }
    }
}

/// SQLite-backed [`TableSink`]. Owns a single connection for the lifetime of the run.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> EtlResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> EtlResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TableSink for SqliteStore {
    fn replace_table(&mut self, table: &str, dataset: &DataSet) -> EtlResult<usize> {
        let columns: Vec<String> = dataset
            .schema
            .fields
            .iter()
            .map(|f| format!("{} {}", quote_ident(&f.name), sql_type(f.data_type)))
            .collect();
        let placeholders: Vec<String> = (1..=dataset.schema.fields.len())
            .map(|i| format!("?{i}"))
            .collect();

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table_q}; CREATE TABLE {table_q} ({cols});",
            table_q = quote_ident(table),
            cols = columns.join(", "),
        ))?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} VALUES ({})",
                quote_ident(table),
                placeholders.join(", ")
            ))?;
            for row in &dataset.rows {
                stmt.execute(params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;

        Ok(dataset.row_count())
    }
}

fn sql_type(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Int64 => "INTEGER",
        DataType::Float64 => "REAL",
        DataType::Utf8 => "TEXT",
        DataType::DateTime => "TIMESTAMP",
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Int64(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
            Value::Float64(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
            Value::Utf8(s) => ToSqlOutput::from(s.as_str()),
            Value::DateTime(dt) => {
                ToSqlOutput::Owned(SqlValue::Text(dt.format(DATETIME_FORMAT).to_string()))
            }
        })
    }
}
