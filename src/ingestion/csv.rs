//! CSV reading with a UTF-8 → Latin-1 decoding fallback.

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{EtlError, EtlResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Text encoding a file was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

/// Decode raw file bytes.
///
/// A leading UTF-8 byte order mark is skipped. Bytes that are not valid UTF-8 are decoded as
/// ISO-8859-1 instead, which maps every byte to a character and therefore cannot fail.
pub fn decode_text(bytes: &[u8]) -> (Cow<'_, str>, TextEncoding) {
    let body = match Encoding::for_bom(bytes) {
        Some((enc, bom_len)) if enc == UTF_8 => &bytes[bom_len..],
        _ => bytes,
    };
    match UTF_8.decode_without_bom_handling_and_without_replacement(body) {
        Some(text) => (text, TextEncoding::Utf8),
        None => (encoding_rs::mem::decode_latin1(bytes), TextEncoding::Latin1),
    }
}

/// Read a CSV file into an all-text [`DataSet`].
///
/// Rules:
///
/// - The first record is the header.
/// - Every column is typed [`DataType::Utf8`]; empty cells become [`Value::Null`], other cells
///   are kept verbatim (surrounding whitespace included).
/// - Rows shorter than the header are padded with nulls; longer rows are an error.
pub fn read_csv_file(path: impl AsRef<Path>) -> EtlResult<(DataSet, TextEncoding)> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let (text, encoding) = decode_text(&bytes);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let ds = read_csv_from_reader(&mut rdr).map_err(|e| match e {
        EtlError::SchemaMismatch { message } => EtlError::SchemaMismatch {
            message: format!("{}: {message}", path.display()),
        },
        other => other,
    })?;
    Ok((ds, encoding))
}

/// Read CSV data from an existing reader. The reader must be configured with headers.
pub fn read_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> EtlResult<DataSet> {
    let headers = rdr.headers()?.clone();

    let mut fields: Vec<Field> = Vec::with_capacity(headers.len());
    for name in headers.iter() {
        if fields.iter().any(|f| f.name == name) {
            return Err(EtlError::SchemaMismatch {
                message: format!("duplicate column '{name}'"),
            });
        }
        fields.push(Field::new(name, DataType::Utf8));
    }
    let width = fields.len();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based, plus the header line.
        let user_row = row_idx0 + 2;
        let record = result?;
        if record.len() > width {
            return Err(EtlError::SchemaMismatch {
                message: format!(
                    "row {user_row} has {} fields, header has {width}",
                    record.len()
                ),
            });
        }

        let mut row: Vec<Value> = record.iter().map(raw_cell).collect();
        row.resize(width, Value::Null);
        rows.push(row);
    }

    Ok(DataSet::new(Schema::new(fields), rows))
}

fn raw_cell(raw: &str) -> Value {
    if raw.is_empty() {
        Value::Null
    } else {
        Value::Utf8(raw.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_text, read_csv_from_reader, TextEncoding};
    use crate::types::Value;

    #[test]
    fn cells_are_kept_verbatim() {
        let input = "STATUS,PRICEEACH\n Shipped ,\n";
        let mut rdr = csv::Reader::from_reader(input.as_bytes());
        let ds = read_csv_from_reader(&mut rdr).unwrap();
        assert_eq!(ds.rows, vec![vec![Value::text(" Shipped "), Value::Null]]);
    }

    #[test]
    fn utf8_bytes_decode_as_utf8() {
        let (text, enc) = decode_text("Café".as_bytes());
        assert_eq!(text, "Café");
        assert_eq!(enc, TextEncoding::Utf8);
    }

    #[test]
    fn utf8_bom_is_skipped() {
        let (text, enc) = decode_text(b"\xEF\xBB\xBFa,b");
        assert_eq!(text, "a,b");
        assert_eq!(enc, TextEncoding::Utf8);
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        let (text, enc) = decode_text(b"Caf\xE9 \x80");
        assert_eq!(text, "Caf\u{e9} \u{80}");
        assert_eq!(enc, TextEncoding::Latin1);
    }
}
