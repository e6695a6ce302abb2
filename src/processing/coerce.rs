//! Per-cell type coercion.
//!
//! Each function maps one raw [`Value`] to an optional typed value. `None` means "could not be
//! coerced"; callers decide whether that turns into a null cell or a dropped row.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::{Value, DATETIME_FORMAT};

/// Value used for a missing category.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Parse a date/time cell.
///
/// Text is tried as RFC 3339 (converted to UTC), then against a fixed list of ISO and US
/// layouts with a time part, then date-only layouts (midnight). Cells that already hold a
/// date/time pass through. Anything else, numbers included, is `None`.
pub fn to_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::DateTime(dt) => Some(*dt),
        Value::Utf8(s) => parse_datetime_str(s.trim()),
        _ => None,
    }
}

fn parse_datetime_str(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a numeric cell. Non-finite results (`inf`, `NaN`) are `None`.
pub fn to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Int64(v) => *v as f64,
        Value::Float64(v) => *v,
        Value::Utf8(s) => s.trim().parse::<f64>().ok()?,
        Value::Null | Value::DateTime(_) => return None,
    };
    n.is_finite().then_some(n)
}

/// Render a cell as a category label. Nulls become [`UNKNOWN_CATEGORY`].
pub fn to_category(value: &Value) -> String {
    match value {
        Value::Null => UNKNOWN_CATEGORY.to_string(),
        Value::Utf8(s) => s.clone(),
        Value::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn parses_common_date_layouts() {
        let cases = [
            ("2003-02-24", dt(2003, 2, 24, 0, 0, 0)),
            ("2003-02-24 13:05:09", dt(2003, 2, 24, 13, 5, 9)),
            ("2003-02-24T13:05:09", dt(2003, 2, 24, 13, 5, 9)),
            ("2/24/2003 0:00", dt(2003, 2, 24, 0, 0, 0)),
            ("12/1/2004 15:30", dt(2004, 12, 1, 15, 30, 0)),
            ("02/24/2003", dt(2003, 2, 24, 0, 0, 0)),
            ("2003/02/24", dt(2003, 2, 24, 0, 0, 0)),
            ("2003-02-24T13:05:09+02:00", dt(2003, 2, 24, 11, 5, 9)),
        ];
        for (raw, expected) in cases {
            assert_eq!(to_datetime(&Value::text(raw)), Some(expected), "input {raw:?}");
        }
    }

    #[test]
    fn unparsable_dates_are_none() {
        assert_eq!(to_datetime(&Value::text("not-a-date")), None);
        assert_eq!(to_datetime(&Value::text("2003-02-30")), None);
        assert_eq!(to_datetime(&Value::Null), None);
        assert_eq!(to_datetime(&Value::Int64(20030224)), None);
    }

    #[test]
    fn numbers_parse_or_become_none() {
        assert_eq!(to_number(&Value::text("2")), Some(2.0));
        assert_eq!(to_number(&Value::text(" 3.5 ")), Some(3.5));
        assert_eq!(to_number(&Value::Int64(4)), Some(4.0));
        assert_eq!(to_number(&Value::text("abc")), None);
        assert_eq!(to_number(&Value::text("inf")), None);
        assert_eq!(to_number(&Value::Float64(f64::NAN)), None);
        assert_eq!(to_number(&Value::Null), None);
    }

    #[test]
    fn category_defaults_nulls_to_unknown() {
        assert_eq!(to_category(&Value::Null), "Unknown");
        assert_eq!(to_category(&Value::text("Motorcycles")), "Motorcycles");
        assert_eq!(to_category(&Value::Int64(7)), "7");
    }
}
