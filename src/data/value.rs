//! Cell values for listing tables.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use std::fmt;

/// Tokens read as a missing value. Matches the usual dataframe defaults.
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Floating-point number.
    Float(f64),
    /// Integer.
    Integer(i64),
    /// Free text.
    String(String),
    /// Date or date-time, produced by date reparsing.
    Timestamp(NaiveDateTime),
    /// Missing value.
    Missing,
}

impl Value {
    /// Check if this is a missing value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view of the value. Integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get as timestamp.
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }
}

/// Renders the value the way it is written to CSV.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Timestamp(t) => {
                if t.time() == chrono::NaiveTime::MIN {
                    write!(f, "{}", t.format("%Y-%m-%d"))
                } else if t.nanosecond() != 0 {
                    write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S%.f"))
                } else {
                    write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            Value::Missing => Ok(()),
        }
    }
}

/// Check whether a raw CSV field denotes a missing value.
///
/// Surrounding whitespace is ignored, as it is for numbers.
pub fn is_missing_token(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw.trim())
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parse a date or date-time string.
///
/// Accepts ISO dates, ISO date-times (with `T` or a space, optionally with
/// fractional seconds), RFC 3339 (converted to naive UTC) and US-style
/// `MM/DD/YYYY`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(chrono::NaiveTime::MIN));
        }
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.naive_utc())
}
