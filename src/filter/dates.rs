//! Reparsing of date columns.

use crate::data::{parse_timestamp, Table, Value};
use crate::error::{CleanError, Result};

/// Convert every value of `column` into a [`Value::Timestamp`].
///
/// Timestamps pass through unchanged. Any value that is not a parseable
/// date, including a missing value, fails the whole call.
pub fn parse_dates(table: &Table, column: &str) -> Result<Table> {
    table.map_column(column, |row, value| match value {
        Value::Timestamp(_) => Ok(value.clone()),
        other => {
            let raw = other.to_string();
            parse_timestamp(&raw)
                .map(Value::Timestamp)
                .ok_or_else(|| CleanError::DateParse {
                    column: column.to_string(),
                    row,
                    value: raw,
                })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn review_table(values: Vec<Value>) -> Table {
        let rows = values.into_iter().map(|v| vec![v]).collect();
        Table::new(vec!["last_review".into()], rows).unwrap()
    }

    #[test]
    fn test_parse_dates() {
        let table = review_table(vec![
            Value::String("2018-10-19".into()),
            Value::String("2019-05-21".into()),
        ]);
        let parsed = parse_dates(&table, "last_review").unwrap();

        let expected = NaiveDate::from_ymd_opt(2018, 10, 19)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parsed.row(0).unwrap()[0], Value::Timestamp(expected));
        assert_eq!(parsed.row(1).unwrap()[0].to_string(), "2019-05-21");
    }

    #[test]
    fn test_parse_dates_is_idempotent() {
        let table = review_table(vec![Value::String("2019-07-05".into())]);
        let once = parse_dates(&table, "last_review").unwrap();
        let twice = parse_dates(&once, "last_review").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_parse_failure_is_fatal() {
        let table = review_table(vec![
            Value::String("2019-07-05".into()),
            Value::String("last spring".into()),
        ]);
        let err = parse_dates(&table, "last_review").unwrap_err();
        assert!(matches!(
            err,
            CleanError::DateParse { row: 1, ref value, .. } if value == "last spring"
        ));
    }

    #[test]
    fn test_missing_value_is_fatal() {
        let table = review_table(vec![Value::Missing]);
        assert!(matches!(
            parse_dates(&table, "last_review"),
            Err(CleanError::DateParse { row: 0, .. })
        ));
    }

    #[test]
    fn test_fractional_seconds_survive_csv_round_trip() {
        let table = review_table(vec![Value::String("2019-05-21T13:45:00.500Z".into())]);
        let parsed = parse_dates(&table, "last_review").unwrap();

        let mut buf = Vec::new();
        parsed.to_writer(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "last_review\n2019-05-21 13:45:00.500\n");

        let reloaded = Table::from_reader(text.as_bytes()).unwrap();
        let reparsed = parse_dates(&reloaded, "last_review").unwrap();
        assert_eq!(reparsed, parsed);
    }
}
