//! Row-ordered, dynamically typed table with CSV input and output.

use super::value::{is_missing_token, Value};
use crate::error::{CleanError, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Column type inferred while reading CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    String,
}

/// An in-memory table: named columns and rows of [`Value`]s.
///
/// Rows keep their input order through every filtering step.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table, checking that every row has one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(CleanError::RaggedRow {
                    row: i,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Load a table from a CSV file with a header row.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a table from CSV text.
    ///
    /// Each column is typed from its non-missing values: integer if all
    /// parse as `i64`, float if all parse as `f64`, string otherwise.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
        if columns.is_empty() || (columns.len() == 1 && columns[0].is_empty()) {
            return Err(CleanError::EmptyData("CSV has no header row".to_string()));
        }

        let mut raw: Vec<Vec<String>> = Vec::new();
        for (row_idx, record) in rdr.records().enumerate() {
            let record = record?;
            if record.len() != columns.len() {
                return Err(CleanError::RaggedRow {
                    row: row_idx,
                    expected: columns.len(),
                    actual: record.len(),
                });
            }
            raw.push(record.iter().map(String::from).collect());
        }

        let kinds: Vec<ColumnKind> = (0..columns.len())
            .map(|col| infer_kind(&raw, col))
            .collect();

        let rows = raw
            .into_iter()
            .map(|fields| {
                fields
                    .into_iter()
                    .zip(&kinds)
                    .map(|(field, kind)| convert(field, *kind))
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Write the table as CSV to a file.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.to_writer(BufWriter::new(file))
    }

    /// Write the table as CSV.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|v| v.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// A single row.
    pub fn row(&self, idx: usize) -> Option<&[Value]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    /// Check whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Position of a column.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| CleanError::MissingColumn(name.to_string()))
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Result<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Numeric view of a column; `None` marks a missing value.
    ///
    /// Strings and timestamps are rejected.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| match &row[idx] {
                Value::Missing => Ok(None),
                v => v.as_f64().map(Some).ok_or_else(|| CleanError::NonNumeric {
                    column: name.to_string(),
                    row: row_idx,
                    value: v.to_string(),
                }),
            })
            .collect()
    }

    /// Keep the rows whose mask entry is `true`.
    pub fn select_rows(&self, mask: &[bool]) -> Result<Table> {
        if mask.len() != self.rows.len() {
            return Err(CleanError::InvalidParameter(format!(
                "row mask has {} entries but table has {} rows",
                mask.len(),
                self.rows.len()
            )));
        }
        let rows = self
            .rows
            .iter()
            .zip(mask)
            .filter(|(_, &keep)| keep)
            .map(|(row, _)| row.clone())
            .collect();
        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Replace every value of a column with `f(row_index, value)`.
    pub fn map_column<F>(&self, name: &str, mut f: F) -> Result<Table>
    where
        F: FnMut(usize, &Value) -> Result<Value>,
    {
        let idx = self.column_index(name)?;
        let mut rows = self.rows.clone();
        for (row_idx, row) in rows.iter_mut().enumerate() {
            row[idx] = f(row_idx, &row[idx])?;
        }
        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Number of missing values in a column.
    pub fn missing_count(&self, name: &str) -> Result<usize> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().filter(|row| row[idx].is_missing()).count())
    }
}

fn infer_kind(raw: &[Vec<String>], col: usize) -> ColumnKind {
    let mut kind = ColumnKind::Integer;
    for fields in raw {
        let field = &fields[col];
        if is_missing_token(field) {
            continue;
        }
        let s = field.trim();
        if kind == ColumnKind::Integer && s.parse::<i64>().is_err() {
            kind = ColumnKind::Float;
        }
        if kind == ColumnKind::Float && s.parse::<f64>().is_err() {
            return ColumnKind::String;
        }
    }
    kind
}

fn convert(field: String, kind: ColumnKind) -> Value {
    if is_missing_token(&field) {
        return Value::Missing;
    }
    // Kinds were inferred from these same fields, so the parses succeed.
    match kind {
        ColumnKind::Integer => field
            .trim()
            .parse()
            .map(Value::Integer)
            .unwrap_or(Value::Missing),
        ColumnKind::Float => field
            .trim()
            .parse()
            .map(Value::Float)
            .unwrap_or(Value::Missing),
        ColumnKind::String => Value::String(field),
    }
}
