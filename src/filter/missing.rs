//! Removal of incomplete rows.

use crate::data::Table;
use crate::error::Result;

/// Drop every row that holds a missing value in any column.
pub fn drop_missing(table: &Table) -> Result<Table> {
    let mask: Vec<bool> = table
        .rows()
        .iter()
        .map(|row| !row.iter().any(|v| v.is_missing()))
        .collect();
    table.select_rows(&mask)
}
