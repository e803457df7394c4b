//! Inclusive range filtering on a numeric column.

use crate::data::Table;
use crate::error::{CleanError, Result};
use serde::{Deserialize, Serialize};

/// Inclusive acceptance interval for one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    /// Create bounds, rejecting NaN endpoints and inverted intervals.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if lower.is_nan() || upper.is_nan() {
            return Err(CleanError::InvalidParameter(
                "Bounds must not be NaN".to_string(),
            ));
        }
        if upper < lower {
            return Err(CleanError::InvalidParameter(format!(
                "upper bound {} is less than lower bound {}",
                upper, lower
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Check whether `value` lies in `[lower, upper]`.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Keep rows whose `column` value lies within `bounds`.
///
/// Missing values fail the predicate and their rows are dropped.
pub fn filter_range(table: &Table, column: &str, bounds: Bounds) -> Result<Table> {
    let values = table.numeric_column(column)?;
    let mask: Vec<bool> = values
        .iter()
        .map(|v| v.is_some_and(|x| bounds.contains(x)))
        .collect();
    table.select_rows(&mask)
}
