//! Interquartile-range outlier rejection.
//!
//! Bounds follow the 1.5 × IQR rule:
//!
//! ```text
//! iqr   = q3 - q1
//! lower = q1 - 1.5 * iqr
//! upper = q3 + 1.5 * iqr
//! ```
//!
//! where `q1` and `q3` are the 25th and 75th percentiles computed with linear
//! interpolation between ranks.

use super::range::{filter_range, Bounds};
use crate::data::Table;
use crate::error::{CleanError, Result};

/// Multiplier applied to the IQR on each side.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Percentile of already sorted, non-empty data with linear interpolation.
///
/// Uses rank `h = (n - 1) * p`, interpolating between the two neighbouring
/// order statistics.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = h - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// First and third quartiles of a series, ignoring missing values.
pub fn quartiles(values: &[Option<f64>]) -> Option<(f64, f64)> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    present.sort_by(f64::total_cmp);
    let q1 = quantile_sorted(&present, 0.25)?;
    let q3 = quantile_sorted(&present, 0.75)?;
    Some((q1, q3))
}

/// Outlier bounds for a series from its quartiles.
///
/// Missing values are ignored. A series with no values at all is an error
/// rather than a pair of NaN bounds.
pub fn iqr_bounds(column: &str, values: &[Option<f64>]) -> Result<Bounds> {
    let (q1, q3) =
        quartiles(values).ok_or_else(|| CleanError::EmptySeries(column.to_string()))?;
    Ok(bounds_from_quartiles(q1, q3))
}

/// Apply the 1.5 × IQR rule to a pair of quartiles.
pub fn bounds_from_quartiles(q1: f64, q3: f64) -> Bounds {
    let iqr = q3 - q1;
    Bounds {
        lower: q1 - IQR_MULTIPLIER * iqr,
        upper: q3 + IQR_MULTIPLIER * iqr,
    }
}

/// Drop rows whose `column` value falls outside its IQR outlier bounds.
///
/// Bounds are estimated on `table` as given, so callers control which rows
/// have already been pruned. Returns the filtered table and the bounds used.
pub fn filter_iqr(table: &Table, column: &str) -> Result<(Table, Bounds)> {
    let values = table.numeric_column(column)?;
    let bounds = iqr_bounds(column, &values)?;
    log::debug!("IQR bounds for '{}': {}", column, bounds);
    let filtered = filter_range(table, column, bounds)?;
    Ok((filtered, bounds))
}
