//! Pipeline runner for composing and executing cleaning steps.

use crate::data::Table;
use crate::error::{CleanError, Result};
use crate::filter::{
    drop_missing, filter_bounding_box, filter_iqr, filter_range, parse_dates, BoundingBox,
    Bounds, NYC_BOUNDING_BOX,
};
use serde::{Deserialize, Serialize};

/// Nightly price column.
pub const PRICE: &str = "price";
/// Review count column.
pub const NUMBER_OF_REVIEWS: &str = "number_of_reviews";
/// Minimum stay column.
pub const MINIMUM_NIGHTS: &str = "minimum_nights";
/// Listings-per-host column.
pub const CALCULATED_HOST_LISTINGS_COUNT: &str = "calculated_host_listings_count";
pub const LONGITUDE: &str = "longitude";
pub const LATITUDE: &str = "latitude";
/// Date of the most recent review.
pub const LAST_REVIEW: &str = "last_review";

/// Accepted range for `calculated_host_listings_count`.
pub const HOST_LISTINGS_RANGE: (f64, f64) = (0.0, 10.0);

/// A step in the cleaning pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CleaningStep {
    /// Keep rows with `min <= column <= max`.
    FilterRange { column: String, min: f64, max: f64 },
    /// Keep rows inside the 1.5 × IQR bounds of `column`, estimated on the
    /// rows that reach this step.
    FilterIqr { column: String },
    /// Keep rows whose coordinates lie inside a bounding box.
    FilterBoundingBox {
        longitude_column: String,
        latitude_column: String,
        bbox: BoundingBox,
    },
    /// Drop rows with a missing value in any column.
    DropMissing,
    /// Reparse a column into timestamps.
    ParseDates { column: String },
}

impl CleaningStep {
    /// Columns the step reads.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            CleaningStep::FilterRange { column, .. }
            | CleaningStep::FilterIqr { column }
            | CleaningStep::ParseDates { column } => vec![column.as_str()],
            CleaningStep::FilterBoundingBox {
                longitude_column,
                latitude_column,
                ..
            } => vec![longitude_column.as_str(), latitude_column.as_str()],
            CleaningStep::DropMissing => Vec::new(),
        }
    }

    /// Short human-readable description.
    pub fn describe(&self) -> String {
        match self {
            CleaningStep::FilterRange { column, .. } => format!("range filter on '{}'", column),
            CleaningStep::FilterIqr { column } => format!("IQR filter on '{}'", column),
            CleaningStep::FilterBoundingBox {
                longitude_column,
                latitude_column,
                ..
            } => format!(
                "bounding box on '{}'/'{}'",
                longitude_column, latitude_column
            ),
            CleaningStep::DropMissing => "drop missing".to_string(),
            CleaningStep::ParseDates { column } => format!("parse dates in '{}'", column),
        }
    }
}

/// Pipeline configuration for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Name of the pipeline.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Steps to execute.
    pub steps: Vec<CleaningStep>,
}

impl PipelineConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(CleanError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(CleanError::from)
    }
}

/// What one step did to the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageReport {
    /// Step description.
    pub step: String,
    /// Bounds applied, when the step is a range test.
    pub bounds: Option<Bounds>,
    /// Rows entering the step.
    pub n_before: usize,
    /// Rows leaving the step.
    pub n_after: usize,
}

impl StageReport {
    /// Number of rows the step removed.
    pub fn n_removed(&self) -> usize {
        self.n_before.saturating_sub(self.n_after)
    }
}

impl std::fmt::Display for StageReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} -> {} rows ({} removed)",
            self.step,
            self.n_before,
            self.n_after,
            self.n_removed()
        )?;
        if let Some(bounds) = &self.bounds {
            write!(f, ", bounds {}", bounds)?;
        }
        Ok(())
    }
}

/// Cleaned table with per-step statistics.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    /// The cleaned table.
    pub table: Table,
    /// One report per executed step, in order.
    pub reports: Vec<StageReport>,
}

impl CleaningOutcome {
    /// Rows before the first step.
    pub fn n_input(&self) -> usize {
        self.reports
            .first()
            .map_or(self.table.n_rows(), |r| r.n_before)
    }

    /// Rows after the last step.
    pub fn n_output(&self) -> usize {
        self.table.n_rows()
    }
}

impl std::fmt::Display for CleaningOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cleaning Result")?;
        writeln!(f, "  Rows before: {}", self.n_input())?;
        writeln!(f, "  Rows after:  {}", self.n_output())?;
        for report in &self.reports {
            writeln!(f, "  {}", report)?;
        }
        Ok(())
    }
}

/// Builder for constructing and running cleaning pipelines.
#[derive(Debug, Clone)]
pub struct Pipeline {
    steps: Vec<CleaningStep>,
    name: String,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            name: "unnamed".to_string(),
        }
    }

    /// Create from a config.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            steps: config.steps.clone(),
            name: config.name.clone(),
        }
    }

    /// Set the pipeline name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Pipeline name.
    pub fn pipeline_name(&self) -> &str {
        &self.name
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[CleaningStep] {
        &self.steps
    }

    /// Keep rows with `min <= column <= max`.
    pub fn filter_range(mut self, column: &str, min: f64, max: f64) -> Self {
        self.steps.push(CleaningStep::FilterRange {
            column: column.to_string(),
            min,
            max,
        });
        self
    }

    /// Drop IQR outliers of `column`.
    ///
    /// Bounds come from the rows still present when this step runs, so the
    /// position of the step in the pipeline matters.
    pub fn filter_iqr(mut self, column: &str) -> Self {
        self.steps.push(CleaningStep::FilterIqr {
            column: column.to_string(),
        });
        self
    }

    /// Keep rows inside a bounding box.
    pub fn filter_bounding_box(
        mut self,
        longitude_column: &str,
        latitude_column: &str,
        bbox: BoundingBox,
    ) -> Self {
        self.steps.push(CleaningStep::FilterBoundingBox {
            longitude_column: longitude_column.to_string(),
            latitude_column: latitude_column.to_string(),
            bbox,
        });
        self
    }

    /// Drop rows with any missing value.
    pub fn drop_missing(mut self) -> Self {
        self.steps.push(CleaningStep::DropMissing);
        self
    }

    /// Reparse a column into timestamps.
    pub fn parse_dates(mut self, column: &str) -> Self {
        self.steps.push(CleaningStep::ParseDates {
            column: column.to_string(),
        });
        self
    }

    /// Convert to config for serialization.
    pub fn to_config(&self, description: Option<&str>) -> PipelineConfig {
        PipelineConfig {
            name: self.name.clone(),
            description: description.map(String::from),
            steps: self.steps.clone(),
        }
    }

    /// Check parameters and that every referenced column exists in `table`.
    pub fn validate(&self, table: &Table) -> Result<()> {
        if self.steps.is_empty() {
            return Err(CleanError::Pipeline(format!(
                "pipeline '{}' has no steps",
                self.name
            )));
        }
        for step in &self.steps {
            if let CleaningStep::FilterRange { min, max, .. } = step {
                Bounds::new(*min, *max)?;
            }
            for column in step.columns() {
                if !table.has_column(column) {
                    return Err(CleanError::MissingColumn(column.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Run the pipeline on a table. The input is left untouched.
    pub fn run(&self, table: &Table) -> Result<CleaningOutcome> {
        self.validate(table)?;

        let mut current = table.clone();
        let mut reports = Vec::with_capacity(self.steps.len());

        for (i, step) in self.steps.iter().enumerate() {
            let n_before = current.n_rows();
            let (next, bounds) = apply(&current, step).map_err(|e| CleanError::Step {
                index: i + 1,
                step: step.describe(),
                source: Box::new(e),
            })?;
            let report = StageReport {
                step: step.describe(),
                bounds,
                n_before,
                n_after: next.n_rows(),
            };
            log::info!("[{}] step {}: {}", self.name, i + 1, report);
            reports.push(report);
            current = next;
        }

        Ok(CleaningOutcome {
            table: current,
            reports,
        })
    }
}

fn apply(table: &Table, step: &CleaningStep) -> Result<(Table, Option<Bounds>)> {
    match step {
        CleaningStep::FilterRange { column, min, max } => {
            let bounds = Bounds::new(*min, *max)?;
            Ok((filter_range(table, column, bounds)?, Some(bounds)))
        }
        CleaningStep::FilterIqr { column } => {
            let (filtered, bounds) = filter_iqr(table, column)?;
            Ok((filtered, Some(bounds)))
        }
        CleaningStep::FilterBoundingBox {
            longitude_column,
            latitude_column,
            bbox,
        } => Ok((
            filter_bounding_box(table, longitude_column, latitude_column, bbox)?,
            None,
        )),
        CleaningStep::DropMissing => Ok((drop_missing(table)?, None)),
        CleaningStep::ParseDates { column } => Ok((parse_dates(table, column)?, None)),
    }
}

/// The standard listing-cleaning pipeline.
///
/// Steps, in order: price range, IQR filters on `number_of_reviews` then
/// `minimum_nights`, `calculated_host_listings_count` in `[0, 10]`, the New
/// York City bounding box, drop-missing, and reparsing `last_review`.
pub fn basic_cleaning(min_price: f64, max_price: f64) -> Pipeline {
    let (min_listings, max_listings) = HOST_LISTINGS_RANGE;
    Pipeline::new()
        .name("basic_cleaning")
        .filter_range(PRICE, min_price, max_price)
        .filter_iqr(NUMBER_OF_REVIEWS)
        .filter_iqr(MINIMUM_NIGHTS)
        .filter_range(CALCULATED_HOST_LISTINGS_COUNT, min_listings, max_listings)
        .filter_bounding_box(LONGITUDE, LATITUDE, NYC_BOUNDING_BOX)
        .drop_missing()
        .parse_dates(LAST_REVIEW)
}

/// Convenience function to run the standard pipeline.
pub fn run_basic_cleaning(table: &Table, min_price: f64, max_price: f64) -> Result<CleaningOutcome> {
    basic_cleaning(min_price, max_price).run(table)
}
