//! Basic cleaning of listing tables.
//!
//! Removes out-of-range and anomalous rows from a tabular dataset and
//! republishes the result as a versioned artifact.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: The in-memory [`Table`](data::Table) and its CSV reader/writer
//! - **filter**: Row filters (range, IQR outliers, bounding box, missing values, dates)
//! - **pipeline**: Ordered composition of filters with per-step reports
//! - **job**: One download, clean and publish run
//! - **artifact**: Versioned artifact storage behind the [`ArtifactStore`](artifact::ArtifactStore) trait
//!
//! # Example
//!
//! ```no_run
//! use basic_cleaning::prelude::*;
//!
//! let table = Table::from_csv("sample.csv").unwrap();
//!
//! // Price range, IQR on reviews and minimum nights, listings count,
//! // NYC bounding box, drop missing, reparse last_review.
//! let outcome = basic_cleaning(10.0, 350.0).run(&table).unwrap();
//!
//! outcome.table.to_csv("clean_sample.csv").unwrap();
//! ```

pub mod artifact;
pub mod data;
pub mod error;
pub mod filter;
pub mod job;
pub mod pipeline;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::artifact::{
        ArtifactId, ArtifactMetadata, ArtifactRef, ArtifactStore, LocalArtifactStore, Manifest,
    };
    pub use crate::data::{parse_timestamp, Table, Value};
    pub use crate::error::{CleanError, ErrorKind, Result};
    pub use crate::filter::{
        drop_missing, filter_bounding_box, filter_iqr, filter_range, iqr_bounds, parse_dates,
        BoundingBox, Bounds, NYC_BOUNDING_BOX,
    };
    pub use crate::job::{CleaningJob, JobOutput, OUTPUT_FILE};
    pub use crate::pipeline::{
        basic_cleaning, run_basic_cleaning, CleaningOutcome, CleaningStep, Pipeline,
        PipelineConfig, StageReport,
    };
}
