//! Pipeline composition and execution for table cleaning.

mod runner;

pub use runner::{
    basic_cleaning, run_basic_cleaning, CleaningOutcome, CleaningStep, Pipeline, PipelineConfig,
    StageReport, CALCULATED_HOST_LISTINGS_COUNT, HOST_LISTINGS_RANGE, LAST_REVIEW, LATITUDE,
    LONGITUDE, MINIMUM_NIGHTS, NUMBER_OF_REVIEWS, PRICE,
};
