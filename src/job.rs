//! Download, clean and republish one table.

use crate::artifact::{ArtifactId, ArtifactMetadata, ArtifactStore};
use crate::data::Table;
use crate::error::Result;
use crate::pipeline::{basic_cleaning, CleaningOutcome, Pipeline};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// File name the cleaned table is published under.
pub const OUTPUT_FILE: &str = "clean_sample.csv";

/// Parameters of one cleaning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningJob {
    /// Reference of the table to clean, e.g. `sample.csv:latest`.
    pub input_artifact: String,
    /// Name of the artifact to publish.
    pub output_artifact: String,
    /// Type of the published artifact.
    pub output_type: String,
    /// Description of the published artifact.
    pub output_description: String,
    pub min_price: f64,
    pub max_price: f64,
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct JobOutput {
    pub artifact: ArtifactId,
    pub outcome: CleaningOutcome,
}

impl CleaningJob {
    /// Run with the standard cleaning pipeline.
    pub fn run(&self, store: &dyn ArtifactStore) -> Result<JobOutput> {
        self.run_with(store, &basic_cleaning(self.min_price, self.max_price))
    }

    /// Run with a caller-supplied pipeline.
    ///
    /// Nothing is published unless every step succeeds and the cleaned table
    /// has been written in full.
    pub fn run_with(&self, store: &dyn ArtifactStore, pipeline: &Pipeline) -> Result<JobOutput> {
        let input_path = store.fetch(&self.input_artifact)?;
        let table = Table::from_csv(&input_path)?;
        log::info!(
            "step[preprocess]: data downloaded! ({} rows, {} columns)",
            table.n_rows(),
            table.n_columns()
        );

        let outcome = pipeline.run(&table)?;
        log::info!(
            "step[preprocess]: data preprocessed! ({} -> {} rows)",
            outcome.n_input(),
            outcome.n_output()
        );

        let workdir = tempfile::tempdir()?;
        let output_path = workdir.path().join(OUTPUT_FILE);
        outcome.table.to_csv(&output_path)?;

        let metadata = ArtifactMetadata {
            name: self.output_artifact.clone(),
            artifact_type: self.output_type.clone(),
            description: self.output_description.clone(),
            metadata: self.run_metadata(pipeline, &outcome),
        };
        let artifact = store.publish(&output_path, &metadata)?;
        log::info!("step[preprocess]: data uploaded! ({})", artifact);

        Ok(JobOutput { artifact, outcome })
    }

    fn run_metadata(
        &self,
        pipeline: &Pipeline,
        outcome: &CleaningOutcome,
    ) -> BTreeMap<String, serde_json::Value> {
        let mut meta = BTreeMap::new();
        meta.insert(
            "input_artifact".to_string(),
            serde_json::json!(self.input_artifact),
        );
        meta.insert("min_price".to_string(), serde_json::json!(self.min_price));
        meta.insert("max_price".to_string(), serde_json::json!(self.max_price));
        meta.insert(
            "pipeline".to_string(),
            serde_json::json!(pipeline.pipeline_name()),
        );
        meta.insert("rows_in".to_string(), serde_json::json!(outcome.n_input()));
        meta.insert("rows_out".to_string(), serde_json::json!(outcome.n_output()));
        meta
    }
}
