//! Error types for the basic-cleaning library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum CleanError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row} has {actual} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Non-numeric value '{value}' at row {row}, column '{column}'")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Cannot parse '{value}' as a date at row {row}, column '{column}'")]
    DateParse {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Cannot estimate outlier bounds for column '{0}': no non-missing values")]
    EmptySeries(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Step {index} ({step}) failed: {source}")]
    Step {
        index: usize,
        step: String,
        #[source]
        source: Box<CleanError>,
    },

    #[error("Invalid artifact reference '{0}'")]
    InvalidArtifactRef(String),

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Broad class of a [`CleanError`], used when reporting a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad arguments, pipeline definitions or references.
    Config,
    /// The input table itself is unusable.
    Data,
    /// The artifact store or the filesystem failed.
    Collaborator,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Config => "configuration",
            ErrorKind::Data => "data",
            ErrorKind::Collaborator => "collaborator",
        }
    }
}

impl CleanError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CleanError::Step { source, .. } => source.kind(),
            CleanError::InvalidParameter(_)
            | CleanError::MissingColumn(_)
            | CleanError::Pipeline(_)
            | CleanError::InvalidArtifactRef(_)
            | CleanError::Yaml(_) => ErrorKind::Config,
            CleanError::Csv(_)
            | CleanError::RaggedRow { .. }
            | CleanError::EmptyData(_)
            | CleanError::NonNumeric { .. }
            | CleanError::DateParse { .. }
            | CleanError::EmptySeries(_) => ErrorKind::Data,
            CleanError::Io(_) | CleanError::ArtifactNotFound(_) | CleanError::Json(_) => {
                ErrorKind::Collaborator
            }
        }
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, CleanError>;
