//! Artifact storage for input and cleaned tables.
//!
//! The cleaning run only needs two operations from its store: fetch a
//! versioned artifact to a local file, and publish a local file as a new
//! version. [`ArtifactStore`] captures that seam; [`LocalArtifactStore`]
//! implements it on a directory tree.

mod local;
mod reference;

pub use local::{default_store_dir, LocalArtifactStore};
pub use reference::{validate_name, ArtifactId, ArtifactRef, VersionSpec};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Versioned artifact storage.
pub trait ArtifactStore {
    /// Resolve `reference` and return a readable local path to its file.
    fn fetch(&self, reference: &str) -> Result<PathBuf>;

    /// Publish the file at `path` as the next version of `metadata.name`.
    fn publish(&self, path: &Path, metadata: &ArtifactMetadata) -> Result<ArtifactId>;
}

/// Descriptive fields attached to a published artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Artifact name.
    pub name: String,
    /// Category, e.g. `clean_sample`.
    pub artifact_type: String,
    /// Free text.
    pub description: String,
    /// Anything else worth recording, such as run parameters.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Stored description of one artifact version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub version: u32,
    pub artifact_type: String,
    pub description: String,
    /// File name inside the version directory.
    pub file_name: String,
    pub size_bytes: u64,
    /// RFC 3339 publication time.
    pub created_at: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}
