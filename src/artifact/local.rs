//! Filesystem-backed artifact store.
//!
//! Layout:
//!
//! ```text
//! <root>/<name>/v0/manifest.json
//! <root>/<name>/v0/<file>
//! <root>/<name>/v1/...
//! ```

use super::reference::{validate_name, ArtifactId, ArtifactRef, VersionSpec};
use super::{ArtifactMetadata, ArtifactStore, Manifest};
use crate::error::{CleanError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "manifest.json";

/// Artifact store kept in a local directory.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    /// Store rooted at `root`. The directory is created on first publish.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Store in the per-user cache directory.
    pub fn open_default() -> Self {
        Self::new(default_store_dir())
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Published versions of `name`, ascending.
    pub fn versions(&self, name: &str) -> Result<Vec<u32>> {
        validate_name(name)?;
        let dir = self.root.join(name);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut versions = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let file_name = entry.file_name();
            let parsed = file_name
                .to_str()
                .and_then(|s| s.strip_prefix('v'))
                .and_then(|n| n.parse::<u32>().ok());
            if let Some(version) = parsed {
                versions.push(version);
            }
        }
        versions.sort_unstable();
        Ok(versions)
    }

    /// Resolve a reference to a concrete version.
    pub fn resolve(&self, reference: &ArtifactRef) -> Result<ArtifactId> {
        let versions = self.versions(&reference.name)?;
        let version = match reference.version {
            VersionSpec::Latest => versions.last().copied(),
            VersionSpec::Exact(n) => versions.contains(&n).then_some(n),
        };
        version
            .map(|version| ArtifactId {
                name: reference.name.clone(),
                version,
            })
            .ok_or_else(|| CleanError::ArtifactNotFound(reference.to_string()))
    }

    /// Read the manifest of a published version.
    pub fn manifest(&self, id: &ArtifactId) -> Result<Manifest> {
        let path = self.version_dir(id).join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(CleanError::ArtifactNotFound(id.to_string()));
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn version_dir(&self, id: &ArtifactId) -> PathBuf {
        self.root.join(&id.name).join(format!("v{}", id.version))
    }
}

impl ArtifactStore for LocalArtifactStore {
    fn fetch(&self, reference: &str) -> Result<PathBuf> {
        let reference: ArtifactRef = reference.parse()?;
        let id = self.resolve(&reference)?;
        let manifest = self.manifest(&id)?;

        let path = self.version_dir(&id).join(&manifest.file_name);
        if !path.is_file() {
            return Err(CleanError::ArtifactNotFound(format!(
                "{} (file '{}' is missing)",
                id, manifest.file_name
            )));
        }
        log::info!("Using artifact {} at {:?}", id, path);
        Ok(path)
    }

    fn publish(&self, path: &Path, metadata: &ArtifactMetadata) -> Result<ArtifactId> {
        validate_name(&metadata.name)?;
        if !path.is_file() {
            return Err(CleanError::InvalidParameter(format!(
                "{:?} is not a file",
                path
            )));
        }
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                CleanError::InvalidParameter(format!("{:?} has no usable file name", path))
            })?
            .to_string();

        let name_dir = self.root.join(&metadata.name);
        fs::create_dir_all(&name_dir)?;

        // Assemble the version off to the side so a failure never leaves a
        // half-written version behind.
        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(&name_dir)?;
        let size_bytes = fs::copy(path, staging.path().join(&file_name))?;

        let version = self
            .versions(&metadata.name)?
            .last()
            .map_or(0, |v| v + 1);
        let id = ArtifactId {
            name: metadata.name.clone(),
            version,
        };

        let manifest = Manifest {
            name: metadata.name.clone(),
            version,
            artifact_type: metadata.artifact_type.clone(),
            description: metadata.description.clone(),
            file_name,
            size_bytes,
            created_at: chrono::Utc::now().to_rfc3339(),
            metadata: metadata.metadata.clone(),
        };
        fs::write(
            staging.path().join(MANIFEST_FILE),
            serde_json::to_string_pretty(&manifest)?,
        )?;

        let target = self.version_dir(&id);
        if target.exists() {
            return Err(CleanError::Io(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{:?} already exists", target),
            )));
        }
        // After the rename, dropping `staging` finds nothing left to remove.
        fs::rename(staging.path(), &target)?;

        log::info!(
            "Published artifact {} ({}, {} bytes)",
            id,
            manifest.artifact_type,
            size_bytes
        );
        Ok(id)
    }
}

/// Default store location: `<user cache dir>/basic-cleaning/artifacts`.
pub fn default_store_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("basic-cleaning")
        .join("artifacts")
}
