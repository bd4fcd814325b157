//! Artifact loading and caching
//!
//! Each artifact path is resolved at most once per loader. A missing file
//! and a file that fails to decode are both cached as "no artifact", so a
//! broken path never triggers a second disk read.

use super::artifact::{ClassLabel, ModelArtifact, ModelError};
use super::inference::load_onnx_artifact;
use super::linear::load_json_artifact;
use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

type Slot = Arc<OnceLock<Option<Arc<LoadedArtifact>>>>;

/// An artifact together with where it came from
#[derive(Debug)]
pub struct LoadedArtifact {
    pub artifact: ModelArtifact,
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
}

impl LoadedArtifact {
    pub fn info(&self) -> ArtifactInfo {
        ArtifactInfo {
            path: self.path.display().to_string(),
            loaded: true,
            kind: Some(self.artifact.kind().to_string()),
            classes: self.artifact.classes().to_vec(),
            has_probability: self.artifact.has_probability(),
            sha256: Some(self.sha256.clone()),
            size_bytes: Some(self.size_bytes),
        }
    }
}

/// Serializable summary of an artifact slot
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
pub struct ArtifactInfo {
    pub path: String,
    pub loaded: bool,
    pub kind: Option<String>,
    pub classes: Vec<ClassLabel>,
    pub has_probability: bool,
    pub sha256: Option<String>,
    pub size_bytes: Option<usize>,
}

impl ArtifactInfo {
    /// Summary for a path with no usable artifact
    pub fn missing(path: &Path) -> Self {
        Self {
            path: path.display().to_string(),
            loaded: false,
            kind: None,
            classes: Vec::new(),
            has_probability: false,
            sha256: None,
            size_bytes: None,
        }
    }
}

/// Read and decode an artifact, bypassing any cache. The format is chosen
/// from the file extension.
pub fn read_artifact(path: &Path) -> Result<LoadedArtifact, ModelError> {
    let bytes = std::fs::read(path)?;
    let sha256 = hex::encode(Sha256::digest(&bytes));

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let artifact = match extension.as_str() {
        "json" => load_json_artifact(&bytes)?,
        "onnx" => load_onnx_artifact(&bytes)?,
        other => return Err(ModelError::UnsupportedFormat(format!(".{}", other))),
    };

    Ok(LoadedArtifact {
        artifact,
        path: path.to_path_buf(),
        sha256,
        size_bytes: bytes.len(),
    })
}

/// Caches one load attempt per path
#[derive(Default)]
pub struct ArtifactLoader {
    slots: DashMap<PathBuf, Slot>,
    disk_reads: AtomicU64,
}

impl ArtifactLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached artifact for `path`, loading it on first use. Concurrent first
    /// calls for the same path block on a single load.
    pub fn get(&self, path: &Path) -> Option<Arc<LoadedArtifact>> {
        // Clone the slot out so the map shard is not locked during the load
        let slot: Slot = self.slots.entry(path.to_path_buf()).or_default().value().clone();
        slot.get_or_init(|| self.load(path)).clone()
    }

    /// Whether `path` has been resolved already
    pub fn is_resolved(&self, path: &Path) -> bool {
        self.slots
            .get(path)
            .map(|slot| slot.get().is_some())
            .unwrap_or(false)
    }

    /// Number of artifact files read from disk so far
    pub fn disk_reads(&self) -> u64 {
        self.disk_reads.load(Ordering::Relaxed)
    }

    fn load(&self, path: &Path) -> Option<Arc<LoadedArtifact>> {
        if !path.exists() {
            info!(
                event = "artifact_missing",
                path = %path.display(),
                "No model artifact found, using rule-based scoring"
            );
            return None;
        }

        self.disk_reads.fetch_add(1, Ordering::Relaxed);
        match read_artifact(path) {
            Ok(loaded) => {
                info!(
                    event = "artifact_loaded",
                    path = %path.display(),
                    kind = loaded.artifact.kind(),
                    has_probability = loaded.artifact.has_probability(),
                    sha256 = %loaded.sha256,
                    size_bytes = loaded.size_bytes,
                    "Model artifact loaded"
                );
                Some(Arc::new(loaded))
            }
            Err(e) => {
                warn!(
                    event = "artifact_load_failed",
                    path = %path.display(),
                    error = %e,
                    "Model artifact could not be decoded, using rule-based scoring"
                );
                None
            }
        }
    }
}
