//! Exclusive ownership of artifact paths across concurrent runs.

use crate::errors::ConfigError;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Tracks which artifact paths are owned by running pipelines.
#[derive(Debug, Clone, Default)]
pub struct ArtifactLeases {
    in_use: Arc<DashMap<PathBuf, String>>,
}

impl ArtifactLeases {
    /// Creates an empty lease table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `path` for the run `run_id`.
    ///
    /// The claim is released when the returned lease is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ArtifactPathInUse`] if another run holds the path.
    pub fn acquire(&self, path: &Path, run_id: &str) -> Result<ArtifactLease, ConfigError> {
        let key = normalize(path);
        match self.in_use.entry(key.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(ConfigError::ArtifactPathInUse(path.to_path_buf()))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(run_id.to_string());
                debug!(path = %key.display(), run_id, "leased intermediate file");
                Ok(ArtifactLease {
                    in_use: Arc::clone(&self.in_use),
                    path: key,
                })
            }
        }
    }

    /// Returns the number of paths currently leased.
    #[must_use]
    pub fn active(&self) -> usize {
        self.in_use.len()
    }

    /// Returns true if `path` is currently leased.
    #[must_use]
    pub fn is_leased(&self, path: &Path) -> bool {
        self.in_use.contains_key(&normalize(path))
    }
}

/// Ownership of one artifact path, released on drop.
#[derive(Debug)]
pub struct ArtifactLease {
    in_use: Arc<DashMap<PathBuf, String>>,
    path: PathBuf,
}

impl ArtifactLease {
    /// Returns the leased path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ArtifactLease {
    fn drop(&mut self) {
        self.in_use.remove(&self.path);
    }
}

// Relative paths are keyed by the working directory so that `output.sas` and
// `./output.sas` collide.
fn normalize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    absolute
        .components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}
