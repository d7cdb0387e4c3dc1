//! Intermediate files named by the driver itself.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Removes a driver-assigned intermediate file when dropped.
///
/// The client of a service request never learns the path the driver picked,
/// so whatever the run leaves behind has to be removed here: a search that
/// errored, a run that stopped after translate, or a stage list without
/// search.
#[derive(Debug)]
pub struct ScratchArtifact {
    path: Option<PathBuf>,
}

impl ScratchArtifact {
    /// Takes ownership of `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Returns the owned path, unless the guard was disarmed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Leaves the file in place.
    pub fn disarm(&mut self) {
        self.path = None;
    }
}

impl Drop for ScratchArtifact {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "removed leftover intermediate file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove intermediate file"),
        }
    }
}
