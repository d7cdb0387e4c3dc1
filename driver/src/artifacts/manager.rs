//! Lifecycle of the intermediate artifact.

use crate::errors::ArtifactError;
use crate::events::{StatusLine, StatusSink};
use crate::request::PlanningRequest;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Disposes of the intermediate artifact once search has consumed it.
#[derive(Clone)]
pub struct ArtifactManager {
    sink: Arc<dyn StatusSink>,
}

impl std::fmt::Debug for ArtifactManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactManager").finish_non_exhaustive()
    }
}

impl ArtifactManager {
    /// Creates a manager reporting to the given sink.
    #[must_use]
    pub fn new(sink: Arc<dyn StatusSink>) -> Self {
        Self { sink }
    }

    /// Removes the artifact of `request` unless it asked to keep it.
    ///
    /// Returns the removed path, or `None` when the artifact was retained.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Missing`] if the file does not exist and
    /// [`ArtifactError::Remove`] if it could not be removed.
    pub async fn dispose(&self, request: &PlanningRequest) -> Result<Option<PathBuf>, ArtifactError> {
        let path = request.artifact_path().to_path_buf();
        if request.keep_sas_file {
            debug!(path = %path.display(), "keeping intermediate file");
            return Ok(None);
        }

        self.sink.report(StatusLine::RemoveArtifact { path: path.clone() });
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(Some(path)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ArtifactError::Missing { path }),
            Err(source) => Err(ArtifactError::Remove { path, source }),
        }
    }
}
