//! Removal of stale temporary files left behind by earlier runs.

use super::PlanManager;
use crate::errors::DriverError;
use crate::request::PlanningRequest;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::info;

/// Files removed by a cleanup request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    /// Removed paths, intermediate artifact first.
    pub removed: Vec<PathBuf>,
}

impl CleanupReport {
    /// Returns true if nothing had to be removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Removes the intermediate artifact and every plan file of `request`.
///
/// Files that do not exist are skipped.
///
/// # Errors
///
/// Returns an IO error if an existing file cannot be removed.
pub async fn cleanup_temporary_files(request: &PlanningRequest) -> Result<CleanupReport, DriverError> {
    let mut report = CleanupReport::default();

    let artifact = request.artifact_path().to_path_buf();
    match tokio::fs::remove_file(&artifact).await {
        Ok(()) => report.removed.push(artifact),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let plans = PlanManager::new(&request.plan_file);
    report.removed.extend(plans.remove_plans().await?);

    info!(removed = report.removed.len(), "removed temporary files");
    Ok(report)
}
