//! Stage and pipeline result types.

use super::Component;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome reported by one stage collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    /// Exit status of the stage.
    pub exit_code: i32,
    /// Whether the pipeline may proceed to the next stage.
    pub should_continue: bool,
}

impl StageResult {
    /// Creates a new stage result.
    #[must_use]
    pub const fn new(exit_code: i32, should_continue: bool) -> Self {
        Self {
            exit_code,
            should_continue,
        }
    }

    /// A result that lets the pipeline continue.
    #[must_use]
    pub const fn proceed(exit_code: i32) -> Self {
        Self::new(exit_code, true)
    }

    /// A result that stops the pipeline after this stage.
    #[must_use]
    pub const fn halt(exit_code: i32) -> Self {
        Self::new(exit_code, false)
    }
}

/// A stage that actually ran during a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    /// The stage that ran.
    pub component: Component,
    /// What the stage reported.
    pub result: StageResult,
    /// When the stage started.
    pub started_at: DateTime<Utc>,
    /// When the stage ended, artifact disposal included.
    pub ended_at: DateTime<Utc>,
}

impl StageRecord {
    /// Returns the duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.ended_at - self.started_at).num_milliseconds()
    }
}

/// Final answer of the controller for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Identifier of the run, used in logs.
    pub run_id: String,
    /// Exit code of the last stage that actually ran.
    pub exit_code: i32,
    /// Every stage that ran, in order.
    pub stages: Vec<StageRecord>,
    /// The stage after which the pipeline stopped early, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted_after: Option<Component>,
}

impl PipelineResult {
    /// Returns true if the pipeline stopped before running every stage.
    #[must_use]
    pub const fn aborted(&self) -> bool {
        self.aborted_after.is_some()
    }

    /// Returns the components that ran, in order.
    #[must_use]
    pub fn executed(&self) -> Vec<Component> {
        self.stages.iter().map(|record| record.component).collect()
    }
}
