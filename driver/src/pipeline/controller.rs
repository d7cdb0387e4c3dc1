//! Sequential execution of the requested stages.

use crate::artifacts::ArtifactManager;
use crate::core::{exit_codes, Component, PipelineResult, StageRecord};
use crate::errors::DriverError;
use crate::events::{StatusLine, StatusSink};
use crate::request::PlanningRequest;
use crate::stages::StageRunner;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Runs the stages of a request one after another.
///
/// Each stage consumes what the previous one produced, so stages never
/// overlap. The only point where a run can stop early is between stages,
/// after one of them reported that the pipeline must not continue.
#[derive(Clone)]
pub struct PipelineController {
    runner: StageRunner,
    artifacts: ArtifactManager,
    sink: Arc<dyn StatusSink>,
}

impl std::fmt::Debug for PipelineController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineController")
            .field("runner", &self.runner)
            .finish_non_exhaustive()
    }
}

impl PipelineController {
    /// Creates a controller.
    #[must_use]
    pub fn new(runner: StageRunner, artifacts: ArtifactManager, sink: Arc<dyn StatusSink>) -> Self {
        Self {
            runner,
            artifacts,
            sink,
        }
    }

    /// Returns the stage runner.
    #[must_use]
    pub const fn runner(&self) -> &StageRunner {
        &self.runner
    }

    /// Runs `request` with a fresh run id.
    ///
    /// # Errors
    ///
    /// See [`PipelineController::run_with_id`].
    pub async fn run(&self, request: &PlanningRequest) -> Result<PipelineResult, DriverError> {
        self.run_with_id(request, Uuid::new_v4().to_string()).await
    }

    /// Runs `request`, tagging logs and the result with `run_id`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error before any stage runs if the stage list
    /// is empty or names an unknown stage. Returns the error of a stage
    /// collaborator, or an artifact error if the intermediate file cannot be
    /// disposed of after search; no further stage runs in either case.
    pub async fn run_with_id(
        &self,
        request: &PlanningRequest,
        run_id: String,
    ) -> Result<PipelineResult, DriverError> {
        let stages = request.stages()?;
        let span = info_span!("pipeline", run_id = %run_id);
        self.execute(&stages, request, run_id).instrument(span).await
    }

    async fn execute(
        &self,
        stages: &[Component],
        request: &PlanningRequest,
        run_id: String,
    ) -> Result<PipelineResult, DriverError> {
        info!(stages = ?stages, "starting pipeline");
        let mut records = Vec::with_capacity(stages.len());
        let mut aborted_after = None;

        for &component in stages {
            let started_at = Utc::now();
            let result = self.runner.run(component, request).await?;

            if component == Component::Search {
                self.artifacts.dispose(request).await?;
            }

            self.sink.report(StatusLine::StageExit {
                component,
                exit_code: result.exit_code,
            });
            records.push(StageRecord {
                component,
                result,
                started_at,
                ended_at: Utc::now(),
            });

            if !result.should_continue {
                if exit_codes::is_unrecoverable(result.exit_code) {
                    warn!(component = %component, exit_code = result.exit_code, "stage failed unrecoverably");
                }
                self.sink.report(StatusLine::Aborting { component });
                aborted_after = Some(component);
                break;
            }
        }

        // The stage list is never empty, so at least one stage has run.
        let exit_code = records
            .last()
            .map(|record| record.result.exit_code)
            .ok_or_else(|| DriverError::Internal("pipeline finished without running a stage".to_string()))?;

        info!(exit_code, aborted = aborted_after.is_some(), "pipeline finished");
        Ok(PipelineResult {
            run_id,
            exit_code,
            stages: records,
            aborted_after,
        })
    }
}
