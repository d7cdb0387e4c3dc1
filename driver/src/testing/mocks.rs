//! Scripted stage collaborators.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

use crate::core::StageResult;
use crate::errors::DriverError;
use crate::request::PlanningRequest;
use crate::stages::{PlanValidator, SearchEngine, Translator};

/// One scripted answer of a [`ScriptedComponent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedStep {
    /// Report this result.
    Report(StageResult),
    /// Fail with an internal error carrying this message.
    Fail(String),
}

impl From<StageResult> for ScriptedStep {
    fn from(result: StageResult) -> Self {
        Self::Report(result)
    }
}

/// A collaborator that answers from a script and records every request.
///
/// It implements all three collaborator traits, so one instance can play
/// any stage. When the script runs out, it reports the fallback result.
#[derive(Debug)]
pub struct ScriptedComponent {
    script: Mutex<VecDeque<ScriptedStep>>,
    fallback: StageResult,
    writes_artifact: bool,
    delay: Option<Duration>,
    calls: Mutex<Vec<PlanningRequest>>,
}

impl Default for ScriptedComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedComponent {
    /// Creates a component that always reports exit code 0 and continues.
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: StageResult::proceed(0),
            writes_artifact: false,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a component that always reports `result`.
    #[must_use]
    pub fn reporting(result: StageResult) -> Self {
        Self::new().with_fallback(result)
    }

    /// Sets the result reported once the script is exhausted.
    #[must_use]
    pub const fn with_fallback(mut self, result: StageResult) -> Self {
        self.fallback = result;
        self
    }

    /// Appends a step to the script.
    #[must_use]
    pub fn then(self, step: impl Into<ScriptedStep>) -> Self {
        self.script.lock().push_back(step.into());
        self
    }

    /// Makes translation write the intermediate file of the request.
    #[must_use]
    pub const fn writing_artifact(mut self) -> Self {
        self.writes_artifact = true;
        self
    }

    /// Delays every answer.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns the number of requests seen.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns every request seen, in order.
    #[must_use]
    pub fn recorded_requests(&self) -> Vec<PlanningRequest> {
        self.calls.lock().clone()
    }

    async fn answer(&self, request: &PlanningRequest) -> Result<StageResult, DriverError> {
        self.calls.lock().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let step = self.script.lock().pop_front();
        match step.unwrap_or(ScriptedStep::Report(self.fallback)) {
            ScriptedStep::Report(result) => Ok(result),
            ScriptedStep::Fail(message) => Err(DriverError::Internal(message)),
        }
    }
}

#[async_trait]
impl Translator for ScriptedComponent {
    async fn translate(&self, request: &PlanningRequest) -> Result<StageResult, DriverError> {
        if self.writes_artifact {
            tokio::fs::write(request.artifact_path(), b"begin_version\n3\nend_version\n").await?;
        }
        self.answer(request).await
    }
}

#[async_trait]
impl SearchEngine for ScriptedComponent {
    async fn search(&self, request: &PlanningRequest) -> Result<StageResult, DriverError> {
        self.answer(request).await
    }
}

#[async_trait]
impl PlanValidator for ScriptedComponent {
    async fn validate(&self, request: &PlanningRequest) -> Result<StageResult, DriverError> {
        self.answer(request).await
    }
}
