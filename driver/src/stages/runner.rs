//! Dispatch of one stage to its collaborator.

use super::{PlanValidator, SearchEngine, Translator};
use crate::core::{Component, StageResult};
use crate::errors::DriverError;
use crate::request::PlanningRequest;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, warn};

/// How the driver was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// One request, then the process exits.
    #[default]
    OneShot,
    /// Long-lived listener answering many requests.
    Service,
}

impl RunMode {
    /// Returns true in service mode.
    #[must_use]
    pub const fn is_service(&self) -> bool {
        matches!(self, Self::Service)
    }
}

/// Runs one named stage through its collaborator.
///
/// The runner relays whatever the collaborator reports; it neither retries
/// nor reinterprets results.
#[derive(Clone)]
pub struct StageRunner {
    translator: Arc<dyn Translator>,
    search: Arc<dyn SearchEngine>,
    validator: Arc<dyn PlanValidator>,
    mode: RunMode,
}

impl std::fmt::Debug for StageRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageRunner")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl StageRunner {
    /// Creates a runner over the three collaborators.
    #[must_use]
    pub fn new(
        translator: Arc<dyn Translator>,
        search: Arc<dyn SearchEngine>,
        validator: Arc<dyn PlanValidator>,
        mode: RunMode,
    ) -> Self {
        Self {
            translator,
            search,
            validator,
            mode,
        }
    }

    /// Returns the mode the runner was built for.
    #[must_use]
    pub const fn mode(&self) -> RunMode {
        self.mode
    }

    /// Runs `component` for `request`.
    ///
    /// In service mode the portfolio options are cleared before search runs.
    ///
    /// # Errors
    ///
    /// Propagates errors of the collaborator, such as a program that cannot
    /// be started.
    pub async fn run(
        &self,
        component: Component,
        request: &PlanningRequest,
    ) -> Result<StageResult, DriverError> {
        debug!(component = %component, mode = ?self.mode, "running stage");
        match component {
            Component::Translate => self.translator.translate(request).await,
            Component::Search => {
                let request = self.search_request(request);
                self.search.search(&request).await
            }
            Component::Validate => self.validator.validate(request).await,
        }
    }

    fn search_request<'a>(&self, request: &'a PlanningRequest) -> Cow<'a, PlanningRequest> {
        if self.mode.is_service() && request.uses_portfolio() {
            warn!("portfolio options are not supported in service mode; ignoring them");
            Cow::Owned(request.without_portfolio())
        } else {
            Cow::Borrowed(request)
        }
    }
}
