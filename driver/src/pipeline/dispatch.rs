//! Request dispatch: short-circuit requests, aliases and artifact ownership.

use super::PipelineController;
use crate::artifacts::{
    cleanup_temporary_files, ArtifactLeases, ArtifactManager, CleanupReport, ScratchArtifact,
};
use crate::config::DriverConfig;
use crate::core::{exit_codes, PipelineResult};
use crate::errors::{ConfigError, DriverError};
use crate::events::{StatusSink, StdoutStatusSink, TracingStatusSink};
use crate::request::{AliasRegistry, PlanningRequest};
use crate::stages::{
    PlanValidator, ProcessComponents, RunMode, SearchEngine, StageRunner, Translator,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Version reported for version requests.
pub const DRIVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// What handling a request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The driver version; no stage ran.
    Version(String),
    /// The known alias names; no stage ran.
    Aliases(Vec<String>),
    /// Files removed by a cleanup request; no stage ran.
    Cleanup(CleanupReport),
    /// A pipeline run.
    Pipeline(PipelineResult),
}

impl RequestOutcome {
    /// Returns the exit code the driver reports for this outcome.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Pipeline(result) => result.exit_code,
            Self::Version(_) | Self::Aliases(_) | Self::Cleanup(_) => exit_codes::SUCCESS,
        }
    }

    /// Returns the pipeline result, if a pipeline ran.
    #[must_use]
    pub const fn pipeline(&self) -> Option<&PipelineResult> {
        match self {
            Self::Pipeline(result) => Some(result),
            _ => None,
        }
    }
}

/// Entry point shared by the frontends.
///
/// A driver answers short-circuit requests itself and hands everything else
/// to its [`PipelineController`]. It can be shared between tasks; requests
/// handled at the same time must not use the same intermediate file.
#[derive(Debug, Clone)]
pub struct Driver {
    controller: PipelineController,
    aliases: Arc<AliasRegistry>,
    leases: ArtifactLeases,
    portfolio_dir: PathBuf,
    work_dir: PathBuf,
}

impl Driver {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> DriverBuilder {
        DriverBuilder::default()
    }

    /// Creates a driver running the configured external programs.
    ///
    /// One-shot drivers print status lines to stdout, service drivers log
    /// them.
    #[must_use]
    pub fn from_config(config: &DriverConfig, mode: RunMode) -> Self {
        let components = ProcessComponents::from_paths(&config.components);
        let sink: Arc<dyn StatusSink> = if mode.is_service() {
            Arc::new(TracingStatusSink)
        } else {
            Arc::new(StdoutStatusSink)
        };
        Self::assemble(
            Arc::new(components.translator),
            Arc::new(components.search),
            Arc::new(components.validator),
            mode,
            sink,
            config.portfolio_dir.clone(),
            config.service.work_dir.clone(),
        )
    }

    fn assemble(
        translator: Arc<dyn Translator>,
        search: Arc<dyn SearchEngine>,
        validator: Arc<dyn PlanValidator>,
        mode: RunMode,
        sink: Arc<dyn StatusSink>,
        portfolio_dir: PathBuf,
        work_dir: PathBuf,
    ) -> Self {
        let runner = StageRunner::new(translator, search, validator, mode);
        let controller = PipelineController::new(runner, ArtifactManager::new(sink.clone()), sink);
        Self {
            controller,
            aliases: Arc::new(AliasRegistry::default()),
            leases: ArtifactLeases::new(),
            portfolio_dir,
            work_dir,
        }
    }

    /// Returns the mode this driver runs in.
    #[must_use]
    pub const fn mode(&self) -> RunMode {
        self.controller.runner().mode()
    }

    /// Returns the alias registry.
    #[must_use]
    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    /// Returns the artifact paths currently owned by running pipelines.
    #[must_use]
    pub fn active_runs(&self) -> usize {
        self.leases.active()
    }

    /// Handles one request.
    ///
    /// Version, alias listing and cleanup requests return without running
    /// any stage, in that order of precedence.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown aliases or stages and for an
    /// artifact path another run is using. Otherwise propagates the errors of
    /// [`PipelineController::run_with_id`] and of the cleanup.
    pub async fn handle(&self, mut request: PlanningRequest) -> Result<RequestOutcome, DriverError> {
        if request.version {
            return Ok(RequestOutcome::Version(DRIVER_VERSION.to_string()));
        }
        if request.show_aliases {
            return Ok(RequestOutcome::Aliases(self.aliases.names()));
        }
        if request.cleanup {
            return Ok(RequestOutcome::Cleanup(cleanup_temporary_files(&request).await?));
        }

        if request.alias.is_some() {
            self.aliases.apply(&mut request, &self.portfolio_dir)?;
        }

        let run_id = Uuid::new_v4().to_string();
        let assigned = self.mode().is_service() && request.sas_file.is_none();
        if assigned {
            let path = self.work_dir.join(format!("output-{run_id}.sas"));
            debug!(path = %path.display(), "assigned intermediate file");
            request.sas_file = Some(path);
        }

        // Fail before taking the lease so a bad request never blocks a path.
        request.stages()?;
        let _lease = self.leases.acquire(request.artifact_path(), &run_id)?;
        // Declared after the lease so the file is gone before the path is released.
        let _scratch = (assigned && !request.keep_sas_file)
            .then(|| ScratchArtifact::new(request.artifact_path()));

        let result = self.controller.run_with_id(&request, run_id).await?;
        Ok(RequestOutcome::Pipeline(result))
    }
}

/// Builder for [`Driver`]s with custom collaborators.
#[derive(Default)]
pub struct DriverBuilder {
    translator: Option<Arc<dyn Translator>>,
    search: Option<Arc<dyn SearchEngine>>,
    validator: Option<Arc<dyn PlanValidator>>,
    mode: RunMode,
    sink: Option<Arc<dyn StatusSink>>,
    portfolio_dir: Option<PathBuf>,
    work_dir: Option<PathBuf>,
}

impl std::fmt::Debug for DriverBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverBuilder")
            .field("mode", &self.mode)
            .field("portfolio_dir", &self.portfolio_dir)
            .field("work_dir", &self.work_dir)
            .finish_non_exhaustive()
    }
}

impl DriverBuilder {
    /// Sets the translator.
    #[must_use]
    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Sets the search engine.
    #[must_use]
    pub fn search(mut self, search: Arc<dyn SearchEngine>) -> Self {
        self.search = Some(search);
        self
    }

    /// Sets the validator.
    #[must_use]
    pub fn validator(mut self, validator: Arc<dyn PlanValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Sets the run mode.
    #[must_use]
    pub const fn mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets where status lines go. Defaults to stdout.
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Sets the directory portfolio aliases resolve into.
    #[must_use]
    pub fn portfolio_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.portfolio_dir = Some(dir.into());
        self
    }

    /// Sets the directory for intermediate files assigned in service mode.
    #[must_use]
    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Builds the driver.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfig`] if a collaborator is missing.
    pub fn build(self) -> Result<Driver, ConfigError> {
        let missing = |name: &str| ConfigError::InvalidConfig(format!("driver has no {name}"));
        let defaults = DriverConfig::default();
        Ok(Driver::assemble(
            self.translator.ok_or_else(|| missing("translator"))?,
            self.search.ok_or_else(|| missing("search engine"))?,
            self.validator.ok_or_else(|| missing("validator"))?,
            self.mode,
            self.sink.unwrap_or_else(|| Arc::new(StdoutStatusSink)),
            self.portfolio_dir.unwrap_or(defaults.portfolio_dir),
            self.work_dir.unwrap_or(defaults.service.work_dir),
        ))
    }
}
