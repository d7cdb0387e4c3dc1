//! Collaborators backed by external programs.
//!
//! Exit statuses are relayed as-is except for the translator, whose exit
//! code 1 means the interpreter itself crashed. A program killed by signal
//! `N` reports `-N`.

use super::{PlanValidator, SearchEngine, Translator};
use crate::artifacts::PlanManager;
use crate::config::ComponentPaths;
use crate::core::{exit_codes, Component, StageResult};
use crate::errors::{ArtifactError, ConfigError, DriverError};
use crate::request::PlanningRequest;
use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Converts a process exit status into a planner exit code.
#[must_use]
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    exit_codes::DRIVER_CRITICAL_ERROR
}

async fn run_program(
    component: Component,
    program: &Path,
    args: Vec<OsString>,
    stdin: Stdio,
) -> Result<i32, DriverError> {
    info!(
        component = %component,
        program = %program.display(),
        args = ?args,
        "starting stage program"
    );
    let status = Command::new(program)
        .args(&args)
        .stdin(stdin)
        .status()
        .await
        .map_err(|e| DriverError::launch(component, program, e))?;
    let code = exit_code_of(status);
    info!(
        component = %component,
        exit_code = code,
        outcome = exit_codes::describe(code).unwrap_or("unknown"),
        "stage program finished"
    );
    Ok(code)
}

fn os_args<I, S>(items: I) -> impl Iterator<Item = OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    items.into_iter().map(Into::into)
}

/// Runs the translator script through the Python interpreter.
#[derive(Debug, Clone)]
pub struct ProcessTranslator {
    python: PathBuf,
    script: PathBuf,
}

impl ProcessTranslator {
    /// Creates a translator running `script` with `python`.
    #[must_use]
    pub fn new(python: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            script: script.into(),
        }
    }

    /// Builds the translator argument list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingInput`] when the request has no inputs.
    pub fn arguments(&self, request: &PlanningRequest) -> Result<Vec<OsString>, ConfigError> {
        if request.inputs.is_empty() {
            return Err(ConfigError::missing_input(
                Component::Translate,
                "no task or domain/problem files given",
            ));
        }
        let mut args: Vec<OsString> = vec![self.script.clone().into()];
        args.extend(os_args(request.inputs.iter().cloned()));
        args.push("--sas-file".into());
        args.push(request.artifact_path().into());
        args.extend(os_args(request.translate_options.iter().cloned()));
        Ok(args)
    }
}

/// Maps the translator exit code to a stage result.
#[must_use]
pub const fn translate_result(code: i32) -> StageResult {
    match code {
        exit_codes::SUCCESS => StageResult::proceed(exit_codes::SUCCESS),
        // Exit code 1 comes from an uncaught exception in the interpreter.
        1 => StageResult::halt(exit_codes::TRANSLATE_CRITICAL_ERROR),
        other => StageResult::halt(other),
    }
}

#[async_trait]
impl Translator for ProcessTranslator {
    async fn translate(&self, request: &PlanningRequest) -> Result<StageResult, DriverError> {
        let args = self.arguments(request)?;
        let code = run_program(Component::Translate, &self.python, args, Stdio::inherit()).await?;
        Ok(translate_result(code))
    }
}

/// Runs the search engine binary on the intermediate artifact.
#[derive(Debug, Clone)]
pub struct ProcessSearchEngine {
    binary: PathBuf,
}

impl ProcessSearchEngine {
    /// Creates a search engine running `binary`.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Builds the search argument list.
    #[must_use]
    pub fn arguments(request: &PlanningRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = os_args(request.search_options.iter().cloned()).collect();
        if let Some(portfolio) = &request.portfolio {
            args.push("--portfolio".into());
            args.push(portfolio.into());
        }
        if let Some(bound) = request.portfolio_bound {
            args.push("--portfolio-bound".into());
            args.push(bound.to_string().into());
        }
        if request.portfolio_single_plan {
            args.push("--portfolio-single-plan".into());
        }
        args.push("--internal-plan-file".into());
        args.push(request.plan_file.clone().into());
        args
    }
}

#[async_trait]
impl SearchEngine for ProcessSearchEngine {
    async fn search(&self, request: &PlanningRequest) -> Result<StageResult, DriverError> {
        let plans = PlanManager::new(&request.plan_file);
        plans.remove_plans().await?;

        let artifact = request.artifact_path();
        let input = tokio::fs::File::open(artifact).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => DriverError::from(ArtifactError::missing(artifact)),
            _ => DriverError::from(e),
        })?;
        let input = input.into_std().await;

        let args = Self::arguments(request);
        let code = run_program(Component::Search, &self.binary, args, Stdio::from(input)).await?;
        if exit_codes::plan_found(code) {
            match plans.lowest_cost().await {
                Ok(Some(cost)) => info!(cost, "best plan cost"),
                Ok(None) => debug!("plans carry no cost trailer"),
                Err(e) => warn!(error = %e, "failed to read plan costs"),
            }
        }
        Ok(StageResult::new(code, code == exit_codes::SUCCESS))
    }
}

/// Runs the plan validator on every plan written by search.
#[derive(Debug, Clone)]
pub struct ProcessValidator {
    binary: PathBuf,
}

impl ProcessValidator {
    /// Creates a validator running `binary`.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Builds the validator argument list for the given plans.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingInput`] unless the request names exactly
    /// a domain and a problem file.
    pub fn arguments(request: &PlanningRequest, plans: &[PathBuf]) -> Result<Vec<OsString>, ConfigError> {
        let [domain, problem] = request.inputs.as_slice() else {
            return Err(ConfigError::missing_input(
                Component::Validate,
                "validation needs a domain and a problem file",
            ));
        };
        let mut args: Vec<OsString> = os_args(request.validate_options.iter().cloned()).collect();
        args.push(domain.into());
        args.push(problem.into());
        args.extend(os_args(plans.iter().cloned()));
        Ok(args)
    }
}

#[async_trait]
impl PlanValidator for ProcessValidator {
    async fn validate(&self, request: &PlanningRequest) -> Result<StageResult, DriverError> {
        let plans = PlanManager::new(&request.plan_file).find_plans().await?;
        if plans.is_empty() {
            info!("Not running validate since no plans found.");
            return Ok(StageResult::proceed(exit_codes::SUCCESS));
        }
        let args = Self::arguments(request, &plans)?;
        let code = run_program(Component::Validate, &self.binary, args, Stdio::inherit()).await?;
        Ok(StageResult::new(code, code == exit_codes::SUCCESS))
    }
}

/// The process-backed collaborators described by a configuration.
#[derive(Debug, Clone)]
pub struct ProcessComponents {
    /// The translator.
    pub translator: ProcessTranslator,
    /// The search engine.
    pub search: ProcessSearchEngine,
    /// The validator.
    pub validator: ProcessValidator,
}

impl ProcessComponents {
    /// Creates the collaborators from configured program paths.
    #[must_use]
    pub fn from_paths(paths: &ComponentPaths) -> Self {
        Self {
            translator: ProcessTranslator::new(&paths.python, &paths.translator),
            search: ProcessSearchEngine::new(&paths.search),
            validator: ProcessValidator::new(&paths.validator),
        }
    }
}
