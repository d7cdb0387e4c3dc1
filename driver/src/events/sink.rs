//! Status sink trait and implementations.

use crate::core::Component;
use parking_lot::RwLock;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

/// A human-readable observation about a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    /// A stage finished with the given exit code.
    StageExit {
        /// The stage that finished.
        component: Component,
        /// Its exit code.
        exit_code: i32,
    },
    /// The intermediate artifact is about to be removed.
    RemoveArtifact {
        /// The artifact path.
        path: PathBuf,
    },
    /// The pipeline stops after the given stage.
    Aborting {
        /// The last stage that ran.
        component: Component,
    },
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StageExit {
                component,
                exit_code,
            } => write!(f, "{component} exit code: {exit_code}"),
            Self::RemoveArtifact { path } => {
                write!(f, "Remove intermediate file {}", path.display())
            }
            Self::Aborting { component } => write!(f, "Driver aborting after {component}"),
        }
    }
}

/// Trait for sinks receiving status lines.
///
/// Reporting never fails; a sink that cannot deliver a line drops it.
pub trait StatusSink: Send + Sync {
    /// Reports one status line.
    fn report(&self, line: StatusLine);
}

/// A sink that discards every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStatusSink;

impl StatusSink for NoOpStatusSink {
    fn report(&self, _line: StatusLine) {}
}

/// Prints status lines to stdout, as the one-shot frontend does.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutStatusSink;

impl StatusSink for StdoutStatusSink {
    fn report(&self, line: StatusLine) {
        debug!(status = %line, "status line");
        println!("{line}");
        if matches!(line, StatusLine::StageExit { .. }) {
            println!();
        }
    }
}

/// Logs status lines through `tracing`, as the service frontend does.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStatusSink;

impl StatusSink for TracingStatusSink {
    fn report(&self, line: StatusLine) {
        match &line {
            StatusLine::StageExit {
                component,
                exit_code,
            } => info!(component = %component, exit_code, "{line}"),
            StatusLine::RemoveArtifact { path } => info!(path = %path.display(), "{line}"),
            StatusLine::Aborting { component } => info!(component = %component, "{line}"),
        }
    }
}

/// A collecting sink for testing purposes.
#[derive(Debug, Default)]
pub struct CollectingStatusSink {
    lines: RwLock<Vec<StatusLine>>,
}

impl CollectingStatusSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected lines.
    #[must_use]
    pub fn lines(&self) -> Vec<StatusLine> {
        self.lines.read().clone()
    }

    /// Returns all collected lines rendered as text.
    #[must_use]
    pub fn rendered(&self) -> Vec<String> {
        self.lines.read().iter().map(ToString::to_string).collect()
    }

    /// Returns the number of collected lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.read().len()
    }

    /// Returns true if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.read().is_empty()
    }

    /// Counts the stage exit lines.
    #[must_use]
    pub fn stage_exits(&self) -> usize {
        self.lines
            .read()
            .iter()
            .filter(|line| matches!(line, StatusLine::StageExit { .. }))
            .count()
    }

    /// Clears all collected lines.
    pub fn clear(&self) {
        self.lines.write().clear();
    }
}

impl StatusSink for CollectingStatusSink {
    fn report(&self, line: StatusLine) {
        self.lines.write().push(line);
    }
}
