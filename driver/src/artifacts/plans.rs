//! Plan files written by the search engine.
//!
//! A single plan goes to `<prefix>`. When search produces several plans
//! they are numbered `<prefix>.1`, `<prefix>.2`, ... without gaps. Every
//! plan file lists one `(operator)` per line and ends with a trailer of the
//! form `; cost = 42 (unit cost)`.

use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static COST_TRAILER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^; cost = (\d+) \((unit cost|general cost)\)$").expect("plan cost pattern is valid")
});

/// Finds, reads and deletes the plan files sharing one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanManager {
    prefix: PathBuf,
}

impl PlanManager {
    /// Creates a manager for plan files starting with `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns the plan file prefix.
    #[must_use]
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// Returns the path of the numbered plan `number`.
    #[must_use]
    pub fn numbered_plan(&self, number: usize) -> PathBuf {
        let mut name = self.prefix.clone().into_os_string();
        name.push(format!(".{number}"));
        PathBuf::from(name)
    }

    /// Returns the existing plan files in order.
    #[must_use]
    pub fn existing_plans(&self) -> Vec<PathBuf> {
        if self.prefix.is_file() {
            return vec![self.prefix.clone()];
        }
        (1..)
            .map(|number| self.numbered_plan(number))
            .take_while(|path| path.is_file())
            .collect()
    }

    /// Deletes every existing plan file and returns the removed paths.
    ///
    /// # Errors
    ///
    /// Returns the first IO error hit while removing a file.
    pub fn delete_existing_plans(&self) -> io::Result<Vec<PathBuf>> {
        let plans = self.existing_plans();
        for plan in &plans {
            debug!(path = %plan.display(), "removing plan file");
            std::fs::remove_file(plan)?;
        }
        Ok(plans)
    }

    /// Reads the cost recorded in the trailer of a plan file.
    ///
    /// Returns `Ok(None)` when the file has no cost trailer, which happens
    /// when search was interrupted while writing it.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read.
    pub fn plan_cost(path: &Path) -> io::Result<Option<u64>> {
        let content = std::fs::read_to_string(path)?;
        let cost = content
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .and_then(|line| COST_TRAILER.captures(line.trim_end()))
            .and_then(|caps| caps[1].parse().ok());
        Ok(cost)
    }

    /// Returns the lowest cost among the existing plans.
    ///
    /// # Errors
    ///
    /// Returns an IO error if a plan file cannot be read.
    pub fn best_plan_cost(&self) -> io::Result<Option<u64>> {
        let mut best = None;
        for plan in self.existing_plans() {
            if let Some(cost) = Self::plan_cost(&plan)? {
                best = Some(best.map_or(cost, |b: u64| b.min(cost)));
            }
        }
        Ok(best)
    }

    /// Like [`PlanManager::existing_plans`], on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the blocking task fails.
    pub async fn find_plans(&self) -> io::Result<Vec<PathBuf>> {
        self.blocking(|manager| Ok(manager.existing_plans())).await
    }

    /// Like [`PlanManager::delete_existing_plans`], on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns the first IO error hit while removing a file.
    pub async fn remove_plans(&self) -> io::Result<Vec<PathBuf>> {
        self.blocking(Self::delete_existing_plans).await
    }

    /// Like [`PlanManager::best_plan_cost`], on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns an IO error if a plan file cannot be read.
    pub async fn lowest_cost(&self) -> io::Result<Option<u64>> {
        self.blocking(Self::best_plan_cost).await
    }

    async fn blocking<T, F>(&self, job: F) -> io::Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Self) -> io::Result<T> + Send + 'static,
    {
        let manager = self.clone();
        tokio::task::spawn_blocking(move || job(&manager))
            .await
            .map_err(io::Error::other)?
    }
}
