//! Migration Path - Ordered execution plans built from a scan
//!
//! Up plans run oldest first, down plans run newest first. Each direction is
//! sorted on its own, so a down plan never depends on how the up plan is
//! ordered. Equal dates are ordered by logical id, then by filename.

use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Instant;

use crate::database::{DestinationDatabase, ScriptOutcome};
use crate::errors::{CoreError, CoreResult};
use crate::task_file::{Direction, TaskFile};

/// Immutable snapshot of the migrations found by one scan
#[derive(Debug, Clone)]
pub struct MigrationPath {
    files: Vec<TaskFile>,
}

/// Script that stopped a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedScript {
    pub name: String,
    pub diagnostic: Option<String>,
}

/// What happened during one `migrate` call
#[derive(Debug, Clone, Serialize)]
pub struct MigrationRun {
    /// Direction that was executed
    pub direction: Direction,
    /// Scripts that completed, in execution order
    pub applied: Vec<String>,
    /// Script that failed, if any
    pub failed: Option<FailedScript>,
    /// Scripts that never ran because an earlier one failed
    pub remaining: Vec<String>,
    /// Wall time of the run in milliseconds
    pub execution_time_ms: u128,
}

impl MigrationRun {
    /// True only if every script in the plan executed without error
    pub fn succeeded(&self) -> bool {
        self.failed.is_none()
    }

    /// Turn a failed run into a `ScriptExecution` error
    pub fn into_result(self) -> CoreResult<Self> {
        match &self.failed {
            None => Ok(self),
            Some(failed) => Err(CoreError::script_execution(
                failed.name.clone(),
                failed
                    .diagnostic
                    .clone()
                    .unwrap_or_else(|| "no diagnostic reported".to_string()),
            )),
        }
    }
}

impl MigrationPath {
    pub fn new(files: Vec<TaskFile>) -> Self {
        Self { files }
    }

    /// Every file in the snapshot, in scan order
    pub fn files(&self) -> &[TaskFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files for one direction in execution order
    pub fn path(&self, direction: Direction) -> Vec<&TaskFile> {
        let mut plan: Vec<&TaskFile> = self
            .files
            .iter()
            .filter(|f| f.direction() == direction)
            .collect();

        plan.sort_by(|a, b| {
            let ascending = a
                .timestamp()
                .cmp(&b.timestamp())
                .then_with(|| a.logical_id().cmp(b.logical_id()))
                .then_with(|| a.name().cmp(b.name()));
            match direction {
                Direction::Up => ascending,
                Direction::Down => ascending.reverse(),
            }
        });

        plan
    }

    /// Logical ids that have only one of their two halves, sorted
    pub fn unpaired(&self) -> Vec<String> {
        let up = self.logical_ids(Direction::Up);
        let down = self.logical_ids(Direction::Down);
        up.symmetric_difference(&down)
            .map(|id| id.to_string())
            .collect()
    }

    /// Logical ids with more than one script in the same direction, sorted
    pub fn duplicates(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut duplicated = BTreeSet::new();
        for file in &self.files {
            if !seen.insert((file.direction(), file.logical_id())) {
                duplicated.insert(file.logical_id());
            }
        }
        duplicated.into_iter().map(str::to_string).collect()
    }

    /// True if every logical id has exactly one up and one down script and
    /// there is at least one
    pub fn ready(&self) -> bool {
        !self.logical_ids(Direction::Up).is_empty()
            && self.unpaired().is_empty()
            && self.duplicates().is_empty()
    }

    /// Fail with `PairingIncomplete` unless the path is ready
    pub fn ensure_ready(&self) -> CoreResult<()> {
        if self.ready() {
            Ok(())
        } else {
            Err(CoreError::PairingIncomplete {
                unpaired: self.unpaired(),
                duplicates: self.duplicates(),
            })
        }
    }

    /// Execute the plan for `direction` one script at a time
    ///
    /// Stops at the first script that cannot be read or that the database
    /// reports as failed; later scripts are listed in `MigrationRun::remaining`
    /// and never run. Scripts that already ran are not undone.
    pub async fn migrate<D>(&self, direction: Direction, database: &D) -> CoreResult<MigrationRun>
    where
        D: DestinationDatabase + ?Sized,
    {
        self.ensure_ready()?;

        let start_time = Instant::now();
        let plan = self.path(direction);
        let mut applied = Vec::with_capacity(plan.len());

        tracing::info!(%direction, scripts = plan.len(), "starting migration run");

        for (index, task) in plan.iter().enumerate() {
            let outcome = match task.read_script() {
                Ok(script) => database.execute(&script).await,
                Err(e) => ScriptOutcome::failure(e.to_string()),
            };

            if !outcome.is_success() {
                tracing::error!(
                    file = task.name(),
                    diagnostic = outcome.diagnostic.as_deref().unwrap_or(""),
                    "migration script failed, stopping"
                );
                return Ok(MigrationRun {
                    direction,
                    applied,
                    failed: Some(FailedScript {
                        name: task.name().to_string(),
                        diagnostic: outcome.diagnostic,
                    }),
                    remaining: plan[index + 1..]
                        .iter()
                        .map(|t| t.name().to_string())
                        .collect(),
                    execution_time_ms: start_time.elapsed().as_millis(),
                });
            }

            tracing::info!(file = task.name(), "applied migration script");
            applied.push(task.name().to_string());
        }

        tracing::info!(%direction, applied = applied.len(), "migration run complete");

        Ok(MigrationRun {
            direction,
            applied,
            failed: None,
            remaining: Vec::new(),
            execution_time_ms: start_time.elapsed().as_millis(),
        })
    }

    fn logical_ids(&self, direction: Direction) -> BTreeSet<&str> {
        self.files
            .iter()
            .filter(|f| f.direction() == direction)
            .map(|f| f.logical_id())
            .collect()
    }
}
