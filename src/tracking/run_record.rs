//! Run Record - one tracked execution instance under an experiment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a run.
///
/// Runs start `Running` (run creation is eager, there is no pending
/// phase) and terminate `Finished` or `Failed`. A terminated run can be
/// resumed, which puts it back to `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run is currently executing and accepting records.
    Running,
    /// Run terminated normally.
    Finished,
    /// Run terminated with an error.
    Failed,
}

/// Run Record represents a single execution of an experiment.
///
/// Each experiment can have multiple runs; the run id is assigned by the
/// backend at run-start and identifies the run for its whole lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunRecord {
    run_id: String,
    experiment_id: String,
    status: RunStatus,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl RunRecord {
    /// Create a new run record, already `Running`.
    ///
    /// # Arguments
    ///
    /// * `run_id` - Backend-assigned identifier for the run
    /// * `experiment_id` - ID of the parent experiment
    #[must_use]
    pub fn new(run_id: impl Into<String>, experiment_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            experiment_id: experiment_id.into(),
            status: RunStatus::Running,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the parent experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the current run status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Get the start timestamp.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Get the end timestamp, if the run has terminated.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Terminate the run with the given final status.
    ///
    /// Sets the `ended_at` timestamp to now.
    pub fn finish(&mut self, status: RunStatus) {
        self.status = status;
        self.ended_at = Some(Utc::now());
    }

    /// Put a terminated run back to `Running`, clearing its end timestamp.
    ///
    /// Used by same-run test logging, where test metrics land in the run
    /// that training already closed.
    pub fn resume(&mut self) {
        self.status = RunStatus::Running;
        self.ended_at = None;
    }
}
