//! Tracking backend trait and the in-memory implementation
//!
//! The backend owns the notion of an "active run": parameters, metrics,
//! and artifacts are always logged against whichever run is currently
//! active, mirroring the tracking API the logger adapts to.

use uuid::Uuid;

use super::{ArtifactRecord, ExperimentRecord, ExperimentStore, MetricRecord, ParamRecord, RunRecord, RunStatus};
use crate::error::{Error, Result};

/// Storage seam for experiment tracking.
///
/// All calls are synchronous and blocking; a failure propagates to the
/// caller unmodified. Implementations keep one active run at a time.
pub trait TrackingBackend {
    /// Create an experiment with the given name and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExperimentExists`] if the name is already taken -
    /// the distinct error kind the idempotent resolve path relies on.
    fn create_experiment(&mut self, name: &str) -> Result<String>;

    /// Look up an experiment by name.
    ///
    /// # Errors
    ///
    /// Returns an error only on backend failure; an unknown name is `None`.
    fn get_experiment_by_name(&self, name: &str) -> Result<Option<ExperimentRecord>>;

    /// Start a fresh run under an experiment and make it active.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RunActive`] if a run is already active.
    fn start_run(&mut self, experiment_id: &str) -> Result<RunRecord>;

    /// Reopen a terminated run by id and make it active again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RunNotFound`] for an unknown id and
    /// [`Error::RunActive`] if a run is already active.
    fn resume_run(&mut self, run_id: &str) -> Result<()>;

    /// Log one parameter against the active run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveRun`] if no run is active.
    fn log_param(&mut self, key: &str, value: &str) -> Result<()>;

    /// Log one metric against the active run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveRun`] if no run is active.
    fn log_metric(&mut self, key: &str, value: f64, step: Option<u64>) -> Result<()>;

    /// Store an artifact under the active run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveRun`] if no run is active.
    fn log_artifact(&mut self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Terminate the active run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveRun`] if no run is active.
    fn end_run(&mut self) -> Result<()>;

    /// Id of the currently active run, if any.
    fn active_run_id(&self) -> Option<&str>;
}

/// In-memory tracking backend.
///
/// Backed by [`ExperimentStore`]; used by tests and by callers that want
/// run mirroring without any persistence.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    store: ExperimentStore,
    artifact_bytes: std::collections::HashMap<(String, String), Vec<u8>>,
    active_run: Option<String>,
}

impl MemoryBackend {
    /// Create a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the underlying store, for inspection in tests.
    #[must_use]
    pub const fn store(&self) -> &ExperimentStore {
        &self.store
    }

    /// Get stored artifact bytes for a run and key.
    #[must_use]
    pub fn artifact_bytes(&self, run_id: &str, key: &str) -> Option<&[u8]> {
        self.artifact_bytes
            .get(&(run_id.to_string(), key.to_string()))
            .map(Vec::as_slice)
    }

    fn require_active(&self) -> Result<String> {
        self.active_run.clone().ok_or(Error::NoActiveRun)
    }
}

impl TrackingBackend for MemoryBackend {
    fn create_experiment(&mut self, name: &str) -> Result<String> {
        if self.store.get_experiment_by_name(name).is_some() {
            return Err(Error::ExperimentExists {
                name: name.to_string(),
            });
        }
        let experiment_id = Uuid::new_v4().to_string();
        self.store
            .add_experiment(ExperimentRecord::new(&experiment_id, name));
        Ok(experiment_id)
    }

    fn get_experiment_by_name(&self, name: &str) -> Result<Option<ExperimentRecord>> {
        Ok(self.store.get_experiment_by_name(name).cloned())
    }

    fn start_run(&mut self, experiment_id: &str) -> Result<RunRecord> {
        if let Some(run_id) = &self.active_run {
            return Err(Error::RunActive {
                run_id: run_id.clone(),
            });
        }
        let run = RunRecord::new(Uuid::new_v4().to_string(), experiment_id);
        self.active_run = Some(run.run_id().to_string());
        self.store.add_run(run.clone());
        Ok(run)
    }

    fn resume_run(&mut self, run_id: &str) -> Result<()> {
        if let Some(active) = &self.active_run {
            return Err(Error::RunActive {
                run_id: active.clone(),
            });
        }
        self.store
            .get_run_mut(run_id)
            .ok_or_else(|| Error::RunNotFound {
                run_id: run_id.to_string(),
            })?
            .resume();
        self.active_run = Some(run_id.to_string());
        Ok(())
    }

    fn log_param(&mut self, key: &str, value: &str) -> Result<()> {
        let run_id = self.require_active()?;
        self.store.add_param(ParamRecord::new(run_id, key, value));
        Ok(())
    }

    fn log_metric(&mut self, key: &str, value: f64, step: Option<u64>) -> Result<()> {
        let run_id = self.require_active()?;
        let metric = match step {
            Some(step) => MetricRecord::new(run_id, key, step, value),
            None => MetricRecord::unstepped(run_id, key, value),
        };
        self.store.add_metric(metric);
        Ok(())
    }

    fn log_artifact(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        let run_id = self.require_active()?;
        self.store
            .add_artifact(ArtifactRecord::from_bytes(&run_id, key, bytes));
        self.artifact_bytes
            .insert((run_id, key.to_string()), bytes.to_vec());
        Ok(())
    }

    fn end_run(&mut self) -> Result<()> {
        let run_id = self.require_active()?;
        if let Some(run) = self.store.get_run_mut(&run_id) {
            run.finish(RunStatus::Finished);
        }
        self.active_run = None;
        Ok(())
    }

    fn active_run_id(&self) -> Option<&str> {
        self.active_run.as_deref()
    }
}
