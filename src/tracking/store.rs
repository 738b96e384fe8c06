//! Experiment Store - in-memory storage for tracking data
//!
//! Backing storage for [`super::MemoryBackend`], optimized for
//! time-series metric queries.

use std::collections::HashMap;

use super::{ArtifactRecord, ExperimentRecord, MetricRecord, ParamRecord, RunRecord};

/// In-memory store for experiment tracking data.
///
/// Hash maps give O(1) lookups by id; experiments are additionally indexed
/// by name, which is the unit of idempotent resolution. Metrics live in a
/// vector that is filtered and step-sorted on query.
#[derive(Debug, Default)]
pub struct ExperimentStore {
    experiments: HashMap<String, ExperimentRecord>,
    by_name: HashMap<String, String>,
    runs: HashMap<String, RunRecord>,
    params: Vec<ParamRecord>,
    metrics: Vec<MetricRecord>,
    artifacts: Vec<ArtifactRecord>,
}

impl ExperimentStore {
    /// Create a new empty experiment store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the store holds no records of any kind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
            && self.runs.is_empty()
            && self.params.is_empty()
            && self.metrics.is_empty()
            && self.artifacts.is_empty()
    }

    /// Get the number of experiments in the store.
    #[must_use]
    pub fn experiment_count(&self) -> usize {
        self.experiments.len()
    }

    /// Get the number of runs in the store.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Get the number of metric records in the store.
    #[must_use]
    pub fn metric_count(&self) -> usize {
        self.metrics.len()
    }

    /// Get the number of param records in the store.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Add an experiment to the store, indexing it by name.
    pub fn add_experiment(&mut self, experiment: ExperimentRecord) {
        self.by_name.insert(
            experiment.name().to_string(),
            experiment.experiment_id().to_string(),
        );
        self.experiments
            .insert(experiment.experiment_id().to_string(), experiment);
    }

    /// Get an experiment by ID.
    #[must_use]
    pub fn get_experiment(&self, experiment_id: &str) -> Option<&ExperimentRecord> {
        self.experiments.get(experiment_id)
    }

    /// Get an experiment by name.
    #[must_use]
    pub fn get_experiment_by_name(&self, name: &str) -> Option<&ExperimentRecord> {
        self.by_name
            .get(name)
            .and_then(|id| self.experiments.get(id))
    }

    /// Add a run to the store.
    pub fn add_run(&mut self, run: RunRecord) {
        self.runs.insert(run.run_id().to_string(), run);
    }

    /// Get a run by ID.
    #[must_use]
    pub fn get_run(&self, run_id: &str) -> Option<&RunRecord> {
        self.runs.get(run_id)
    }

    /// Get a mutable run by ID.
    pub fn get_run_mut(&mut self, run_id: &str) -> Option<&mut RunRecord> {
        self.runs.get_mut(run_id)
    }

    /// Get all runs for an experiment.
    #[must_use]
    pub fn get_runs_for_experiment(&self, experiment_id: &str) -> Vec<&RunRecord> {
        self.runs
            .values()
            .filter(|run| run.experiment_id() == experiment_id)
            .collect()
    }

    /// Add a param record to the store.
    pub fn add_param(&mut self, param: ParamRecord) {
        self.params.push(param);
    }

    /// Get all param records for a run.
    #[must_use]
    pub fn get_params_for_run(&self, run_id: &str) -> Vec<&ParamRecord> {
        self.params
            .iter()
            .filter(|p| p.run_id() == run_id)
            .collect()
    }

    /// Add a metric record to the store.
    pub fn add_metric(&mut self, metric: MetricRecord) {
        self.metrics.push(metric);
    }

    /// Get metrics for a specific run and key, ordered by step.
    ///
    /// Unstepped metrics sort before stepped ones; stepped metrics are in
    /// ascending step order, which is what time-series consumers expect.
    #[must_use]
    pub fn get_metrics_for_run(&self, run_id: &str, key: &str) -> Vec<MetricRecord> {
        let mut metrics: Vec<MetricRecord> = self
            .metrics
            .iter()
            .filter(|m| m.run_id() == run_id && m.key() == key)
            .cloned()
            .collect();

        metrics.sort_by_key(MetricRecord::step);

        metrics
    }

    /// Get all metric records for a run, in insertion order.
    #[must_use]
    pub fn get_all_metrics_for_run(&self, run_id: &str) -> Vec<&MetricRecord> {
        self.metrics
            .iter()
            .filter(|m| m.run_id() == run_id)
            .collect()
    }

    /// Add an artifact record to the store.
    pub fn add_artifact(&mut self, artifact: ArtifactRecord) {
        self.artifacts.push(artifact);
    }

    /// Get all artifact records for a run.
    #[must_use]
    pub fn get_artifacts_for_run(&self, run_id: &str) -> Vec<&ArtifactRecord> {
        self.artifacts
            .iter()
            .filter(|a| a.run_id() == run_id)
            .collect()
    }
}
