//! Tracking logger - training callbacks mirrored into a tracking backend
//!
//! One logger instance owns one training run: construction resolves the
//! experiment and eagerly starts the run, lifecycle callbacks stream
//! params and metrics into the backend, and the test phase either reopens
//! the training run or isolates itself in a fresh one.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::{TrainParams, TrainingCallback};
use crate::config::flatten_params;
use crate::error::{Error, Result};
use crate::tracking::{FileBackend, RestBackend, TrackingBackend, TrackingUri};

/// Artifact name the trained model is stored under.
pub const MODEL_ARTIFACT_KEY: &str = "trained-model";

/// Behavior switches for [`TrackingLogger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggerOptions {
    batch_granularity: bool,
    same_run_logging: bool,
}

impl Default for LoggerOptions {
    /// Epoch-level metrics only; test metrics reuse the training run.
    fn default() -> Self {
        Self {
            batch_granularity: false,
            same_run_logging: true,
        }
    }
}

impl LoggerOptions {
    /// Create the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record per-batch metrics in addition to per-epoch ones.
    #[must_use]
    pub const fn batch_granularity(mut self, enabled: bool) -> Self {
        self.batch_granularity = enabled;
        self
    }

    /// Log test-phase metrics into the training run (`true`) or into a
    /// fresh isolated run (`false`).
    #[must_use]
    pub const fn same_run_logging(mut self, enabled: bool) -> Self {
        self.same_run_logging = enabled;
        self
    }

    /// Whether per-batch metrics are recorded.
    #[must_use]
    pub const fn is_batch_granularity(&self) -> bool {
        self.batch_granularity
    }

    /// Whether test metrics reuse the training run.
    #[must_use]
    pub const fn is_same_run_logging(&self) -> bool {
        self.same_run_logging
    }
}

/// Which run the logger currently has open in the backend.
///
/// The transitions are guarded: operations that need an open run fail
/// with [`Error::NoActiveRun`] instead of leaking a backend error, and
/// reopening over a live run fails with [`Error::RunActive`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum RunState {
    /// A run is open and accepting records.
    Active {
        /// Id of the open run - the training run, or an isolated test run.
        run_id: String,
    },
    /// The last open run was terminated.
    Ended,
}

/// Adapter between training-loop callbacks and a tracking backend.
///
/// Construction resolves the experiment name idempotently (create, or on
/// a name collision look the existing one up) and starts a run under it,
/// so the run is backend-visible before any training step. The
/// constructor-assigned run id is retained unchanged for the whole
/// lifetime of the logger; test-phase isolation only changes which run is
/// currently open.
///
/// ## Usage
///
/// ```rust
/// use std::collections::HashMap;
/// use bitacora::logger::{LoggerOptions, TrackingLogger, TrainingCallback, TrainParams};
/// use bitacora::tracking::MemoryBackend;
///
/// let backend = MemoryBackend::new();
/// let mut logger =
///     TrackingLogger::with_backend("exp1", backend, LoggerOptions::default())?;
///
/// logger.log_config_params(&serde_json::json!({"opt": {"lr": 0.1}}))?;
/// logger.on_train_begin(&TrainParams::new(2))?;
/// logger.on_epoch_end(0, &HashMap::from([("loss".to_string(), 0.9)]))?;
/// logger.on_epoch_end(1, &HashMap::from([("loss".to_string(), 0.5)]))?;
/// logger.on_train_end(&HashMap::new())?;
/// # Ok::<(), bitacora::Error>(())
/// ```
#[derive(Debug)]
pub struct TrackingLogger<B: TrackingBackend> {
    backend: B,
    uri: Option<TrackingUri>,
    experiment_id: String,
    run_id: String,
    state: RunState,
    options: LoggerOptions,
    epochs: Option<u64>,
}

impl TrackingLogger<FileBackend> {
    /// Construct a logger over a local-filesystem tracking store.
    ///
    /// An optional `root` is joined with the relative `path`; the result
    /// becomes a `file:` tracking location (root `/tmp/proj` + path
    /// `mlruns` resolves to `file:/tmp/proj/mlruns`).
    ///
    /// # Errors
    ///
    /// Returns an error if the store directory cannot be created or run
    /// creation fails.
    pub fn local(
        root: Option<&Path>,
        path: &Path,
        experiment_name: &str,
        options: LoggerOptions,
    ) -> Result<Self> {
        let uri = TrackingUri::local(root, path);
        let TrackingUri::File(ref store_root) = uri else {
            return Err(Error::UnsupportedUri(uri.to_string()));
        };
        let backend = FileBackend::new(store_root.clone())?;
        let mut logger = Self::with_backend(experiment_name, backend, options)?;
        logger.uri = Some(uri);
        Ok(logger)
    }
}

impl TrackingLogger<RestBackend> {
    /// Construct a logger against a remote tracking server.
    ///
    /// The `http(s)://` URI is passed through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedUri`] for a non-HTTP location, or any
    /// error the server raises during experiment/run creation.
    pub fn server(
        tracking_uri: &str,
        experiment_name: &str,
        options: LoggerOptions,
    ) -> Result<Self> {
        let uri = TrackingUri::parse(tracking_uri)?;
        let TrackingUri::Http(_) = uri else {
            return Err(Error::UnsupportedUri(tracking_uri.to_string()));
        };
        let backend = RestBackend::new(tracking_uri)?;
        let mut logger = Self::with_backend(experiment_name, backend, options)?;
        logger.uri = Some(uri);
        Ok(logger)
    }
}

impl<B: TrackingBackend> TrackingLogger<B> {
    /// Construct a logger over any backend - the shared base the location
    /// variants delegate to, and the injection seam for tests.
    ///
    /// # Errors
    ///
    /// Propagates experiment resolution and run creation failures.
    pub fn with_backend(experiment_name: &str, mut backend: B, options: LoggerOptions) -> Result<Self> {
        let experiment_id = resolve_experiment(&mut backend, experiment_name)?;
        let run = backend.start_run(&experiment_id)?;
        let run_id = run.run_id().to_string();
        Ok(Self {
            backend,
            uri: None,
            experiment_id,
            state: RunState::Active {
                run_id: run_id.clone(),
            },
            run_id,
            options,
            epochs: None,
        })
    }

    /// Tracking location the logger was constructed with, if any.
    #[must_use]
    pub const fn tracking_uri(&self) -> Option<&TrackingUri> {
        self.uri.as_ref()
    }

    /// Resolved experiment id.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Run id assigned at construction (the training run).
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Id of the currently open run, if one is open.
    #[must_use]
    pub fn active_run_id(&self) -> Option<&str> {
        match &self.state {
            RunState::Active { run_id } => Some(run_id),
            RunState::Ended => None,
        }
    }

    /// The options the logger was constructed with.
    #[must_use]
    pub const fn options(&self) -> &LoggerOptions {
        &self.options
    }

    /// Read access to the backend, for inspection in tests.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Log a configuration tree as parameter records.
    ///
    /// Flat mappings log directly; nested mappings and sequences flatten
    /// to one record per leaf with dot-joined path keys (see
    /// [`flatten_params`]).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveRun`] when no run is open; backend
    /// failures propagate.
    pub fn log_config_params(&mut self, params: &Value) -> Result<()> {
        self.require_active()?;
        for (key, value) in flatten_params(params) {
            self.backend.log_param(&key, &value)?;
        }
        Ok(())
    }

    /// Serialize the trained model and store it under
    /// [`MODEL_ARTIFACT_KEY`] in the open run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveRun`] when no run is open; serialization
    /// and backend failures propagate.
    pub fn log_model<M: Serialize>(&mut self, model: &M) -> Result<()> {
        self.require_active()?;
        let bytes = serde_json::to_vec(model)?;
        self.backend.log_artifact(MODEL_ARTIFACT_KEY, &bytes)
    }

    fn require_active(&self) -> Result<()> {
        match self.state {
            RunState::Active { .. } => Ok(()),
            RunState::Ended => Err(Error::NoActiveRun),
        }
    }
}

/// Resolve an experiment name to its id, creating it if needed.
///
/// Only the name-collision error kind triggers the lookup fallback;
/// every other creation failure propagates untouched.
fn resolve_experiment<B: TrackingBackend>(backend: &mut B, name: &str) -> Result<String> {
    match backend.create_experiment(name) {
        Ok(experiment_id) => Ok(experiment_id),
        Err(Error::ExperimentExists { .. }) => backend
            .get_experiment_by_name(name)?
            .map(|e| e.experiment_id().to_string())
            .ok_or_else(|| Error::ExperimentNotFound {
                name: name.to_string(),
            }),
        Err(err) => Err(err),
    }
}

impl<B: TrackingBackend> TrainingCallback for TrackingLogger<B> {
    fn on_train_begin(&mut self, params: &TrainParams) -> Result<()> {
        self.epochs = Some(params.epochs);
        Ok(())
    }

    fn on_train_batch_end(&mut self, batch_number: u64, logs: &HashMap<String, f64>) -> Result<()> {
        if !self.options.is_batch_granularity() {
            return Ok(());
        }
        self.require_active()?;
        for (key, value) in logs {
            self.backend.log_metric(key, *value, Some(batch_number))?;
        }
        Ok(())
    }

    fn on_epoch_end(&mut self, epoch_number: u64, logs: &HashMap<String, f64>) -> Result<()> {
        self.require_active()?;
        // The epoch index travels as the step, not as a metric value.
        for (key, value) in logs.iter().filter(|(key, _)| key.as_str() != "epoch") {
            self.backend.log_metric(key, *value, Some(epoch_number))?;
        }
        Ok(())
    }

    fn on_train_end(&mut self, _logs: &HashMap<String, f64>) -> Result<()> {
        self.require_active()?;
        let last_epoch = self.epochs.ok_or(Error::TrainParamsNotSet)?;
        #[allow(clippy::cast_precision_loss)]
        self.backend
            .log_metric("last-epoch", last_epoch as f64, None)?;
        self.backend.end_run()?;
        self.state = RunState::Ended;
        Ok(())
    }

    fn on_test_begin(&mut self, _logs: &HashMap<String, f64>) -> Result<()> {
        if let RunState::Active { run_id } = &self.state {
            return Err(Error::RunActive {
                run_id: run_id.clone(),
            });
        }
        let run_id = if self.options.is_same_run_logging() {
            // Reopen the training run; the stored id stays as-is.
            self.backend.resume_run(&self.run_id)?;
            self.run_id.clone()
        } else {
            // Isolate test metrics in a fresh run under the same experiment.
            let run = self.backend.start_run(&self.experiment_id)?;
            run.run_id().to_string()
        };
        self.state = RunState::Active { run_id };
        Ok(())
    }

    fn on_test_end(&mut self, logs: &HashMap<String, f64>) -> Result<()> {
        self.require_active()?;
        for (key, value) in logs {
            self.backend
                .log_metric(&format!("test-{key}"), *value, None)?;
        }
        self.backend.end_run()?;
        self.state = RunState::Ended;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::MemoryBackend;

    fn logs(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), *v))
            .collect()
    }

    fn memory_logger(options: LoggerOptions) -> TrackingLogger<MemoryBackend> {
        TrackingLogger::with_backend("exp1", MemoryBackend::new(), options).unwrap()
    }

    #[test]
    fn test_construction_starts_a_run() {
        let logger = memory_logger(LoggerOptions::default());
        assert_eq!(logger.active_run_id(), Some(logger.run_id()));
        assert_eq!(logger.backend().store().run_count(), 1);
    }

    #[test]
    fn test_experiment_resolution_is_idempotent() {
        let mut backend = MemoryBackend::new();
        let first = resolve_experiment(&mut backend, "exp1").unwrap();
        let second = resolve_experiment(&mut backend, "exp1").unwrap();
        assert_eq!(first, second);
        assert_eq!(backend.store().experiment_count(), 1);
    }

    #[test]
    fn test_epoch_end_drops_epoch_key() {
        let mut logger = memory_logger(LoggerOptions::default());
        logger
            .on_epoch_end(3, &logs(&[("epoch", 3.0), ("loss", 0.5), ("acc", 0.8)]))
            .unwrap();

        let run_id = logger.run_id().to_string();
        let store = logger.backend().store();
        assert!(store.get_metrics_for_run(&run_id, "epoch").is_empty());
        let loss = store.get_metrics_for_run(&run_id, "loss");
        assert_eq!(loss.len(), 1);
        assert_eq!(loss[0].step(), Some(3));
    }

    #[test]
    fn test_epoch_end_with_only_epoch_key_is_noop() {
        let mut logger = memory_logger(LoggerOptions::default());
        logger.on_epoch_end(0, &logs(&[("epoch", 0.0)])).unwrap();
        assert_eq!(logger.backend().store().metric_count(), 0);
    }

    #[test]
    fn test_batch_end_noop_without_granularity() {
        let mut logger = memory_logger(LoggerOptions::default());
        logger
            .on_train_batch_end(7, &logs(&[("loss", 0.9)]))
            .unwrap();
        assert_eq!(logger.backend().store().metric_count(), 0);
    }

    #[test]
    fn test_batch_end_logs_with_granularity() {
        let mut logger = memory_logger(LoggerOptions::new().batch_granularity(true));
        logger
            .on_train_batch_end(7, &logs(&[("loss", 0.9)]))
            .unwrap();

        let run_id = logger.run_id().to_string();
        let loss = logger.backend().store().get_metrics_for_run(&run_id, "loss");
        assert_eq!(loss.len(), 1);
        assert_eq!(loss[0].step(), Some(7));
    }

    #[test]
    fn test_batch_end_empty_logs_ok() {
        let mut logger = memory_logger(LoggerOptions::new().batch_granularity(true));
        logger.on_train_batch_end(0, &HashMap::new()).unwrap();
        assert_eq!(logger.backend().store().metric_count(), 0);
    }

    #[test]
    fn test_train_end_logs_last_epoch_and_ends_run() {
        let mut logger = memory_logger(LoggerOptions::default());
        logger.on_train_begin(&TrainParams::new(10)).unwrap();
        logger.on_train_end(&HashMap::new()).unwrap();

        assert!(logger.active_run_id().is_none());
        let run_id = logger.run_id().to_string();
        let last = logger
            .backend()
            .store()
            .get_metrics_for_run(&run_id, "last-epoch");
        assert_eq!(last.len(), 1);
        assert!((last[0].value() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_train_end_without_params_fails() {
        let mut logger = memory_logger(LoggerOptions::default());
        assert!(matches!(
            logger.on_train_end(&HashMap::new()).unwrap_err(),
            Error::TrainParamsNotSet
        ));
    }

    #[test]
    fn test_same_run_test_phase_reuses_training_run() {
        let mut logger = memory_logger(LoggerOptions::default());
        logger.on_train_begin(&TrainParams::new(1)).unwrap();
        logger.on_train_end(&HashMap::new()).unwrap();

        logger.on_test_begin(&HashMap::new()).unwrap();
        assert_eq!(logger.active_run_id(), Some(logger.run_id()));
        logger.on_test_end(&logs(&[("acc", 0.93)])).unwrap();

        let run_id = logger.run_id().to_string();
        let store = logger.backend().store();
        assert_eq!(store.run_count(), 1);
        let acc = store.get_metrics_for_run(&run_id, "test-acc");
        assert_eq!(acc.len(), 1);
        assert_eq!(acc[0].step(), None);
    }

    #[test]
    fn test_isolated_test_phase_starts_new_run() {
        let mut logger = memory_logger(LoggerOptions::new().same_run_logging(false));
        logger.on_train_begin(&TrainParams::new(1)).unwrap();
        logger.on_train_end(&HashMap::new()).unwrap();

        logger.on_test_begin(&HashMap::new()).unwrap();
        let test_run = logger.active_run_id().unwrap().to_string();
        assert_ne!(test_run, logger.run_id());
        // The constructor-assigned id is never reassigned.
        logger.on_test_end(&logs(&[("acc", 0.93)])).unwrap();

        let store = logger.backend().store();
        assert_eq!(store.run_count(), 2);
        assert_eq!(store.get_metrics_for_run(&test_run, "test-acc").len(), 1);
    }

    #[test]
    fn test_test_begin_while_active_fails() {
        let mut logger = memory_logger(LoggerOptions::default());
        assert!(matches!(
            logger.on_test_begin(&HashMap::new()).unwrap_err(),
            Error::RunActive { .. }
        ));
    }

    #[test]
    fn test_test_end_without_begin_fails() {
        let mut logger = memory_logger(LoggerOptions::default());
        logger.on_train_begin(&TrainParams::new(1)).unwrap();
        logger.on_train_end(&HashMap::new()).unwrap();
        assert!(matches!(
            logger.on_test_end(&HashMap::new()).unwrap_err(),
            Error::NoActiveRun
        ));
    }

    #[test]
    fn test_log_config_params_flattens() {
        let mut logger = memory_logger(LoggerOptions::default());
        logger
            .log_config_params(&serde_json::json!({"opt": {"lr": 0.1, "layers": [64, 32]}}))
            .unwrap();

        let run_id = logger.run_id().to_string();
        let params = logger.backend().store().get_params_for_run(&run_id);
        assert_eq!(params.len(), 3);
        assert!(params.iter().any(|p| p.key() == "opt.lr" && p.value() == "0.1"));
        assert!(params.iter().any(|p| p.key() == "opt.layers.0" && p.value() == "64"));
        assert!(params.iter().any(|p| p.key() == "opt.layers.1" && p.value() == "32"));
    }

    #[test]
    fn test_log_model_stores_artifact() {
        #[derive(Serialize)]
        struct Net {
            weights: Vec<f64>,
        }

        let mut logger = memory_logger(LoggerOptions::default());
        logger
            .log_model(&Net {
                weights: vec![0.1, 0.2],
            })
            .unwrap();

        let run_id = logger.run_id().to_string();
        let artifacts = logger.backend().store().get_artifacts_for_run(&run_id);
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].key(), MODEL_ARTIFACT_KEY);
    }

    #[test]
    fn test_log_model_after_end_fails() {
        let mut logger = memory_logger(LoggerOptions::default());
        logger.on_train_begin(&TrainParams::new(1)).unwrap();
        logger.on_train_end(&HashMap::new()).unwrap();
        assert!(matches!(
            logger.log_model(&42).unwrap_err(),
            Error::NoActiveRun
        ));
    }
}
