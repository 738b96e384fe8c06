//! Logger Lifecycle Tests
//!
//! End-to-end scenarios: construction through train, test, and artifact
//! phases, against both the in-memory and the file-backed store.

use std::collections::HashMap;
use std::path::Path;

use bitacora::logger::{LoggerOptions, TrackingLogger, TrainingCallback, TrainParams, MODEL_ARTIFACT_KEY};
use bitacora::tracking::{MemoryBackend, RunStatus, TrackingBackend, TrackingUri};

fn logs(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
}

#[test]
fn test_local_location_resolution() {
    // Location formatting is pure: no store is created for this check.
    let uri = TrackingUri::local(Some(Path::new("/tmp/proj")), Path::new("mlruns"));
    assert_eq!(uri.to_string(), "file:/tmp/proj/mlruns");
}

#[test]
fn test_local_variant_starts_run_under_named_experiment() {
    let dir = tempfile::tempdir().unwrap();

    let logger = TrackingLogger::local(
        Some(dir.path()),
        Path::new("mlruns"),
        "exp1",
        LoggerOptions::default(),
    )
    .unwrap();

    let expected = TrackingUri::local(Some(dir.path()), Path::new("mlruns"));
    assert_eq!(logger.tracking_uri(), Some(&expected));

    // Experiment resolved by name, run eagerly started under it.
    let experiment = logger
        .backend()
        .get_experiment_by_name("exp1")
        .unwrap()
        .expect("experiment created at construction");
    assert_eq!(experiment.experiment_id(), logger.experiment_id());
    assert_eq!(logger.active_run_id(), Some(logger.run_id()));

    // Store root landed where the joined location points.
    assert!(dir.path().join("mlruns").is_dir());
}

#[test]
fn test_local_variant_reuses_existing_experiment() {
    let dir = tempfile::tempdir().unwrap();

    let first = TrackingLogger::local(
        Some(dir.path()),
        Path::new("mlruns"),
        "exp1",
        LoggerOptions::default(),
    )
    .unwrap();
    let first_experiment = first.experiment_id().to_string();
    let first_run = first.run_id().to_string();
    drop(first);

    // Second construction with the same name resolves the same experiment
    // and gets a fresh run.
    let second = TrackingLogger::local(
        Some(dir.path()),
        Path::new("mlruns"),
        "exp1",
        LoggerOptions::default(),
    )
    .unwrap();

    assert_eq!(second.experiment_id(), first_experiment);
    assert_ne!(second.run_id(), first_run);
}

#[test]
fn test_full_training_lifecycle_on_disk() {
    let dir = tempfile::tempdir().unwrap();

    let mut logger = TrackingLogger::local(
        None,
        &dir.path().join("mlruns"),
        "exp1",
        LoggerOptions::new().batch_granularity(true),
    )
    .unwrap();

    logger
        .log_config_params(&serde_json::json!({"opt": {"lr": 0.1, "layers": [64, 32]}}))
        .unwrap();
    logger.on_train_begin(&TrainParams::new(2)).unwrap();
    logger.on_train_batch_end(0, &logs(&[("loss", 1.2)])).unwrap();
    logger
        .on_epoch_end(0, &logs(&[("epoch", 0.0), ("loss", 0.9)]))
        .unwrap();
    logger
        .on_epoch_end(1, &logs(&[("epoch", 1.0), ("loss", 0.5)]))
        .unwrap();
    logger.log_model(&vec![0.1_f64, 0.2, 0.3]).unwrap();
    logger.on_train_end(&HashMap::new()).unwrap();

    // Everything landed under <root>/<experiment>/<run>/
    let run_dir = dir
        .path()
        .join("mlruns")
        .join(logger.experiment_id())
        .join(logger.run_id());
    assert!(run_dir.join("params.jsonl").is_file());
    assert!(run_dir.join("metrics.jsonl").is_file());
    assert!(run_dir.join("artifacts").join(MODEL_ARTIFACT_KEY).is_file());

    let run_json = std::fs::read(run_dir.join("run.json")).unwrap();
    let run: bitacora::tracking::RunRecord = serde_json::from_slice(&run_json).unwrap();
    assert_eq!(run.status(), RunStatus::Finished);

    let params = std::fs::read_to_string(run_dir.join("params.jsonl")).unwrap();
    assert_eq!(params.lines().count(), 3);
    assert!(params.contains("opt.layers.0"));
}

#[test]
fn test_same_run_test_phase_round_trip() {
    let mut logger = TrackingLogger::with_backend(
        "exp1",
        MemoryBackend::new(),
        LoggerOptions::default(),
    )
    .unwrap();

    logger.on_train_begin(&TrainParams::new(3)).unwrap();
    logger.on_epoch_end(2, &logs(&[("loss", 0.3)])).unwrap();
    logger.on_train_end(&HashMap::new()).unwrap();
    assert!(logger.active_run_id().is_none());

    logger.on_test_begin(&HashMap::new()).unwrap();
    logger.on_test_end(&logs(&[("acc", 0.91)])).unwrap();

    let store = logger.backend().store();
    assert_eq!(store.run_count(), 1);

    let run_id = logger.run_id().to_string();
    assert_eq!(store.get_metrics_for_run(&run_id, "test-acc").len(), 1);
    assert_eq!(store.get_metrics_for_run(&run_id, "last-epoch").len(), 1);
    assert_eq!(
        store.get_run(&run_id).unwrap().status(),
        RunStatus::Finished
    );
}

#[test]
fn test_isolated_test_phase_keeps_training_run_id() {
    let mut logger = TrackingLogger::with_backend(
        "exp1",
        MemoryBackend::new(),
        LoggerOptions::new().same_run_logging(false),
    )
    .unwrap();
    let training_run = logger.run_id().to_string();

    logger.on_train_begin(&TrainParams::new(1)).unwrap();
    logger.on_train_end(&HashMap::new()).unwrap();
    logger.on_test_begin(&HashMap::new()).unwrap();

    // A second run is live, but the stored training-run id is untouched.
    assert_eq!(logger.run_id(), training_run);
    let test_run = logger.active_run_id().unwrap().to_string();
    assert_ne!(test_run, training_run);

    logger.on_test_end(&logs(&[("acc", 0.7)])).unwrap();

    let store = logger.backend().store();
    assert_eq!(store.run_count(), 2);
    assert!(store.get_metrics_for_run(&training_run, "test-acc").is_empty());
    assert_eq!(store.get_metrics_for_run(&test_run, "test-acc").len(), 1);
}

#[test]
fn test_batch_granularity_disabled_emits_nothing() {
    let mut logger = TrackingLogger::with_backend(
        "exp1",
        MemoryBackend::new(),
        LoggerOptions::default(),
    )
    .unwrap();

    for batch in 0..5 {
        logger
            .on_train_batch_end(batch, &logs(&[("loss", 1.0), ("acc", 0.5)]))
            .unwrap();
    }
    assert_eq!(logger.backend().store().metric_count(), 0);
}

#[test]
fn test_epoch_key_never_becomes_a_metric() {
    let mut logger = TrackingLogger::with_backend(
        "exp1",
        MemoryBackend::new(),
        LoggerOptions::default(),
    )
    .unwrap();

    logger
        .on_epoch_end(0, &logs(&[("epoch", 0.0), ("loss", 1.0)]))
        .unwrap();
    logger.on_epoch_end(1, &logs(&[("epoch", 1.0)])).unwrap();

    let run_id = logger.run_id().to_string();
    let store = logger.backend().store();
    assert!(store.get_metrics_for_run(&run_id, "epoch").is_empty());
    assert_eq!(store.metric_count(), 1);
}
