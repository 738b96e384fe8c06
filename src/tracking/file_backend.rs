//! File-backed tracking store
//!
//! Persists tracking records as JSON under a local root directory - the
//! `file:` flavor of tracking location. One directory per experiment, one
//! per run; append-only JSONL for params and metrics so a crash never
//! rewrites history.
//!
//! ```text
//! <root>/
//!   <experiment_id>/
//!     experiment.json
//!     <run_id>/
//!       run.json
//!       params.jsonl
//!       metrics.jsonl
//!       artifacts.jsonl
//!       artifacts/<key>
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use super::{ArtifactRecord, ExperimentRecord, MetricRecord, ParamRecord, RunRecord, RunStatus, TrackingBackend};
use crate::error::{Error, Result};

/// Tracking backend persisting to a local directory tree.
#[derive(Debug)]
pub struct FileBackend {
    root: PathBuf,
    active_run: Option<ActiveRun>,
}

#[derive(Debug)]
struct ActiveRun {
    experiment_id: String,
    run_id: String,
}

impl FileBackend {
    /// Open (creating if needed) a file-backed store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            active_run: None,
        })
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run_dir(&self, experiment_id: &str, run_id: &str) -> PathBuf {
        self.root.join(experiment_id).join(run_id)
    }

    fn active(&self) -> Result<(String, String)> {
        self.active_run
            .as_ref()
            .map(|a| (a.experiment_id.clone(), a.run_id.clone()))
            .ok_or(Error::NoActiveRun)
    }

    fn read_run(&self, experiment_id: &str, run_id: &str) -> Result<RunRecord> {
        let path = self.run_dir(experiment_id, run_id).join("run.json");
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn write_run(&self, run: &RunRecord) -> Result<()> {
        let dir = self.run_dir(run.experiment_id(), run.run_id());
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("run.json"), serde_json::to_vec_pretty(run)?)?;
        Ok(())
    }

    fn append_jsonl<T: serde::Serialize>(&self, path: &Path, record: &T) -> Result<()> {
        let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(&serde_json::to_vec(record)?)?;
        file.write_all(b"\n")?;
        Ok(())
    }

    /// Scan experiment directories, yielding each `experiment.json`.
    fn experiments(&self) -> Result<Vec<ExperimentRecord>> {
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let meta_path = entry?.path().join("experiment.json");
            if meta_path.is_file() {
                let bytes = fs::read(meta_path)?;
                found.push(serde_json::from_slice(&bytes)?);
            }
        }
        Ok(found)
    }

    /// Locate the experiment a run belongs to by scanning run directories.
    fn find_run(&self, run_id: &str) -> Result<RunRecord> {
        for experiment in self.experiments()? {
            let run_path = self
                .run_dir(experiment.experiment_id(), run_id)
                .join("run.json");
            if run_path.is_file() {
                return self.read_run(experiment.experiment_id(), run_id);
            }
        }
        Err(Error::RunNotFound {
            run_id: run_id.to_string(),
        })
    }
}

impl TrackingBackend for FileBackend {
    fn create_experiment(&mut self, name: &str) -> Result<String> {
        if self.get_experiment_by_name(name)?.is_some() {
            return Err(Error::ExperimentExists {
                name: name.to_string(),
            });
        }
        let experiment = ExperimentRecord::new(Uuid::new_v4().to_string(), name);
        let dir = self.root.join(experiment.experiment_id());
        fs::create_dir_all(&dir)?;
        fs::write(
            dir.join("experiment.json"),
            serde_json::to_vec_pretty(&experiment)?,
        )?;
        debug!(name, experiment_id = experiment.experiment_id(), "created experiment");
        Ok(experiment.experiment_id().to_string())
    }

    fn get_experiment_by_name(&self, name: &str) -> Result<Option<ExperimentRecord>> {
        Ok(self.experiments()?.into_iter().find(|e| e.name() == name))
    }

    fn start_run(&mut self, experiment_id: &str) -> Result<RunRecord> {
        if let Some(active) = &self.active_run {
            return Err(Error::RunActive {
                run_id: active.run_id.clone(),
            });
        }
        let run = RunRecord::new(Uuid::new_v4().to_string(), experiment_id);
        self.write_run(&run)?;
        debug!(run_id = run.run_id(), experiment_id, "started run");
        self.active_run = Some(ActiveRun {
            experiment_id: experiment_id.to_string(),
            run_id: run.run_id().to_string(),
        });
        Ok(run)
    }

    fn resume_run(&mut self, run_id: &str) -> Result<()> {
        if let Some(active) = &self.active_run {
            return Err(Error::RunActive {
                run_id: active.run_id.clone(),
            });
        }
        let mut run = self.find_run(run_id)?;
        run.resume();
        self.write_run(&run)?;
        debug!(run_id, "resumed run");
        self.active_run = Some(ActiveRun {
            experiment_id: run.experiment_id().to_string(),
            run_id: run_id.to_string(),
        });
        Ok(())
    }

    fn log_param(&mut self, key: &str, value: &str) -> Result<()> {
        let (experiment_id, run_id) = self.active()?;
        let path = self.run_dir(&experiment_id, &run_id).join("params.jsonl");
        self.append_jsonl(&path, &ParamRecord::new(run_id, key, value))
    }

    fn log_metric(&mut self, key: &str, value: f64, step: Option<u64>) -> Result<()> {
        let (experiment_id, run_id) = self.active()?;
        let metric = match step {
            Some(step) => MetricRecord::new(&run_id, key, step, value),
            None => MetricRecord::unstepped(&run_id, key, value),
        };
        let path = self.run_dir(&experiment_id, &run_id).join("metrics.jsonl");
        self.append_jsonl(&path, &metric)
    }

    fn log_artifact(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        let (experiment_id, run_id) = self.active()?;
        let dir = self.run_dir(&experiment_id, &run_id).join("artifacts");
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(key), bytes)?;
        let record = ArtifactRecord::from_bytes(&run_id, key, bytes);
        let path = self.run_dir(&experiment_id, &run_id).join("artifacts.jsonl");
        self.append_jsonl(&path, &record)
    }

    fn end_run(&mut self) -> Result<()> {
        let (experiment_id, run_id) = self.active()?;
        let mut run = self.read_run(&experiment_id, &run_id)?;
        run.finish(RunStatus::Finished);
        self.write_run(&run)?;
        debug!(run_id, "ended run");
        self.active_run = None;
        Ok(())
    }

    fn active_run_id(&self) -> Option<&str> {
        self.active_run.as_ref().map(|a| a.run_id.as_str())
    }
}
