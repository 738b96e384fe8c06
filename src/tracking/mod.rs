//! Experiment Tracking - schema, stores, and backends
//!
//! The tracking schema mirrors what experiment-tracking servers persist:
//!
//! ```text
//! ExperimentRecord (1) ──< RunRecord (N)
//!                              │
//!                              ├──< ParamRecord (N)    [flattened config]
//!                              ├──< MetricRecord (N)   [time-series]
//!                              └──< ArtifactRecord (N) [CAS]
//! ```
//!
//! [`TrackingBackend`] is the storage seam the logger writes through.
//! Three implementations ship: [`MemoryBackend`] (ephemeral),
//! [`FileBackend`] (JSON under a `file:` root), and [`RestBackend`]
//! (remote tracking server). [`TrackingUri`] selects between them.
//!
//! ## Usage
//!
//! ```rust
//! use bitacora::tracking::{MemoryBackend, TrackingBackend};
//!
//! let mut backend = MemoryBackend::new();
//! let experiment_id = backend.create_experiment("mnist-baseline")?;
//! let run = backend.start_run(&experiment_id)?;
//! assert_eq!(run.experiment_id(), experiment_id);
//!
//! backend.log_param("opt.lr", "0.1")?;
//! backend.log_metric("loss", 0.42, Some(0))?;
//! backend.end_run()?;
//! # Ok::<(), bitacora::Error>(())
//! ```

mod artifact_record;
mod backend;
mod experiment_record;
mod file_backend;
mod metric_record;
mod param_record;
mod rest_backend;
mod run_record;
mod store;
mod uri;

pub use artifact_record::ArtifactRecord;
pub use backend::{MemoryBackend, TrackingBackend};
pub use experiment_record::ExperimentRecord;
pub use file_backend::FileBackend;
pub use metric_record::MetricRecord;
pub use param_record::ParamRecord;
pub use rest_backend::RestBackend;
pub use run_record::{RunRecord, RunStatus};
pub use store::ExperimentStore;
pub use uri::TrackingUri;
