//! # Bitacora: Experiment Tracking for ML Training Projects
//!
//! Bitacora ships the two pieces a generated ML project needs around its
//! training loop:
//!
//! - **Experiment logging adapter**: [`logger::TrackingLogger`] mirrors
//!   training-loop lifecycle callbacks into durable experiment records
//!   (params, metrics, run identity, model artifact) through a pluggable
//!   [`tracking::TrackingBackend`].
//! - **Post-generation hook**: [`scaffold`] reads the rendered template
//!   flags and conditionally initializes the environment, git, and data
//!   version control - fail-fast, in fixed order.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Jidoka**: run lifecycle is an explicit guarded state machine, so
//!   out-of-order callbacks fail at the adapter, not in the backend
//! - **Genchi Genbutsu**: records carry timestamps and content hashes -
//!   what is stored is what can be verified
//! - **Muda elimination**: no buffering or batching layers; every call is
//!   one synchronous backend operation
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::path::Path;
//! use bitacora::logger::{LoggerOptions, TrackingLogger, TrainingCallback, TrainParams};
//!
//! let mut logger = TrackingLogger::local(
//!     Some(Path::new("/tmp/proj")),
//!     Path::new("mlruns"),
//!     "exp1",
//!     LoggerOptions::default(),
//! )?;
//!
//! logger.log_config_params(&serde_json::json!({"opt": {"lr": 0.1}}))?;
//! logger.on_train_begin(&TrainParams::new(10))?;
//! logger.on_epoch_end(0, &HashMap::from([("loss".to_string(), 0.9)]))?;
//! logger.on_train_end(&HashMap::new())?;
//! # Ok::<(), bitacora::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod error;
pub mod logger;
pub mod scaffold;
pub mod tracking;

pub use error::{Error, Result};
