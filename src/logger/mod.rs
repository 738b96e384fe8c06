//! Experiment Logging - the training-loop to tracking-backend adapter
//!
//! [`TrackingLogger`] implements [`TrainingCallback`] and mirrors every
//! lifecycle event into durable tracking records. Location variants:
//!
//! - [`TrackingLogger::local`] - local filesystem store (`file:` location)
//! - [`TrackingLogger::server`] - remote tracking server (`http(s)://`)
//! - [`TrackingLogger::with_backend`] - any [`crate::tracking::TrackingBackend`]

mod callback;
mod writer;

pub use callback::{TrainParams, TrainingCallback};
pub use writer::{LoggerOptions, TrackingLogger, MODEL_ARTIFACT_KEY};
