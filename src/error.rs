//! Error types for bitacora
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Bitacora error types
#[derive(Error, Debug)]
pub enum Error {
    /// Experiment name is already taken.
    ///
    /// This is the one failure kind the resolve-or-create path catches to
    /// fall back to lookup-by-name; every other creation failure propagates.
    #[error("experiment '{name}' already exists")]
    ExperimentExists {
        /// Name that collided
        name: String,
    },

    /// Experiment lookup by name found nothing
    #[error("experiment '{name}' not found")]
    ExperimentNotFound {
        /// Name that was looked up
        name: String,
    },

    /// Run id does not exist in the backend
    #[error("run '{run_id}' not found")]
    RunNotFound {
        /// Id that was looked up
        run_id: String,
    },

    /// Operation requires an active run and none is active
    #[error("no active run: start or resume a run before logging")]
    NoActiveRun,

    /// Operation requires the previous run to be over and one is still active
    #[error("run '{run_id}' is still active: end it before starting another")]
    RunActive {
        /// Id of the run that is still active
        run_id: String,
    },

    /// Training parameters were never handed to the logger
    #[error("training parameters not set: on_train_begin must run before on_train_end")]
    TrainParamsNotSet,

    /// Tracking location string could not be understood
    #[error("unsupported tracking location '{0}': expected file:<path> or http(s)://<host>")]
    UnsupportedUri(String),

    /// Tracking server rejected a request
    #[error("tracking server error ({code}): {message}")]
    Server {
        /// Server-side error code
        code: String,
        /// Server-side message
        message: String,
    },

    /// Build target exited with a non-zero status
    #[error("build target '{target}' failed with exit code {code:?}")]
    TargetFailed {
        /// Name of the failing target
        target: &'static str,
        /// Exit code, absent if the child was killed by a signal
        code: Option<i32>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
