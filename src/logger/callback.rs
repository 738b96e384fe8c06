//! Training-loop callback interface
//!
//! The crate-side mirror of the hook surface a training loop drives:
//! batch end, epoch end, train begin/end, test begin/end. Each hook
//! receives the step index where one applies plus the loop's key-value
//! log dictionary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Parameters the training loop hands over before the first batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainParams {
    /// Planned number of epochs for the run.
    pub epochs: u64,
    /// Batches per epoch, when the loop knows it up front.
    pub steps: Option<u64>,
}

impl TrainParams {
    /// Create train params with a planned epoch count.
    #[must_use]
    pub const fn new(epochs: u64) -> Self {
        Self {
            epochs,
            steps: None,
        }
    }
}

/// Lifecycle hooks a training loop invokes on its observers.
///
/// Implementations are driven from exactly one training-loop context at a
/// time; calls are synchronous and a returned error propagates straight
/// back into the loop.
pub trait TrainingCallback {
    /// Training is about to start; `params` carries the planned epoch count.
    fn on_train_begin(&mut self, params: &TrainParams) -> Result<()>;

    /// A training batch finished with the given metrics.
    fn on_train_batch_end(&mut self, batch_number: u64, logs: &HashMap<String, f64>) -> Result<()>;

    /// An epoch finished with the given metrics.
    fn on_epoch_end(&mut self, epoch_number: u64, logs: &HashMap<String, f64>) -> Result<()>;

    /// Training is over.
    fn on_train_end(&mut self, logs: &HashMap<String, f64>) -> Result<()>;

    /// Test phase is about to start.
    fn on_test_begin(&mut self, logs: &HashMap<String, f64>) -> Result<()>;

    /// Test phase finished with the given metrics.
    fn on_test_end(&mut self, logs: &HashMap<String, f64>) -> Result<()>;
}
