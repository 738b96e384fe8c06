//! Param Record - immutable configuration facts for runs

use serde::{Deserialize, Serialize};

/// Param Record represents one logged configuration value.
///
/// Parameters are logged once per key per run. The key is a dot-joined
/// path when the value came out of a nested configuration tree (see
/// [`crate::config::flatten_params`]); the value is always stored as its
/// string rendering, matching the tracking wire format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParamRecord {
    run_id: String,
    key: String,
    value: String,
}

impl ParamRecord {
    /// Create a new param record.
    ///
    /// # Arguments
    ///
    /// * `run_id` - ID of the parent run
    /// * `key` - Parameter name, possibly a dotted path (e.g. "opt.lr")
    /// * `value` - String rendering of the configuration value
    #[must_use]
    pub fn new(
        run_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the parameter key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the parameter value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}
