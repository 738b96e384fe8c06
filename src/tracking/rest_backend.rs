//! REST tracking backend
//!
//! Blocking HTTP client for remote tracking servers speaking the MLflow
//! wire protocol (`/api/2.0/mlflow/...`). Every logging call is one
//! synchronous request; transport and server failures propagate to the
//! caller unmodified, except the experiment name-collision error code,
//! which maps to [`Error::ExperimentExists`] so the resolve-or-create
//! path can catch it narrowly.

use chrono::Utc;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ExperimentRecord, RunRecord, TrackingBackend};
use crate::error::{Error, Result};

const ALREADY_EXISTS: &str = "RESOURCE_ALREADY_EXISTS";
const DOES_NOT_EXIST: &str = "RESOURCE_DOES_NOT_EXIST";

/// Tracking backend talking to a remote server over HTTP.
#[derive(Debug)]
pub struct RestBackend {
    base: String,
    client: Client,
    active_run: Option<String>,
}

#[derive(Serialize)]
struct CreateExperiment<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct CreateExperimentResponse {
    experiment_id: String,
}

#[derive(Deserialize)]
struct GetExperimentResponse {
    experiment: ExperimentInfo,
}

#[derive(Deserialize)]
struct ExperimentInfo {
    experiment_id: String,
    name: String,
}

#[derive(Serialize)]
struct CreateRun<'a> {
    experiment_id: &'a str,
    start_time: i64,
}

#[derive(Deserialize)]
struct CreateRunResponse {
    run: RunInfoEnvelope,
}

#[derive(Deserialize)]
struct RunInfoEnvelope {
    info: RunInfo,
}

#[derive(Deserialize)]
struct RunInfo {
    run_id: String,
    experiment_id: String,
}

#[derive(Serialize)]
struct UpdateRun<'a> {
    run_id: &'a str,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_time: Option<i64>,
}

#[derive(Serialize)]
struct LogParam<'a> {
    run_id: &'a str,
    key: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct LogMetric<'a> {
    run_id: &'a str,
    key: &'a str,
    value: f64,
    timestamp: i64,
    step: u64,
}

#[derive(Deserialize)]
struct ApiError {
    error_code: String,
    message: String,
}

impl RestBackend {
    /// Create a client for the tracking server at `base_uri`.
    ///
    /// The URI is taken as given; no normalization beyond trimming a
    /// trailing slash.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_uri: impl Into<String>) -> Result<Self> {
        let base = base_uri.into().trim_end_matches('/').to_string();
        Ok(Self {
            base,
            client: Client::builder().build()?,
            active_run: None,
        })
    }

    /// Base URI of the tracking server.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base
    }

    fn require_active(&self) -> Result<String> {
        self.active_run.clone().ok_or(Error::NoActiveRun)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/2.0/mlflow/{path}", self.base)
    }

    /// POST a JSON body, decoding either the expected response or the
    /// server's error envelope.
    fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let response = self.client.post(self.endpoint(path)).json(body).send()?;
        Self::decode(response)
    }

    fn get<R: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<R> {
        let response = self.client.get(self.endpoint(path)).query(query).send()?;
        Self::decode(response)
    }

    fn decode<R: DeserializeOwned>(response: reqwest::blocking::Response) -> Result<R> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json()?);
        }
        let body = response.text()?;
        match serde_json::from_str::<ApiError>(&body) {
            Ok(err) => Err(Error::Server {
                code: err.error_code,
                message: err.message,
            }),
            Err(_) => Err(Error::Server {
                code: status.as_str().to_string(),
                message: body,
            }),
        }
    }
}

impl TrackingBackend for RestBackend {
    fn create_experiment(&mut self, name: &str) -> Result<String> {
        let result: Result<CreateExperimentResponse> =
            self.post("experiments/create", &CreateExperiment { name });
        match result {
            Ok(response) => Ok(response.experiment_id),
            Err(Error::Server { code, .. }) if code == ALREADY_EXISTS => {
                Err(Error::ExperimentExists {
                    name: name.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }

    fn get_experiment_by_name(&self, name: &str) -> Result<Option<ExperimentRecord>> {
        let result: Result<GetExperimentResponse> =
            self.get("experiments/get-by-name", &[("experiment_name", name)]);
        match result {
            Ok(response) => Ok(Some(ExperimentRecord::new(
                response.experiment.experiment_id,
                response.experiment.name,
            ))),
            Err(Error::Server { code, .. }) if code == DOES_NOT_EXIST => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn start_run(&mut self, experiment_id: &str) -> Result<RunRecord> {
        if let Some(run_id) = &self.active_run {
            return Err(Error::RunActive {
                run_id: run_id.clone(),
            });
        }
        let response: CreateRunResponse = self.post(
            "runs/create",
            &CreateRun {
                experiment_id,
                start_time: Utc::now().timestamp_millis(),
            },
        )?;
        let run = RunRecord::new(response.run.info.run_id, response.run.info.experiment_id);
        debug!(run_id = run.run_id(), experiment_id, "started remote run");
        self.active_run = Some(run.run_id().to_string());
        Ok(run)
    }

    fn resume_run(&mut self, run_id: &str) -> Result<()> {
        if let Some(active) = &self.active_run {
            return Err(Error::RunActive {
                run_id: active.clone(),
            });
        }
        let _: serde_json::Value = self.post(
            "runs/update",
            &UpdateRun {
                run_id,
                status: "RUNNING",
                end_time: None,
            },
        )?;
        debug!(run_id, "resumed remote run");
        self.active_run = Some(run_id.to_string());
        Ok(())
    }

    fn log_param(&mut self, key: &str, value: &str) -> Result<()> {
        let run_id = self.require_active()?;
        let _: serde_json::Value = self.post(
            "runs/log-parameter",
            &LogParam {
                run_id: &run_id,
                key,
                value,
            },
        )?;
        Ok(())
    }

    fn log_metric(&mut self, key: &str, value: f64, step: Option<u64>) -> Result<()> {
        let run_id = self.require_active()?;
        let _: serde_json::Value = self.post(
            "runs/log-metric",
            &LogMetric {
                run_id: &run_id,
                key,
                value,
                timestamp: Utc::now().timestamp_millis(),
                step: step.unwrap_or(0),
            },
        )?;
        Ok(())
    }

    fn log_artifact(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        let run_id = self.require_active()?;
        let url = format!(
            "{}/api/2.0/mlflow-artifacts/artifacts/{run_id}/{key}",
            self.base
        );
        let response = self.client.put(url).body(bytes.to_vec()).send()?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::Server {
                code: response.status().as_str().to_string(),
                message: response.text()?,
            })
        }
    }

    fn end_run(&mut self) -> Result<()> {
        let run_id = self.require_active()?;
        let _: serde_json::Value = self.post(
            "runs/update",
            &UpdateRun {
                run_id: &run_id,
                status: "FINISHED",
                end_time: Some(Utc::now().timestamp_millis()),
            },
        )?;
        debug!(run_id, "ended remote run");
        self.active_run = None;
        Ok(())
    }

    fn active_run_id(&self) -> Option<&str> {
        self.active_run.as_deref()
    }
}
