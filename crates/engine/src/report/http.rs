use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

use crate::actor::ActorState;

use super::{DecisionReporter, ReportMetricsHandle};

const REPORTER_THREAD_NAME: &str = "decision-reporter";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to start reporter runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("decision request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("decision service answered with status {status}")]
    Status { status: StatusCode },
    #[error("decision response is malformed at '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reply from the decision service. `action` is logged, never interpreted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionResponse {
    pub action: serde_json::Value,
}

pub fn parse_decision_response(body: &[u8]) -> Result<DecisionResponse, ReportError> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| ReportError::Decode {
        path: error.path().to_string(),
        source: error.into_inner(),
    })
}

pub struct HttpDecisionReporter {
    runtime: Runtime,
    client: Client,
    endpoint_url: String,
    metrics: ReportMetricsHandle,
}

impl HttpDecisionReporter {
    pub fn new(endpoint_url: impl Into<String>, timeout: Duration) -> Result<Self, ReportError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name(REPORTER_THREAD_NAME)
            .enable_all()
            .build()
            .map_err(ReportError::Runtime)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ReportError::Client)?;
        Ok(Self {
            runtime,
            client,
            endpoint_url: endpoint_url.into(),
            metrics: ReportMetricsHandle::default(),
        })
    }

    pub fn metrics(&self) -> ReportMetricsHandle {
        self.metrics.clone()
    }
}

impl DecisionReporter for HttpDecisionReporter {
    fn report(&self, state: ActorState) {
        self.metrics.record_dispatched();
        let client = self.client.clone();
        let endpoint_url = self.endpoint_url.clone();
        let metrics = self.metrics.clone();

        // Detached: nothing joins this task and its result never flows back.
        let _ = self.runtime.spawn(async move {
            match send_report(&client, &endpoint_url, state).await {
                Ok(response) => {
                    metrics.record_succeeded();
                    info!(
                        x = state.x,
                        y = state.y,
                        facing = %state.facing,
                        action = %response.action,
                        "decision_received"
                    );
                }
                Err(error) => {
                    metrics.record_failed();
                    warn!(
                        x = state.x,
                        y = state.y,
                        facing = %state.facing,
                        error = %error,
                        "decision_report_failed"
                    );
                }
            }
        });
    }
}

async fn send_report(
    client: &Client,
    endpoint_url: &str,
    state: ActorState,
) -> Result<DecisionResponse, ReportError> {
    debug!(endpoint_url, x = state.x, y = state.y, "decision_request");
    let response = client
        .post(endpoint_url)
        .json(&state)
        .send()
        .await
        .map_err(ReportError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ReportError::Status { status });
    }

    let body = response.bytes().await.map_err(ReportError::Transport)?;
    parse_decision_response(&body)
}
