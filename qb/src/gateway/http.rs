//! HTTP gateway implementation
//!
//! Implements the Gateway trait against the board's REST backend. Reads are
//! retried on transient errors; mutations and analysis uploads are sent once.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::{Gateway, GatewayError};
use crate::config::{AnalysisConfig, GatewayConfig};
use crate::domain::{AnalysisRequest, AnalysisResponse, NewTask, Task, TaskId, TaskStatus, UserStats};

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 250;

/// REST client for the task board backend
pub struct HttpGateway {
    base_url: String,
    http: Client,
    max_retries: u32,
    request_timeout: Duration,
    analysis_timeout: Duration,
}

impl HttpGateway {
    /// Create a new client from configuration
    pub fn from_config(gateway: &GatewayConfig, analysis: &AnalysisConfig) -> Result<Self, GatewayError> {
        debug!(?gateway, "from_config: called");
        let timeout = Duration::from_millis(gateway.timeout_ms);

        // Total timeouts are set per request; analysis uploads get a much longer one.
        let http = Client::builder().connect_timeout(timeout).build()?;

        Ok(Self {
            base_url: gateway.base_url.trim_end_matches('/').to_string(),
            http,
            max_retries: gateway.max_retries,
            request_timeout: timeout,
            analysis_timeout: Duration::from_millis(analysis.timeout_ms),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET with bounded retry on transient failures
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = self.url(path);
        debug!(%url, "get_json: called");

        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, %url, "get_json: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let result = match self.http.get(&url).timeout(self.request_timeout).send().await {
                Ok(response) => match check_status(response).await {
                    Ok(response) => decode(response).await,
                    Err(e) => Err(e),
                },
                Err(e) => Err(map_send_error(e, self.request_timeout)),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    debug!(attempt, error = %e, "get_json: retryable error");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| GatewayError::InvalidResponse("Max retries exceeded".to_string())))
    }

    fn build_analysis_form(request: AnalysisRequest) -> Result<Form, GatewayError> {
        debug!(?request, "build_analysis_form: called");
        let mime = request.audio.mime_type();
        let part = Part::bytes(request.audio.bytes)
            .file_name(request.audio.file_name)
            .mime_str(&mime)?;

        Ok(Form::new()
            .part("file", part)
            .text("mode", request.mode.as_str())
            .text("summary_level", request.summary_level.as_str()))
    }
}

/// Map a non-2xx response into an API error
///
/// FastAPI-style backends put the reason into a `detail` field.
async fn check_status(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| v.get("detail").map(|d| d.as_str().map(str::to_string).unwrap_or_else(|| d.to_string())))
        .unwrap_or(text);

    debug!(status = status.as_u16(), %message, "check_status: API error");
    Err(GatewayError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}

fn map_send_error(e: reqwest::Error, timeout: Duration) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout(timeout)
    } else {
        GatewayError::Network(e)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list_tasks(&self) -> Result<Vec<Task>, GatewayError> {
        debug!("list_tasks: called");
        self.get_json("/tasks/").await
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, GatewayError> {
        debug!(?task, "create_task: called");
        let response = self
            .http
            .post(self.url("/tasks/"))
            .timeout(self.request_timeout)
            .json(&task)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.request_timeout))?;
        decode(check_status(response).await?).await
    }

    async fn update_status(&self, id: TaskId, status: TaskStatus) -> Result<Task, GatewayError> {
        debug!(%id, %status, "update_status: called");
        let response = self
            .http
            .put(self.url(&format!("/tasks/{}", id)))
            .timeout(self.request_timeout)
            .query(&[("status", status.as_str())])
            .send()
            .await
            .map_err(|e| map_send_error(e, self.request_timeout))?;
        decode(check_status(response).await?).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), GatewayError> {
        debug!(%id, "delete_task: called");
        let response = self
            .http
            .delete(self.url(&format!("/tasks/{}", id)))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.request_timeout))?;
        check_status(response).await?;
        Ok(())
    }

    async fn fetch_stats(&self) -> Result<UserStats, GatewayError> {
        debug!("fetch_stats: called");
        self.get_json("/stats/").await
    }

    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, GatewayError> {
        debug!(mode = %request.mode, level = %request.summary_level, bytes = request.audio.len(), "analyze: called");
        let form = Self::build_analysis_form(request)?;
        let response = self
            .http
            .post(self.url("/upload-audio/"))
            .timeout(self.analysis_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.analysis_timeout))?;
        decode(check_status(response).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisMode, AudioInput, SummaryLevel};

    fn gateway(base_url: &str) -> HttpGateway {
        let config = GatewayConfig {
            base_url: base_url.to_string(),
            ..GatewayConfig::default()
        };
        HttpGateway::from_config(&config, &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let gw = gateway("http://localhost:8000/");
        assert_eq!(gw.url("/tasks/"), "http://localhost:8000/tasks/");
    }

    #[test]
    fn test_timeouts_come_from_config() {
        let gw = gateway("http://localhost:8000");
        assert_eq!(gw.request_timeout, Duration::from_millis(GatewayConfig::default().timeout_ms));
        assert_eq!(gw.analysis_timeout, Duration::from_millis(AnalysisConfig::default().timeout_ms));
    }

    #[test]
    fn test_build_analysis_form() {
        let request = AnalysisRequest {
            audio: AudioInput::new("meeting.mp3", vec![1, 2, 3]),
            mode: AnalysisMode::Summary,
            summary_level: SummaryLevel::Long,
        };
        let form = HttpGateway::build_analysis_form(request).unwrap();
        assert!(!form.boundary().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let config = GatewayConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            max_retries: 0,
            timeout_ms: 2_000,
        };
        let gw = HttpGateway::from_config(&config, &AnalysisConfig::default()).unwrap();
        let err = gw.list_tasks().await.unwrap_err();
        assert!(matches!(err, GatewayError::Network(_) | GatewayError::Timeout(_)));
    }
}
