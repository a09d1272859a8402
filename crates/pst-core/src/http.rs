//! HTTP collaborator adapter
//!
//! One client implements all three collaborator traits against the trainer
//! service:
//!
//! | Trait            | Request                      |
//! |------------------|------------------------------|
//! | `ScenarioSource` | `GET  /api/scenarios`        |
//! | `Grader`         | `POST /api/grade`            |
//! | `SessionSink`    | `POST /api/submit-session`   |

use crate::collaborator::{Grader, ScenarioSource, SessionSink};
use crate::config::TrainerConfig;
use crate::error::CollaboratorError;
use pst_model::{GradeRequest, GradingResult, Scenario, SessionReceipt, SessionSubmission};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Longest response body kept in a status error
const MAX_ERROR_BODY: usize = 512;

/// reqwest-backed trainer service client
#[derive(Debug, Clone)]
pub struct HttpTrainerApi {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpTrainerApi {
    /// Client for `config.api_url` with the configured timeout
    #[must_use]
    pub fn new(config: &TrainerConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("pst/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    /// Base URL requests are sent to
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn decode<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, CollaboratorError> {
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if let Some((cut, _)) = body.char_indices().nth(MAX_ERROR_BODY) {
                body.truncate(cut);
            }
            warn!(url = %url, status = status.as_u16(), "collaborator returned an error status");
            return Err(CollaboratorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| CollaboratorError::Decode(e.to_string()))
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, CollaboratorError>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(url = %url, "POST");
        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| CollaboratorError::Transport(e.to_string()))?;
        Self::decode(&url, response).await
    }
}

#[async_trait::async_trait]
impl ScenarioSource for HttpTrainerApi {
    async fn fetch_scenarios(&self) -> Result<Vec<Scenario>, CollaboratorError> {
        let url = self.endpoint("/api/scenarios");
        debug!(url = %url, "GET");
        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| CollaboratorError::Transport(e.to_string()))?;
        Self::decode(&url, response).await
    }
}

#[async_trait::async_trait]
impl Grader for HttpTrainerApi {
    async fn grade(&self, request: GradeRequest) -> Result<GradingResult, CollaboratorError> {
        self.post("/api/grade", &request).await
    }
}

#[async_trait::async_trait]
impl SessionSink for HttpTrainerApi {
    async fn submit_session(
        &self,
        submission: SessionSubmission,
    ) -> Result<SessionReceipt, CollaboratorError> {
        self.post("/api/submit-session", &submission).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_cleanly() {
        let api = HttpTrainerApi::new(&TrainerConfig::new().with_api_url("http://trainer:8000/"));
        assert_eq!(api.base_url(), "http://trainer:8000");
        assert_eq!(api.endpoint("/api/grade"), "http://trainer:8000/api/grade");
        assert_eq!(api.endpoint("api/scenarios"), "http://trainer:8000/api/scenarios");
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let config = TrainerConfig::new()
            .with_api_url("http://127.0.0.1:9")
            .with_request_timeout(std::time::Duration::from_secs(2));
        let api = HttpTrainerApi::new(&config);

        let err = api.fetch_scenarios().await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Transport(_)), "{err:?}");
        assert!(err.is_retryable());
    }
}
