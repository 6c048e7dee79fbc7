// src/session/client.rs

//! HTTP implementation of [`TestBackend`] against a running server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use url::Url;

use super::backend::{BackendError, TestBackend};
use crate::models::{
    question::Question,
    result::{SubmitTestRequest, TestResult},
    user::{CreateUserRequest, User},
};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Calls the test API over HTTP. Every request is bounded by a timeout, so a
/// hung server surfaces as [`BackendError::Timeout`] instead of an endless
/// loading state.
pub struct HttpBackend {
    base_url: Url,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| BackendError::Network(format!("invalid base URL '{base_url}': {e}")))?;

        // `Url::join` drops the last segment unless the base ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self {
            base_url,
            client,
            timeout,
        })
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, BackendError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| BackendError::Network(e.to_string()))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    fn transport_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout_ms())
        } else {
            BackendError::Network(err.to_string())
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| status.to_string());

        Err(if status == StatusCode::NOT_FOUND {
            BackendError::NotFound(message)
        } else if status.is_client_error() {
            BackendError::Rejected(message)
        } else {
            BackendError::Server {
                status: status.as_u16(),
                message,
            }
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, BackendError> {
        response.json().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(self.timeout_ms())
            } else {
                BackendError::Server {
                    status: 0,
                    message: format!("failed to parse response: {e}"),
                }
            }
        })
    }
}

#[async_trait]
impl TestBackend for HttpBackend {
    async fn validate_test_code(&self, test_code: &str) -> Result<bool, BackendError> {
        let url = self.endpoint("validate-test-code", &[("testCode", test_code)])?;
        match self.send(self.client.get(url)).await {
            Ok(_) => Ok(true),
            Err(BackendError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn fetch_questions(&self, test_code: &str) -> Result<Vec<Question>, BackendError> {
        let url = self.endpoint("questions", &[("testCode", test_code)])?;
        let response = self.send(self.client.get(url)).await?;
        self.decode(response).await
    }

    async fn register(&self, request: CreateUserRequest) -> Result<User, BackendError> {
        let url = self.endpoint("users", &[])?;
        let response = self.send(self.client.post(url).json(&request)).await?;
        self.decode(response).await
    }

    async fn submit(&self, request: SubmitTestRequest) -> Result<(), BackendError> {
        let url = self.endpoint("submit-test", &[])?;
        self.send(self.client.post(url).json(&request)).await?;
        Ok(())
    }

    async fn fetch_result(
        &self,
        user_id: &str,
        test_code: &str,
    ) -> Result<TestResult, BackendError> {
        let url = self.endpoint("results", &[("testCode", test_code), ("userId", user_id)])?;
        let response = self.send(self.client.get(url)).await?;
        self.decode(response).await
    }
}
