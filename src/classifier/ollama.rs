//! HTTP client for an Ollama-compatible generate endpoint.
//!
//! Wire format: POST `{endpoint}/api/generate` with
//! `{"model": ..., "prompt": ..., "stream": false}`; the response JSON
//! carries the generated text in a `response` string field.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::GenerateClient;
use crate::config::ClassifierConfig;
use crate::error::ClassifierError;

/// Request body for `/api/generate`.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response body from `/api/generate` (non-streaming).
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Ollama-backed `GenerateClient`.
pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl GenerateClient for OllamaClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    /// One POST to the generate endpoint, bounded by the configured timeout.
    ///
    /// The `tokio::time::timeout` wrapper also makes the call cancellable:
    /// when it fires, the in-flight request future is dropped.
    async fn generate(&self, prompt: &str) -> Result<String, ClassifierError> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!(url = %url, model = %self.model, "Sending generate request");

        let send = async {
            let response = self
                .http
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| ClassifierError::RequestFailed {
                    endpoint: url.clone(),
                    reason: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(ClassifierError::HttpStatus {
                    status: status.as_u16(),
                });
            }

            let parsed: GenerateResponse = response
                .json()
                .await
                .map_err(|e| ClassifierError::InvalidResponse(e.to_string()))?;

            Ok(parsed.response)
        };

        tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| ClassifierError::Timeout {
                timeout: self.timeout,
            })?
    }
}
