//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Default request timeout for the classifier call.
///
/// Observed deployments range from none to 120s; 30s is a sane middle
/// ground and overridable via `HUBMAIL_TIMEOUT_SECS`.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default model served by the Ollama endpoint.
const DEFAULT_MODEL: &str = "llama3.2";

/// Default Ollama base URL.
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Retry policy for the classifier call.
///
/// The pipeline defaults to a single attempt (no retries) — failures
/// fall through to the `Label::Error` path rather than blocking the
/// pipeline. Callers who want retry/backoff inject it here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Minimum 1.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Attempts clamped to at least one, so a zero from config can't
    /// disable classification entirely.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Configuration for the classifier endpoint.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Base URL of the Ollama-compatible endpoint.
    pub endpoint: String,
    /// Model name passed in the generate request.
    pub model: String,
    /// Bound on the outbound call. The call is cancelled when exceeded.
    pub timeout: Duration,
    /// Retry policy for the outbound call.
    pub retry: RetryPolicy,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClassifierConfig {
    /// Build configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    ///
    /// - `HUBMAIL_OLLAMA_URL` — endpoint base URL
    /// - `HUBMAIL_MODEL` — model name
    /// - `HUBMAIL_TIMEOUT_SECS` — request timeout in seconds
    /// - `HUBMAIL_RETRY_ATTEMPTS` — total attempts (default 1 = no retry)
    /// - `HUBMAIL_RETRY_BACKOFF_MS` — pause between attempts
    pub fn from_env() -> Self {
        let endpoint = std::env::var("HUBMAIL_OLLAMA_URL")
            .unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());

        let model =
            std::env::var("HUBMAIL_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_secs: u64 = std::env::var("HUBMAIL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let max_attempts: u32 = std::env::var("HUBMAIL_RETRY_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);

        let backoff_ms: u64 = std::env::var("HUBMAIL_RETRY_BACKOFF_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(500);

        Self {
            endpoint,
            model,
            timeout: Duration::from_secs(timeout_secs),
            retry: RetryPolicy {
                max_attempts,
                backoff: Duration::from_millis(backoff_ms),
            },
        }
    }

    /// Sanity-check the configuration before building clients from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "HUBMAIL_OLLAMA_URL".into(),
                message: "endpoint must not be empty".into(),
            });
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "HUBMAIL_OLLAMA_URL".into(),
                message: format!("'{}' is not an http(s) URL", self.endpoint),
            });
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "HUBMAIL_MODEL".into(),
                message: "model must not be empty".into(),
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "HUBMAIL_TIMEOUT_SECS".into(),
                message: "timeout must be positive".into(),
            });
        }
        Ok(())
    }
}
