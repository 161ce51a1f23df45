//! Error types for HubMail.

use std::time::Duration;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from the outbound text-generation call.
///
/// These never abort the pipeline — the classifier adapter maps them to
/// `Label::Error` and routing continues (fail-open).
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("HTTP status {status} from classifier endpoint")]
    HttpStatus { status: u16 },

    #[error("Invalid response from classifier: {0}")]
    InvalidResponse(String),
}

/// Pipeline-related errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Raw input missing mandatory fields. Rejected before classification,
    /// never retried.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Sink delivery failed: {0}")]
    Sink(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
