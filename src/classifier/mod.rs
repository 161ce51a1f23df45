//! Classifier integration — wraps an external text-generation service.
//!
//! The `GenerateClient` trait is the I/O seam: `OllamaClient` implements it
//! over HTTP, tests implement it with canned responses. `ClassifierAdapter`
//! owns everything above the wire: prompt construction, JSON extraction,
//! parsing, and the deterministic fallback.

pub mod adapter;
pub mod ollama;

pub use adapter::ClassifierAdapter;
pub use ollama::OllamaClient;

use async_trait::async_trait;

use crate::error::ClassifierError;

/// Trait for raw text-generation backends — pure I/O, no parsing.
#[async_trait]
pub trait GenerateClient: Send + Sync {
    /// Model name for logging.
    fn model_name(&self) -> &str;

    /// Send a prompt and return the raw response text.
    async fn generate(&self, prompt: &str) -> Result<String, ClassifierError>;
}
