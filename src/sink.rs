//! Sinks — receive the final payload of each processed message.
//!
//! The pipeline's contract with a sink is exactly one `ActionPayload` per
//! processed message. Real transports (SMTP relay, message queue) live
//! outside this crate; the built-in sinks log or collect.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::PipelineError;
use crate::pipeline::types::ProcessedMessage;

/// Trait for payload sinks — pure delivery, no routing logic.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Deliver one processed message. Called exactly once per message.
    async fn deliver(&self, processed: &ProcessedMessage) -> Result<(), PipelineError>;
}

/// Sink that records payloads to the tracing log stream.
#[derive(Debug, Default)]
pub struct TracingSink;

#[async_trait]
impl Sink for TracingSink {
    async fn deliver(&self, processed: &ProcessedMessage) -> Result<(), PipelineError> {
        let payload_json = serde_json::to_string(&processed.payload)
            .map_err(|e| PipelineError::Sink(e.to_string()))?;

        info!(
            id = %processed.message.id,
            label = processed.classification.label.as_str(),
            handler = processed.handler.as_str(),
            payload = %payload_json,
            "Delivered action payload"
        );
        Ok(())
    }
}

/// In-memory sink collecting payloads for inspection in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<ProcessedMessage>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything delivered so far.
    pub async fn delivered(&self) -> Vec<ProcessedMessage> {
        self.delivered.lock().await.clone()
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn deliver(&self, processed: &ProcessedMessage) -> Result<(), PipelineError> {
        self.delivered.lock().await.push(processed.clone());
        Ok(())
    }
}
