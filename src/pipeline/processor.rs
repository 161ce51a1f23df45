//! Pipeline orchestration — extract → classify → route → handle → sink.
//!
//! **Core invariant: every structurally valid message produces exactly one
//! routed, handled payload.** Classification failures never abort the
//! pipeline (fail-open); only invalid input is rejected, before the
//! classifier is ever called.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::classifier::ClassifierAdapter;
use crate::error::PipelineError;
use crate::pipeline::extract::extract;
use crate::pipeline::handlers::handle;
use crate::pipeline::router::route;
use crate::pipeline::types::ProcessedMessage;
use crate::sink::Sink;

/// The email processing pipeline.
///
/// One `process()` call handles one message end-to-end. Instances share no
/// mutable state, so independent messages may be processed concurrently by
/// cloning the `Arc`s and running calls in parallel.
pub struct Pipeline {
    classifier: Arc<ClassifierAdapter>,
    sink: Arc<dyn Sink>,
}

impl Pipeline {
    pub fn new(classifier: Arc<ClassifierAdapter>, sink: Arc<dyn Sink>) -> Self {
        Self { classifier, sink }
    }

    /// Process a single raw message through the full pipeline.
    ///
    /// 1. Extract — normalize untyped input (the only rejection point)
    /// 2. Classify — external call, fail-open
    /// 3. Route — total mapping to a handler branch
    /// 4. Handle — pure payload construction
    /// 5. Sink — deliver exactly one payload
    pub async fn process(&self, raw: &Value) -> Result<ProcessedMessage, PipelineError> {
        let message = extract(raw)?;

        info!(
            id = %message.id,
            sender = %message.sender,
            "Processing message"
        );

        let classification = self.classifier.classify(&message).await;
        let handler = route(classification.label);

        debug!(
            id = %message.id,
            label = classification.label.as_str(),
            handler = handler.as_str(),
            "Routed message"
        );

        let payload = handle(handler, &message, &classification);

        let processed = ProcessedMessage {
            message,
            classification,
            handler,
            payload,
            processed_at: Utc::now(),
        };

        self.sink.deliver(&processed).await?;

        Ok(processed)
    }

    /// Process a batch of raw messages.
    ///
    /// Each message is independent; per-item failures are logged and the
    /// batch continues.
    pub async fn process_batch(&self, raw_messages: &[Value]) -> Vec<ProcessedMessage> {
        let count = raw_messages.len();
        info!(count, "Processing message batch");

        let mut results = Vec::with_capacity(count);
        for raw in raw_messages {
            match self.process(raw).await {
                Ok(processed) => results.push(processed),
                Err(e) => {
                    error!(error = %e, "Failed to process message in batch");
                }
            }
        }

        info!(
            processed = results.len(),
            total = count,
            "Batch processing complete"
        );
        results
    }
}
