//! Content extractor — normalizes untyped raw input into a `Message`.
//!
//! Accepts a JSON object with loosely-typed fields and produces the
//! immutable `Message` record the rest of the pipeline consumes. The only
//! failure mode is missing mandatory fields (`PipelineError::InvalidInput`);
//! optional fields default to empty/false.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::error::PipelineError;
use crate::pipeline::types::Message;

/// Normalize a raw message into a `Message`.
///
/// Mandatory: a non-empty sender (`sender` or `from`) and at least one of
/// subject/body non-empty — there is nothing to classify otherwise.
/// Optional: `has_attachments` (bool, positive number, or non-empty array
/// all count as true), `received_at` (RFC 3339 string), `id` (generated
/// when absent).
pub fn extract(raw: &Value) -> Result<Message, PipelineError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| PipelineError::InvalidInput("raw message is not a JSON object".into()))?;

    let sender = string_field(obj, &["sender", "from"]);
    if sender.is_empty() {
        return Err(PipelineError::InvalidInput(
            "missing mandatory field: sender".into(),
        ));
    }

    let subject = string_field(obj, &["subject"]);
    let body = string_field(obj, &["body", "content"]);
    if subject.is_empty() && body.is_empty() {
        return Err(PipelineError::InvalidInput(
            "message has neither subject nor body".into(),
        ));
    }

    let id = {
        let raw_id = string_field(obj, &["id", "message_id"]);
        if raw_id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            raw_id
        }
    };

    let has_attachments = obj
        .get("has_attachments")
        .or_else(|| obj.get("attachments"))
        .map(attachment_indicator)
        .unwrap_or(false);

    let received_at = obj
        .get("received_at")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    debug!(id = %id, sender = %sender, "Extracted message");

    Ok(Message {
        id,
        sender,
        subject,
        body,
        has_attachments,
        received_at,
    })
}

/// First non-empty string value among the given keys.
fn string_field(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> String {
    for key in keys {
        if let Some(s) = obj.get(*key).and_then(Value::as_str) {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }
    String::new()
}

/// Interpret the various shapes an attachment indicator arrives in.
fn attachment_indicator(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f > 0.0),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}
