//! Classifier adapter — prompt construction, parsing, and fallback.
//!
//! Turns a `Message` into a `ClassificationResult` via one call to the
//! generate backend. The adapter is infallible by design (fail-open):
//! - unparseable output → deterministic text-scan fallback
//! - transport failure/timeout → `Label::Error`, confidence 0.0
//!
//! Either way the pipeline always gets a routable result.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::classifier::GenerateClient;
use crate::config::RetryPolicy;
use crate::error::ClassifierError;
use crate::pipeline::types::{ClassificationResult, Label, Message};

/// Confidence assigned by the text-scan fallback.
const FALLBACK_CONFIDENCE: f32 = 0.8;

/// Reasoning marker for the fallback path.
const FALLBACK_REASONING: &str = "fallback: unparsed response";

/// Body characters included in the prompt (token economy).
const PROMPT_BODY_CHARS: usize = 1000;

/// Classifier adapter over a `GenerateClient`.
pub struct ClassifierAdapter {
    client: Arc<dyn GenerateClient>,
    retry: RetryPolicy,
}

impl ClassifierAdapter {
    pub fn new(client: Arc<dyn GenerateClient>, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Classify a message.
    ///
    /// Never returns an error: classification failures degrade to the
    /// fallback label or `Label::Error` rather than aborting the pipeline.
    pub async fn classify(&self, message: &Message) -> ClassificationResult {
        let prompt = build_prompt(message);

        let raw = match self.generate_with_retry(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    id = %message.id,
                    model = self.client.model_name(),
                    error = %e,
                    "Classifier call failed — routing as ERROR"
                );
                return ClassificationResult::unreachable(&e.to_string());
            }
        };

        match parse_classification(&raw) {
            Ok(result) => {
                debug!(
                    id = %message.id,
                    label = result.label.as_str(),
                    confidence = result.confidence,
                    "Classification parsed"
                );
                result
            }
            Err(reason) => {
                warn!(
                    id = %message.id,
                    reason = %reason,
                    "Unparseable classifier response — applying text-scan fallback"
                );
                fallback_classification(&raw)
            }
        }
    }

    /// Run the generate call under the retry policy.
    ///
    /// Default policy is a single attempt; the loop only exists for callers
    /// who opt into retries.
    async fn generate_with_retry(&self, prompt: &str) -> Result<String, ClassifierError> {
        let attempts = self.retry.attempts();
        let mut last_err = None;

        for attempt in 1..=attempts {
            match self.client.generate(prompt).await {
                Ok(raw) => return Ok(raw),
                Err(e) => {
                    if attempt < attempts {
                        warn!(
                            attempt,
                            attempts,
                            error = %e,
                            "Classifier attempt failed, retrying after backoff"
                        );
                        tokio::time::sleep(self.retry.backoff).await;
                    }
                    last_err = Some(e);
                }
            }
        }

        // attempts >= 1, so last_err is always set here
        Err(last_err.unwrap_or(ClassifierError::InvalidResponse(
            "no attempts executed".into(),
        )))
    }
}

// ── Prompt construction ─────────────────────────────────────────────

/// Build the classification prompt for a message.
fn build_prompt(message: &Message) -> String {
    let body_preview: String = message.body.chars().take(PROMPT_BODY_CHARS).collect();

    format!(
        "Classify the following email into exactly one category: \
         URGENT, BUSINESS, SPAM, or PERSONAL.\n\n\
         From: {}\n\
         Subject: {}\n\
         Attachments: {}\n\n\
         Body:\n{}\n\n\
         Respond with ONLY a JSON object:\n\
         {{\"classification\": \"...\", \"confidence\": 0.0, \
         \"reasoning\": \"...\", \"suggested_action\": \"...\"}}\n\n\
         Rules:\n\
         - classification must be one of URGENT, BUSINESS, SPAM, PERSONAL\n\
         - confidence is a number between 0.0 and 1.0\n\
         - reasoning is one short sentence",
        message.sender,
        message.subject,
        if message.has_attachments { "yes" } else { "no" },
        body_preview,
    )
}

// ── Response parsing ────────────────────────────────────────────────

/// Classifier response structure inside the generated text.
#[derive(Debug, serde::Deserialize)]
struct RawClassification {
    classification: String,
    #[serde(default)]
    confidence: f32,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    suggested_action: String,
}

/// Parse a classification out of raw model output.
///
/// The model may wrap the JSON object in prose or markdown fences, so we
/// locate the object first. Unknown labels are an error here — the caller
/// applies the fallback.
fn parse_classification(raw: &str) -> Result<ClassificationResult, String> {
    let json_str = extract_json_object(raw);
    let parsed: RawClassification =
        serde_json::from_str(&json_str).map_err(|e| format!("JSON parse error: {e}"))?;

    let label = Label::parse(&parsed.classification)
        .ok_or_else(|| format!("unknown classification: '{}'", parsed.classification))?;

    Ok(ClassificationResult {
        label,
        confidence: parsed.confidence.clamp(0.0, 1.0),
        reasoning: parsed.reasoning,
        suggested_action: parsed.suggested_action,
    })
}

/// Deterministic fallback when the response can't be parsed.
///
/// Scans the raw text for the literal substring "URGENT"; present → Urgent,
/// absent → Business. Confidence is fixed so downstream consumers can
/// recognize fallback results.
fn fallback_classification(raw: &str) -> ClassificationResult {
    let label = if raw.contains("URGENT") {
        Label::Urgent
    } else {
        Label::Business
    };

    ClassificationResult {
        label,
        confidence: FALLBACK_CONFIDENCE,
        reasoning: FALLBACK_REASONING.to_string(),
        suggested_action: String::new(),
    }
}

/// Extract a JSON object from model output (handles markdown wrapping).
fn extract_json_object(text: &str) -> String {
    let trimmed = text.trim();

    // Already a JSON object
    if trimmed.starts_with('{') {
        return trimmed.to_string();
    }

    // Wrapped in markdown code block
    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim().to_string();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('{') {
                return inner.to_string();
            }
        }
    }

    // Try to find object bounds in surrounding prose
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && end > start
    {
        return trimmed[start..=end].to_string();
    }

    trimmed.to_string()
}
