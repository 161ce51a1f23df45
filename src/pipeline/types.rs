//! Shared types for the email processing pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Inbound message ─────────────────────────────────────────────────

/// Normalized inbound email.
///
/// Built by the content extractor from untyped input and never mutated
/// afterward. One `Message` flows through the pipeline end-to-end:
/// extract → classify → route → handle → sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique ID (taken from the raw input or generated UUID).
    pub id: String,
    /// Sender address.
    pub sender: String,
    /// Subject line (empty if the raw input had none).
    pub subject: String,
    /// Body text (empty if the raw input had none).
    pub body: String,
    /// Whether the message carries attachments.
    pub has_attachments: bool,
    /// When the message was received.
    pub received_at: DateTime<Utc>,
}

// ── Classification ──────────────────────────────────────────────────

/// Closed set of classification labels.
///
/// `Error` marks a failed classifier call (network/timeout); it is routed
/// like any other label rather than aborting the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Urgent,
    Business,
    Spam,
    Personal,
    Error,
}

impl Label {
    /// Parse a label from classifier output. Case-insensitive.
    ///
    /// Returns `None` for anything outside the closed set — the adapter
    /// then applies the deterministic fallback instead of inventing a label.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "URGENT" => Some(Self::Urgent),
            "BUSINESS" => Some(Self::Business),
            "SPAM" => Some(Self::Spam),
            "PERSONAL" => Some(Self::Personal),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    /// Short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "URGENT",
            Self::Business => "BUSINESS",
            Self::Spam => "SPAM",
            Self::Personal => "PERSONAL",
            Self::Error => "ERROR",
        }
    }
}

/// Output of the classifier adapter.
///
/// `label` is always a member of the closed set: unparseable upstream
/// content is forced through the fallback path, never left undefined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: Label,
    /// Confidence in `label`, clamped to 0.0–1.0.
    pub confidence: f32,
    /// Free-text reasoning from the model (or the fallback marker).
    pub reasoning: String,
    /// Suggested action from the model, if any.
    pub suggested_action: String,
}

impl ClassificationResult {
    /// Result for a failed classifier call (network error or timeout).
    pub fn unreachable(reason: &str) -> Self {
        Self {
            label: Label::Error,
            confidence: 0.0,
            reasoning: format!("classifier unreachable: {reason}"),
            suggested_action: String::new(),
        }
    }
}

// ── Routing ─────────────────────────────────────────────────────────

/// Closed set of handler branches.
///
/// Derived from `Label` by a total pure function — never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    Urgent,
    Business,
    Spam,
    Regular,
}

impl HandlerKind {
    /// Short name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "urgent_handler",
            Self::Business => "business_handler",
            Self::Spam => "spam_handler",
            Self::Regular => "regular_handler",
        }
    }
}

// ── Action payloads ─────────────────────────────────────────────────

/// Outbound action produced by a handler.
///
/// Created by exactly one handler, consumed once by the sink, then
/// discarded — no persistence layer in scope. Each variant carries only
/// the fields its downstream consumer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionPayload {
    /// Urgent alert for immediate attention.
    Alert {
        sender: String,
        subject: String,
        confidence: f32,
        reasoning: String,
        suggested_action: String,
    },
    /// Acknowledgment auto-reply addressed back to the sender.
    AutoReply {
        to: String,
        subject: String,
        body: String,
    },
    /// Quarantine record for suspected spam.
    Quarantine { reasoning: String, confidence: f32 },
    /// Minimal acknowledgment for everything else.
    Ack { sender: String, subject: String },
}

impl ActionPayload {
    /// Variant name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Alert { .. } => "alert",
            Self::AutoReply { .. } => "auto_reply",
            Self::Quarantine { .. } => "quarantine",
            Self::Ack { .. } => "ack",
        }
    }
}

// ── Processed message ───────────────────────────────────────────────

/// Result of running one message through the full pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedMessage {
    /// The original normalized message.
    pub message: Message,
    /// The classification that drove routing.
    pub classification: ClassificationResult,
    /// The handler branch that produced the payload.
    pub handler: HandlerKind,
    /// The outbound payload delivered to the sink.
    pub payload: ActionPayload,
    /// When processing completed.
    pub processed_at: DateTime<Utc>,
}
