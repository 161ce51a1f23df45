//! Per-category handlers — pure transformations to outbound payloads.
//!
//! Each handler maps `(Message, ClassificationResult)` to one
//! `ActionPayload`. No handler performs I/O; actually sending mail or
//! writing logs belongs to the sink's external collaborators.

use crate::pipeline::types::{ActionPayload, ClassificationResult, HandlerKind, Message};

/// Fixed acknowledgment template for business auto-replies.
const AUTO_REPLY_TEMPLATE: &str = "Thank you for your message. We have received it \
and will respond within one business day.\n\nThis is an automated acknowledgment.";

/// Dispatch to the handler for the given branch.
pub fn handle(
    kind: HandlerKind,
    message: &Message,
    classification: &ClassificationResult,
) -> ActionPayload {
    match kind {
        HandlerKind::Urgent => urgent(message, classification),
        HandlerKind::Business => business(message),
        HandlerKind::Spam => spam(classification),
        HandlerKind::Regular => regular(message),
    }
}

/// Alert payload embedding the classification details for whoever pages on it.
fn urgent(message: &Message, classification: &ClassificationResult) -> ActionPayload {
    ActionPayload::Alert {
        sender: message.sender.clone(),
        subject: message.subject.clone(),
        confidence: classification.confidence,
        reasoning: classification.reasoning.clone(),
        suggested_action: classification.suggested_action.clone(),
    }
}

/// Auto-reply acknowledgment addressed back to the sender.
fn business(message: &Message) -> ActionPayload {
    ActionPayload::AutoReply {
        to: message.sender.clone(),
        subject: format!("Re: {}", message.subject),
        body: AUTO_REPLY_TEMPLATE.to_string(),
    }
}

/// Quarantine record carrying only reasoning and confidence.
fn spam(classification: &ClassificationResult) -> ActionPayload {
    ActionPayload::Quarantine {
        reasoning: classification.reasoning.clone(),
        confidence: classification.confidence,
    }
}

/// Minimal acknowledgment for personal mail and classification failures.
fn regular(message: &Message) -> ActionPayload {
    ActionPayload::Ack {
        sender: message.sender.clone(),
        subject: message.subject.clone(),
    }
}
