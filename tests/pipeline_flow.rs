//! End-to-end pipeline scenarios with a mocked classifier backend.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use hubmail::classifier::{ClassifierAdapter, GenerateClient};
use hubmail::config::RetryPolicy;
use hubmail::error::ClassifierError;
use hubmail::pipeline::processor::Pipeline;
use hubmail::pipeline::types::{ActionPayload, HandlerKind, Label};
use hubmail::sink::MemorySink;

/// Mock backend with a canned outcome.
struct MockClient {
    outcome: Outcome,
}

#[derive(Clone)]
enum Outcome {
    Respond(String),
    Timeout,
}

#[async_trait::async_trait]
impl GenerateClient for MockClient {
    fn model_name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ClassifierError> {
        match &self.outcome {
            Outcome::Respond(text) => Ok(text.clone()),
            Outcome::Timeout => Err(ClassifierError::Timeout {
                timeout: Duration::from_secs(30),
            }),
        }
    }
}

fn make_pipeline(outcome: Outcome) -> (Pipeline, Arc<MemorySink>) {
    let adapter = Arc::new(ClassifierAdapter::new(
        Arc::new(MockClient { outcome }),
        RetryPolicy::default(),
    ));
    let sink = Arc::new(MemorySink::new());
    (Pipeline::new(adapter, sink.clone()), sink)
}

// ── Concrete scenarios ──────────────────────────────────────────────

#[tokio::test]
async fn critical_server_email_produces_alert() {
    let (pipeline, sink) = make_pipeline(Outcome::Respond(
        r#"{"classification": "URGENT", "confidence": 0.95, "reasoning": "production outage reported", "suggested_action": "notify on-call engineer"}"#.into(),
    ));

    let raw = json!({
        "from": "server-alerts@company.com",
        "subject": "CRITICAL: Production Server Down",
        "body": "The main production server has crashed and is unresponsive. All services affected.",
    });

    let processed = pipeline.process(&raw).await.unwrap();
    assert_eq!(processed.classification.label, Label::Urgent);
    assert_eq!(processed.handler, HandlerKind::Urgent);

    match &processed.payload {
        ActionPayload::Alert {
            sender,
            subject,
            confidence,
            reasoning,
            suggested_action,
        } => {
            assert_eq!(sender, "server-alerts@company.com");
            assert_eq!(subject, "CRITICAL: Production Server Down");
            assert!((confidence - 0.95).abs() < 0.01);
            assert!(reasoning.contains("outage"));
            assert!(suggested_action.contains("on-call"));
        }
        other => panic!("Expected Alert, got {other:?}"),
    }

    assert_eq!(sink.delivered().await.len(), 1);
}

#[tokio::test]
async fn lottery_spam_produces_quarantine() {
    let (pipeline, _sink) = make_pipeline(Outcome::Respond(
        r#"{"classification": "SPAM", "confidence": 0.99, "reasoning": "classic lottery scam"}"#
            .into(),
    ));

    let raw = json!({
        "from": "winner@totally-legit.biz",
        "subject": "You have won $1,000,000!!!",
        "body": "Claim your prize now by sending your bank details.",
    });

    let processed = pipeline.process(&raw).await.unwrap();
    assert_eq!(processed.handler, HandlerKind::Spam);
    assert!(matches!(
        processed.payload,
        ActionPayload::Quarantine { .. }
    ));
}

// ── Variant mapping ─────────────────────────────────────────────────

#[tokio::test]
async fn business_label_produces_auto_reply() {
    let (pipeline, _sink) = make_pipeline(Outcome::Respond(
        r#"{"classification": "BUSINESS", "confidence": 0.85, "reasoning": "invoice inquiry"}"#
            .into(),
    ));

    let raw = json!({
        "from": "billing@vendor.com",
        "subject": "Invoice 2026-041",
        "body": "Please confirm receipt of the attached invoice.",
    });

    let processed = pipeline.process(&raw).await.unwrap();
    match &processed.payload {
        ActionPayload::AutoReply { to, subject, body } => {
            assert_eq!(to, "billing@vendor.com");
            assert_eq!(subject, "Re: Invoice 2026-041");
            assert!(!body.is_empty());
        }
        other => panic!("Expected AutoReply, got {other:?}"),
    }
}

#[tokio::test]
async fn personal_label_produces_ack() {
    let (pipeline, _sink) = make_pipeline(Outcome::Respond(
        r#"{"classification": "PERSONAL", "confidence": 0.7, "reasoning": "friendly note"}"#.into(),
    ));

    let raw = json!({
        "from": "mom@family.net",
        "subject": "Sunday dinner?",
        "body": "Are you coming over this weekend?",
    });

    let processed = pipeline.process(&raw).await.unwrap();
    assert_eq!(processed.handler, HandlerKind::Regular);
    assert!(matches!(processed.payload, ActionPayload::Ack { .. }));
}

// ── Fallback behavior ───────────────────────────────────────────────

#[tokio::test]
async fn invalid_json_with_urgent_substring_falls_back_to_urgent() {
    let (pipeline, _sink) = make_pipeline(Outcome::Respond(
        "I believe this email is URGENT because the server is on fire".into(),
    ));

    let raw = json!({
        "from": "ops@company.com",
        "subject": "Fire",
        "body": "Help",
    });

    let processed = pipeline.process(&raw).await.unwrap();
    assert_eq!(processed.classification.label, Label::Urgent);
    assert!((processed.classification.confidence - 0.8).abs() < f32::EPSILON);
    assert_eq!(processed.classification.reasoning, "fallback: unparsed response");
    assert!(matches!(processed.payload, ActionPayload::Alert { .. }));
}

#[tokio::test]
async fn invalid_json_without_urgent_falls_back_to_business() {
    let (pipeline, _sink) = make_pipeline(Outcome::Respond(
        "hmm, hard to say what this is".into(),
    ));

    let raw = json!({
        "from": "someone@somewhere.org",
        "subject": "Question",
        "body": "What do you think?",
    });

    let processed = pipeline.process(&raw).await.unwrap();
    assert_eq!(processed.classification.label, Label::Business);
    assert!((processed.classification.confidence - 0.8).abs() < f32::EPSILON);
    assert!(matches!(processed.payload, ActionPayload::AutoReply { .. }));
}

// ── Timeout / fail-open ─────────────────────────────────────────────

#[tokio::test]
async fn timeout_yields_error_label_and_ack_payload() {
    let (pipeline, sink) = make_pipeline(Outcome::Timeout);

    let raw = json!({
        "from": "alice@example.com",
        "subject": "Anyone home?",
        "body": "Just checking in.",
    });

    // No error propagates: fail-open to the regular handler.
    let processed = pipeline.process(&raw).await.unwrap();
    assert_eq!(processed.classification.label, Label::Error);
    assert_eq!(processed.classification.confidence, 0.0);
    assert_eq!(processed.handler, HandlerKind::Regular);
    assert!(matches!(processed.payload, ActionPayload::Ack { .. }));
    assert_eq!(sink.delivered().await.len(), 1);
}

// ── Idempotence ─────────────────────────────────────────────────────

#[tokio::test]
async fn identical_message_yields_identical_payload() {
    let response =
        r#"{"classification": "SPAM", "confidence": 0.9, "reasoning": "bulk marketing"}"#;
    let raw = json!({
        "id": "fixed-id",
        "from": "deals@shop.com",
        "subject": "Mega sale",
        "body": "Everything must go!",
        "received_at": "2026-03-01T12:00:00Z",
    });

    let (pipeline_a, _) = make_pipeline(Outcome::Respond(response.into()));
    let (pipeline_b, _) = make_pipeline(Outcome::Respond(response.into()));

    let first = pipeline_a.process(&raw).await.unwrap();
    let second = pipeline_b.process(&raw).await.unwrap();

    let bytes_a = serde_json::to_vec(&first.payload).unwrap();
    let bytes_b = serde_json::to_vec(&second.payload).unwrap();
    assert_eq!(bytes_a, bytes_b);
}

// ── Totality / single dispatch ──────────────────────────────────────

#[tokio::test]
async fn every_label_produces_exactly_one_delivery() {
    let responses = [
        r#"{"classification": "URGENT", "confidence": 0.9}"#,
        r#"{"classification": "BUSINESS", "confidence": 0.9}"#,
        r#"{"classification": "SPAM", "confidence": 0.9}"#,
        r#"{"classification": "PERSONAL", "confidence": 0.9}"#,
    ];

    for response in responses {
        let (pipeline, sink) = make_pipeline(Outcome::Respond(response.into()));
        let raw = json!({
            "from": "sender@example.com",
            "subject": "Subject",
            "body": "Body",
        });
        pipeline.process(&raw).await.unwrap();
        assert_eq!(sink.delivered().await.len(), 1, "response: {response}");
    }
}

// ── Concurrent independence ─────────────────────────────────────────

#[tokio::test]
async fn concurrent_messages_share_no_state() {
    let adapter = Arc::new(ClassifierAdapter::new(
        Arc::new(MockClient {
            outcome: Outcome::Respond(
                r#"{"classification": "PERSONAL", "confidence": 0.6}"#.into(),
            ),
        }),
        RetryPolicy::default(),
    ));
    let sink = Arc::new(MemorySink::new());
    let pipeline = Arc::new(Pipeline::new(adapter, sink.clone()));

    let mut handles = Vec::new();
    for i in 0..8 {
        let pipeline = Arc::clone(&pipeline);
        handles.push(tokio::spawn(async move {
            let raw = json!({
                "id": format!("msg-{i}"),
                "from": format!("user{i}@example.com"),
                "subject": "Hello",
                "body": "Hi there",
            });
            pipeline.process(&raw).await.unwrap()
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(sink.delivered().await.len(), 8);
}
