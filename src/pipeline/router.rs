//! Routing — maps a classification label to a handler branch.
//!
//! A total pure function over the closed label set. Every label, including
//! `Error`, maps to exactly one handler; routing can never fail.

use crate::pipeline::types::{HandlerKind, Label};

/// Route a label to its handler branch.
///
/// `Personal` and `Error` both fall through to the regular handler —
/// a failed classification is handled like an ordinary message (fail-open)
/// rather than aborting the pipeline.
pub fn route(label: Label) -> HandlerKind {
    match label {
        Label::Urgent => HandlerKind::Urgent,
        Label::Business => HandlerKind::Business,
        Label::Spam => HandlerKind::Spam,
        Label::Personal | Label::Error => HandlerKind::Regular,
    }
}
