//! Email processing pipeline.
//!
//! Every message flows strictly forward through:
//! 1. `extract::extract()` — normalize untyped input
//! 2. `ClassifierAdapter::classify()` — external LLM call, fail-open
//! 3. `router::route()` — total label → handler mapping
//! 4. `handlers::handle()` — pure payload construction
//! 5. `Sink::deliver()` — exactly one payload per message

pub mod extract;
pub mod handlers;
pub mod processor;
pub mod router;
pub mod types;
