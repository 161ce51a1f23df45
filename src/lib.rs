//! HubMail — email classification and routing pipeline.

pub mod classifier;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod sink;
