use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use hubmail::classifier::{ClassifierAdapter, OllamaClient};
use hubmail::config::ClassifierConfig;
use hubmail::pipeline::processor::Pipeline;
use hubmail::sink::TracingSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ClassifierConfig::from_env();
    config.validate()?;

    eprintln!("📧 HubMail v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Classifier: {} (model: {})", config.endpoint, config.model);
    eprintln!("   Timeout: {:?}, attempts: {}", config.timeout, config.retry.attempts());
    eprintln!("   Reading one raw JSON message per line from stdin.\n");

    let client = Arc::new(OllamaClient::new(&config));
    let adapter = Arc::new(ClassifierAdapter::new(client, config.retry));
    let pipeline = Pipeline::new(adapter, Arc::new(TracingSink));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let raw: serde_json::Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, "Skipping line: not valid JSON");
                continue;
            }
        };

        // Invalid input rejects the message, not the process.
        match pipeline.process(&raw).await {
            Ok(processed) => {
                println!("{}", serde_json::to_string(&processed.payload)?);
            }
            Err(e) => {
                tracing::error!(error = %e, "Message rejected");
            }
        }
    }

    Ok(())
}
