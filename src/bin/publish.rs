//! Reads events from stdin, one per line, and publishes each to SQS.
//!
//! A line is either a JSON envelope `{"payload": "...", "options": {...}}`
//! or raw text used as the payload. A line that starts with `{` must be a
//! valid envelope.

use anyhow::{Context, bail};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use sqs_sink::core::config::SinkConfig;
use sqs_sink::core::options::{DEDUPLICATION_ID, DynamicOptions, MESSAGE_GROUP_ID, OptionHolder};
use sqs_sink::{ClientSettings, PublishError, SqsSink};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{error, info, warn};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    payload: String,
    #[serde(default)]
    options: DynamicOptions,
}

fn parse_line(line: &str) -> Result<Envelope, serde_json::Error> {
    if line.trim_start().starts_with('{') {
        return serde_json::from_str(line);
    }
    Ok(Envelope {
        payload: line.to_string(),
        options: DynamicOptions::new(),
    })
}

/// Delays between attempts before jitter: 100ms doubling, capped at 5s.
fn backoff_schedule() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(50)
        .max_delay(Duration::from_secs(5))
        .take(5)
}

fn options_from_env(config: &SinkConfig) -> OptionHolder {
    let mut options = OptionHolder::new();
    if config.fifo {
        options = match std::env::var("SQS_MESSAGE_GROUP_ID") {
            Ok(group_id) => options.with_static(MESSAGE_GROUP_ID, group_id),
            Err(_) => options.with_dynamic(MESSAGE_GROUP_ID),
        };
    }
    if std::env::var("SQS_CONTENT_DEDUP").is_ok_and(|v| v.eq_ignore_ascii_case("true")) {
        options = options.with_dynamic(DEDUPLICATION_ID);
    }
    options
}

fn content_hash(payload: &str) -> String {
    hex::encode(Sha256::digest(payload.as_bytes()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sqs_sink::setup_logging();

    let config = SinkConfig::from_env().context("Failed to load sink configuration")?;
    let options = options_from_env(&config);
    let content_dedup = options.is_dynamic(DEDUPLICATION_ID);
    let sink = SqsSink::connect(config, options, &ClientSettings::from_env()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let (mut sent, mut failed) = (0usize, 0usize);

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let Envelope {
            payload,
            mut options,
        } = match parse_line(&line) {
            Ok(envelope) => envelope,
            Err(e) => {
                error!("Skipping malformed envelope: {}", e);
                failed += 1;
                continue;
            }
        };
        if content_dedup && !options.contains(DEDUPLICATION_ID) {
            options.insert(DEDUPLICATION_ID, content_hash(&payload));
        }

        // Only failures that may clear up on their own are retried.
        let strategy = backoff_schedule().map(jitter);
        let result = RetryIf::spawn(
            strategy,
            || sink.publish(&payload, &options),
            |e: &PublishError| {
                if e.is_transient() {
                    warn!("Retrying SQS publish after error: {}", e);
                }
                e.is_transient()
            },
        )
        .await;

        match result {
            Ok(()) => sent += 1,
            Err(e) => {
                error!("Failed to publish message: {}", e);
                failed += 1;
            }
        }
    }

    info!(sent, failed, "Finished publishing");
    if failed > 0 {
        bail!("{failed} message(s) could not be published");
    }
    Ok(())
}
