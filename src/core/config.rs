use serde::{Deserialize, Deserializer, Serialize};
use std::env;

use crate::errors::PublishError;

/// Largest delay SQS accepts on a single message, in seconds.
pub const MAX_DELAY_SECONDS: i32 = 900;

const FIFO_SUFFIX: &str = ".fifo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    pub queue_url: String,
    #[serde(default, deserialize_with = "delay_from_sentinel")]
    pub delay_seconds: Option<i32>,
    #[serde(default)]
    pub fifo: bool,
}

impl SinkConfig {
    /// FIFO mode follows the SQS naming rule: FIFO queue names end in `.fifo`.
    pub fn new(queue_url: impl Into<String>) -> Self {
        let queue_url = queue_url.into();
        let fifo = is_fifo_queue_url(&queue_url);
        Self {
            queue_url,
            delay_seconds: None,
            fifo,
        }
    }

    pub fn with_delay_seconds(mut self, delay_seconds: Option<i32>) -> Self {
        self.delay_seconds = delay_seconds;
        self
    }

    pub fn with_fifo(mut self, fifo: bool) -> Self {
        self.fifo = fifo;
        self
    }

    /// # Errors
    ///
    /// Returns `Config` for an empty queue URL or a delay outside `0..=900`.
    pub fn validate(&self) -> Result<(), PublishError> {
        if self.queue_url.trim().is_empty() {
            return Err(PublishError::Config("queue URL must not be empty".to_string()));
        }
        if let Some(delay) = self.delay_seconds {
            if !(0..=MAX_DELAY_SECONDS).contains(&delay) {
                return Err(PublishError::Config(format!(
                    "delay seconds must be between 0 and {MAX_DELAY_SECONDS}, got {delay}"
                )));
            }
        }
        Ok(())
    }

    pub fn from_env() -> Result<Self, PublishError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    ///
    /// `SQS_QUEUE_URL` is required. `SQS_DELAY_SECONDS` of `-1` means unset.
    /// `SQS_FIFO` overrides the mode inferred from the queue URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PublishError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let queue_url = lookup("SQS_QUEUE_URL")
            .ok_or_else(|| PublishError::Config("SQS_QUEUE_URL: not set".to_string()))?;

        let delay_seconds = match lookup("SQS_DELAY_SECONDS") {
            Some(raw) => {
                let value: i32 = raw.trim().parse().map_err(|e| {
                    PublishError::Config(format!("SQS_DELAY_SECONDS: {e}"))
                })?;
                (value != -1).then_some(value)
            }
            None => None,
        };

        let mut config = Self::new(queue_url).with_delay_seconds(delay_seconds);
        if let Some(raw) = lookup("SQS_FIFO") {
            let fifo = raw
                .trim()
                .parse::<bool>()
                .map_err(|e| PublishError::Config(format!("SQS_FIFO: {e}")))?;
            config = config.with_fifo(fifo);
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn is_fifo_queue_url(queue_url: &str) -> bool {
    queue_url.trim_end_matches('/').ends_with(FIFO_SUFFIX)
}

// Older sink definitions encode "no delay" as -1.
fn delay_from_sentinel<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i32>::deserialize(deserializer)?;
    Ok(raw.filter(|&delay| delay != -1))
}
