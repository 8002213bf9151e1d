//! The SQS sink: validates a sink definition and builds its publisher on a shared client handle.

use std::sync::Arc;
use tracing::info;

use crate::clients::{ClientSettings, QueueClient, connect};
use crate::core::config::SinkConfig;
use crate::core::options::{DynamicOptions, MESSAGE_GROUP_ID, OptionHolder};
use crate::errors::PublishError;
use crate::publisher::MessagePublisher;

pub struct SqsSink {
    publisher: MessagePublisher,
}

impl SqsSink {
    /// Validate the sink definition and wire a publisher to `client`.
    ///
    /// # Errors
    ///
    /// Returns `Config` for invalid settings, or for a FIFO queue with no
    /// `message-group-id` option registered.
    pub fn new(
        config: SinkConfig,
        options: OptionHolder,
        client: Arc<dyn QueueClient>,
    ) -> Result<Self, PublishError> {
        config.validate()?;
        if config.fifo {
            options.validate_and_get(MESSAGE_GROUP_ID).map_err(|_| {
                PublishError::Config(format!(
                    "FIFO queue {} requires the '{MESSAGE_GROUP_ID}' option",
                    config.queue_url
                ))
            })?;
        }

        info!(
            queue_url = %config.queue_url,
            fifo = config.fifo,
            delay_seconds = ?config.delay_seconds,
            dynamic_options = ?options.dynamic_keys(),
            "SQS sink configured"
        );
        let publisher = MessagePublisher::new(config, client, options);
        Ok(Self { publisher })
    }

    /// Build the AWS client from `settings` and configure the sink on it.
    pub async fn connect(
        config: SinkConfig,
        options: OptionHolder,
        settings: &ClientSettings,
    ) -> Result<Self, PublishError> {
        let client = connect(settings).await;
        Self::new(config, options, Arc::new(client))
    }

    pub fn publisher(&self) -> &MessagePublisher {
        &self.publisher
    }

    pub async fn publish(
        &self,
        payload: &str,
        dynamic: &DynamicOptions,
    ) -> Result<(), PublishError> {
        self.publisher.publish(payload, dynamic).await
    }
}
