//! Message publisher for SQS.
//!
//! Turns one text payload plus its per-message options into a single
//! `SendMessage` call. Retrying and reconnecting belong to the caller.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::QueueClient;
use crate::core::config::SinkConfig;
use crate::core::models::MessageRequest;
use crate::core::options::{DEDUPLICATION_ID, DynamicOptions, MESSAGE_GROUP_ID, OptionHolder};
use crate::errors::PublishError;

pub struct MessagePublisher {
    config: SinkConfig,
    client: Arc<dyn QueueClient>,
    options: OptionHolder,
}

impl MessagePublisher {
    pub fn new(config: SinkConfig, client: Arc<dyn QueueClient>, options: OptionHolder) -> Self {
        Self {
            config,
            client,
            options,
        }
    }

    pub fn is_fifo(&self) -> bool {
        self.config.fifo
    }

    /// Assemble the request for one message without sending it.
    ///
    /// # Errors
    ///
    /// In FIFO mode, fails when the message group id is not configured or
    /// cannot be resolved, or when a registered deduplication id has no value.
    pub fn build_request(
        &self,
        payload: &str,
        dynamic: &DynamicOptions,
    ) -> Result<MessageRequest, PublishError> {
        let mut request = MessageRequest::new(&self.config.queue_url, payload);
        request.delay_seconds = self.config.delay_seconds;

        if self.config.fifo {
            let group_id = self
                .options
                .validate_and_get(MESSAGE_GROUP_ID)?
                .value(dynamic)?;
            request.message_group_id = Some(group_id);

            if self.options.is_dynamic(DEDUPLICATION_ID) {
                let dedup_id = self
                    .options
                    .validate_and_get(DEDUPLICATION_ID)?
                    .value(dynamic)?;
                request.deduplication_id = Some(dedup_id);
            }
        }

        Ok(request)
    }

    /// Send one message and wait for the service to acknowledge it.
    ///
    /// # Errors
    ///
    /// - option resolution errors from [`Self::build_request`], before any network call
    /// - `ConnectionUnavailable` with the observed status when it is not 200
    /// - `Transport` from the client, passed through untouched
    pub async fn publish(
        &self,
        payload: &str,
        dynamic: &DynamicOptions,
    ) -> Result<(), PublishError> {
        let request = self.build_request(payload, dynamic)?;
        debug!(
            queue_url = %request.queue_url,
            group_id = ?request.message_group_id,
            bytes = request.body.len(),
            "Sending message to SQS"
        );

        let outcome = self.client.send_message(&request).await?;
        if !outcome.is_success() {
            warn!(status_code = outcome.status_code, "SQS send did not succeed");
            return Err(PublishError::ConnectionUnavailable {
                status_code: outcome.status_code,
            });
        }
        Ok(())
    }
}
