//! Outbound seam to the queue service.
//!
//! The publisher only sees `QueueClient`; the AWS SDK client is one
//! implementation, test doubles are another.

use async_trait::async_trait;
use aws_sdk_sqs::Client as SqsClient;
use aws_sdk_sqs::error::SdkError;
use tracing::{info, warn};

use crate::core::models::{MessageRequest, SendOutcome};
use crate::errors::PublishError;

#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Submit one message and report the HTTP status of the accepted response.
    ///
    /// # Errors
    ///
    /// Returns `Transport` carrying the client's own error, service rejections
    /// included, without reclassifying it.
    async fn send_message(&self, request: &MessageRequest) -> Result<SendOutcome, PublishError>;
}

#[async_trait]
impl QueueClient for SqsClient {
    async fn send_message(&self, request: &MessageRequest) -> Result<SendOutcome, PublishError> {
        let result = SqsClient::send_message(self)
            .queue_url(&request.queue_url)
            .message_body(&request.body)
            .set_delay_seconds(request.delay_seconds)
            .set_message_group_id(request.message_group_id.clone())
            .set_message_deduplication_id(request.deduplication_id.clone())
            .send()
            .await;

        match result {
            Ok(_) => Ok(SendOutcome {
                status_code: SendOutcome::HTTP_SUCCESS,
            }),
            Err(err) => {
                if let SdkError::ServiceError(service_err) = &err {
                    warn!(
                        status_code = service_err.raw().status().as_u16(),
                        queue_url = %request.queue_url,
                        "SQS rejected SendMessage: {}",
                        service_err.err()
                    );
                }
                Err(err.into())
            }
        }
    }
}

/// Where to find the queue service. Unset fields fall back to the AWS
/// default provider chain.
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

impl ClientSettings {
    /// Reads `AWS_REGION` and `SQS_ENDPOINT_URL`.
    pub fn from_env() -> Self {
        Self {
            region: std::env::var("AWS_REGION").ok(),
            endpoint_url: std::env::var("SQS_ENDPOINT_URL").ok(),
        }
    }
}

/// Build an SQS client from shared AWS configuration.
///
/// Credentials come from the default chain; the returned client is owned by
/// the caller and may be shared between publishers.
pub async fn connect(settings: &ClientSettings) -> SqsClient {
    let mut loader = aws_config::from_env();
    if let Some(region) = &settings.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }
    if let Some(endpoint_url) = &settings.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    let shared_config = loader.load().await;

    info!(
        region = ?shared_config.region(),
        endpoint_url = ?settings.endpoint_url,
        "Created SQS client"
    );
    SqsClient::new(&shared_config)
}
