use aws_sdk_sqs::config::http::HttpResponse;
use aws_sdk_sqs::error::SdkError;
use aws_sdk_sqs::operation::send_message::SendMessageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Invalid sink configuration: {0}")]
    Config(String),

    #[error("Failed to resolve option '{key}' for this message")]
    OptionNotResolved { key: String },

    #[error(
        "Error occurred when trying to send the message, received http status code : {status_code}"
    )]
    ConnectionUnavailable { status_code: u16 },

    #[error("Failed to reach the queue service: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PublishError {
    /// True when the service answered with a non-success status and the caller
    /// should treat the connection as down.
    pub fn is_connection_unavailable(&self) -> bool {
        matches!(self, PublishError::ConnectionUnavailable { .. })
    }

    /// Errors that may succeed on a later attempt of the same message.
    ///
    /// A service rejection is transient only for throttling and 5xx answers;
    /// a 4xx means the message itself was refused.
    pub fn is_transient(&self) -> bool {
        match self {
            PublishError::ConnectionUnavailable { .. } => true,
            PublishError::Transport(_) => self
                .service_status()
                .is_none_or(|status| status == 429 || status >= 500),
            PublishError::Config(_) | PublishError::OptionNotResolved { .. } => false,
        }
    }

    /// HTTP status of a SendMessage call the service rejected, if this error is one.
    pub fn service_status(&self) -> Option<u16> {
        let PublishError::Transport(source) = self else {
            return None;
        };
        match source.downcast_ref::<SdkError<SendMessageError, HttpResponse>>() {
            Some(SdkError::ServiceError(err)) => Some(err.raw().status().as_u16()),
            _ => None,
        }
    }

    /// Status code carried by `ConnectionUnavailable`.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PublishError::ConnectionUnavailable { status_code } => Some(*status_code),
            _ => None,
        }
    }
}

// Generic implementation for AWS SDK errors
impl<E, R> From<SdkError<E, R>> for PublishError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    fn from(error: SdkError<E, R>) -> Self {
        PublishError::Transport(Box::new(error))
    }
}
