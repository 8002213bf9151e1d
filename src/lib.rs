/// SQS sink - forwards text events from a stream processor to Amazon SQS.
///
/// Each event becomes one `SendMessage` call. Static settings (queue URL,
/// delay, FIFO mode) come from [`core::config::SinkConfig`]; per-message
/// values such as the FIFO message group id come from
/// [`core::options::DynamicOptions`].
///
/// # Architecture
///
/// The crate uses:
/// - aws-sdk-sqs for the queue service
/// - a `QueueClient` trait as the seam between the publisher and the SDK
/// - Tokio for the async runtime
///
/// # Example
///
/// ```no_run
/// use sqs_sink::core::config::SinkConfig;
/// use sqs_sink::core::options::{DynamicOptions, MESSAGE_GROUP_ID, OptionHolder};
/// use sqs_sink::{ClientSettings, SqsSink};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     sqs_sink::setup_logging();
///
///     let config = SinkConfig::new("https://sqs.us-east-1.amazonaws.com/123456789012/orders.fifo");
///     let options = OptionHolder::new().with_dynamic(MESSAGE_GROUP_ID);
///     let sink = SqsSink::connect(config, options, &ClientSettings::default()).await?;
///
///     let dynamic = DynamicOptions::new().with(MESSAGE_GROUP_ID, "customer-42");
///     sink.publish("{\"order\":1}", &dynamic).await?;
///     Ok(())
/// }
/// ```
// Module declarations
pub mod clients;
pub mod core;
pub mod errors;
pub mod publisher;
pub mod sink;

pub use clients::{ClientSettings, QueueClient};
pub use errors::PublishError;
pub use publisher::MessagePublisher;
pub use sink::SqsSink;

/// Configure structured logging with JSON output.
///
/// Honors `RUST_LOG`, defaulting to `info`. Calling it more than once keeps
/// the first subscriber.
///
/// # Example
///
/// ```
/// sqs_sink::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
