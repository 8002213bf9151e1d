use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use sqs_sink::core::config::SinkConfig;
use sqs_sink::core::models::{MessageRequest, SendOutcome};
use sqs_sink::core::options::{DEDUPLICATION_ID, DynamicOptions, MESSAGE_GROUP_ID, OptionHolder};
use sqs_sink::errors::PublishError;
use sqs_sink::{MessagePublisher, QueueClient, SqsSink};

/// In-memory queue client that records every request and answers with a
/// fixed status, or a transport failure.
struct RecordingClient {
    status_code: u16,
    fail_transport: bool,
    sent: Mutex<Vec<MessageRequest>>,
}

impl RecordingClient {
    fn answering(status_code: u16) -> Arc<Self> {
        Arc::new(Self {
            status_code,
            fail_transport: false,
            sent: Mutex::new(Vec::new()),
        })
    }

    fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            status_code: 0,
            fail_transport: true,
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<MessageRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueueClient for RecordingClient {
    async fn send_message(&self, request: &MessageRequest) -> Result<SendOutcome, PublishError> {
        self.sent.lock().unwrap().push(request.clone());
        if self.fail_transport {
            let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
            return Err(PublishError::Transport(Box::new(io)));
        }
        Ok(SendOutcome {
            status_code: self.status_code,
        })
    }
}

fn publisher(
    config: SinkConfig,
    options: OptionHolder,
    client: &Arc<RecordingClient>,
) -> MessagePublisher {
    let client: Arc<dyn QueueClient> = client.clone();
    MessagePublisher::new(config, client, options)
}

fn fifo_options() -> OptionHolder {
    OptionHolder::new()
        .with_dynamic(MESSAGE_GROUP_ID)
        .with_dynamic(DEDUPLICATION_ID)
}

#[tokio::test]
async fn test_standard_queue_plain_message() {
    let client = RecordingClient::answering(200);
    let config = SinkConfig::new("Q").with_fifo(false);
    let publisher = publisher(config, OptionHolder::new(), &client);

    publisher.publish("hello", &DynamicOptions::new()).await.unwrap();

    assert_eq!(client.sent(), vec![MessageRequest::new("Q", "hello")]);
}

#[tokio::test]
async fn test_fifo_message_with_delay_and_dedup_reports_status() {
    let client = RecordingClient::answering(500);
    let config = SinkConfig::new("Q")
        .with_delay_seconds(Some(30))
        .with_fifo(true);
    let publisher = publisher(config, fifo_options(), &client);
    let dynamic = DynamicOptions::new()
        .with(MESSAGE_GROUP_ID, "g1")
        .with(DEDUPLICATION_ID, "d1");

    let err = publisher.publish("hi", &dynamic).await.unwrap_err();
    match err {
        PublishError::ConnectionUnavailable { status_code } => assert_eq!(status_code, 500),
        other => panic!("Unexpected error: {other:?}"),
    }

    let sent = client.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0],
        MessageRequest {
            queue_url: "Q".to_string(),
            body: "hi".to_string(),
            delay_seconds: Some(30),
            message_group_id: Some("g1".to_string()),
            deduplication_id: Some("d1".to_string()),
        }
    );
}

#[test]
fn test_delay_attached_only_when_set() {
    let client = RecordingClient::answering(200);
    for delay in [Some(0), Some(5), Some(900), None] {
        let config = SinkConfig::new("Q").with_delay_seconds(delay).with_fifo(false);
        let request = publisher(config, OptionHolder::new(), &client)
            .build_request("body", &DynamicOptions::new())
            .unwrap();
        assert_eq!(request.delay_seconds, delay);
    }
}

#[test]
fn test_non_fifo_ignores_group_and_dedup_options() {
    let client = RecordingClient::answering(200);
    let config = SinkConfig::new("Q").with_fifo(false);
    let dynamic = DynamicOptions::new()
        .with(MESSAGE_GROUP_ID, "g1")
        .with(DEDUPLICATION_ID, "d1");

    let request = publisher(config, fifo_options(), &client)
        .build_request("body", &dynamic)
        .unwrap();

    assert_eq!(request.message_group_id, None);
    assert_eq!(request.deduplication_id, None);
}

#[test]
fn test_fifo_group_id_resolved_per_message() {
    let client = RecordingClient::answering(200);
    let config = SinkConfig::new("Q.fifo");
    let publisher = publisher(config, OptionHolder::new().with_dynamic(MESSAGE_GROUP_ID), &client);

    for group in ["a", "b", "c"] {
        let dynamic = DynamicOptions::new().with(MESSAGE_GROUP_ID, group);
        let request = publisher.build_request("body", &dynamic).unwrap();
        assert_eq!(request.message_group_id.as_deref(), Some(group));
    }
}

#[test]
fn test_fifo_static_group_id() {
    let client = RecordingClient::answering(200);
    let options = OptionHolder::new().with_static(MESSAGE_GROUP_ID, "fixed");
    let publisher = publisher(SinkConfig::new("Q.fifo"), options, &client);

    let request = publisher
        .build_request("body", &DynamicOptions::new())
        .unwrap();
    assert_eq!(request.message_group_id.as_deref(), Some("fixed"));
}

#[test]
fn test_dedup_absent_when_not_registered() {
    let client = RecordingClient::answering(200);
    let options = OptionHolder::new().with_dynamic(MESSAGE_GROUP_ID);
    let publisher = publisher(SinkConfig::new("Q.fifo"), options, &client);
    let dynamic = DynamicOptions::new()
        .with(MESSAGE_GROUP_ID, "g1")
        .with(DEDUPLICATION_ID, "d1");

    let request = publisher.build_request("body", &dynamic).unwrap();
    assert_eq!(request.deduplication_id, None);
}

#[tokio::test]
async fn test_fifo_missing_group_id_never_reaches_network() {
    let client = RecordingClient::answering(200);
    let publisher = publisher(SinkConfig::new("Q.fifo"), fifo_options(), &client);

    let err = publisher
        .publish("body", &DynamicOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::OptionNotResolved { ref key } if key == MESSAGE_GROUP_ID));
    assert!(client.sent().is_empty());
}

#[tokio::test]
async fn test_fifo_unregistered_group_id_is_config_error() {
    let client = RecordingClient::answering(200);
    let publisher = publisher(SinkConfig::new("Q.fifo"), OptionHolder::new(), &client);
    let dynamic = DynamicOptions::new().with(MESSAGE_GROUP_ID, "g1");

    let err = publisher.publish("body", &dynamic).await.unwrap_err();
    assert!(matches!(err, PublishError::Config(_)));
    assert!(client.sent().is_empty());
}

#[tokio::test]
async fn test_non_success_statuses_carry_exact_code() {
    for status in [201, 400, 403, 500, 503] {
        let client = RecordingClient::answering(status);
        let publisher = publisher(SinkConfig::new("Q"), OptionHolder::new(), &client);

        let err = publisher
            .publish("body", &DynamicOptions::new())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(status));
        assert_eq!(client.sent().len(), 1);
    }
}

#[tokio::test]
async fn test_transport_error_passes_through() {
    let client = RecordingClient::unreachable();
    let publisher = publisher(SinkConfig::new("Q"), OptionHolder::new(), &client);

    let err = publisher
        .publish("body", &DynamicOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::Transport(_)));
    assert_eq!(
        std::error::Error::source(&err).map(ToString::to_string).as_deref(),
        Some("connection refused")
    );
}

#[tokio::test]
async fn test_sink_publishes_through_shared_client() {
    let client = RecordingClient::answering(200);
    let shared: Arc<dyn QueueClient> = client.clone();
    let options = OptionHolder::new().with_dynamic(MESSAGE_GROUP_ID);
    let sink = SqsSink::new(SinkConfig::new("Q.fifo"), options, shared).unwrap();

    let dynamic = DynamicOptions::new().with(MESSAGE_GROUP_ID, "g1");
    sink.publish("first", &dynamic).await.unwrap();
    sink.publish("second", &dynamic).await.unwrap();

    let bodies: Vec<String> = client.sent().into_iter().map(|r| r.body).collect();
    assert_eq!(bodies, vec!["first", "second"]);
    assert!(sink.publisher().is_fifo());
}

#[test]
fn test_sink_rejects_fifo_without_group_option() {
    let client: Arc<dyn QueueClient> = RecordingClient::answering(200);
    let result = SqsSink::new(SinkConfig::new("Q.fifo"), OptionHolder::new(), client);
    assert!(matches!(result, Err(PublishError::Config(_))));
}
