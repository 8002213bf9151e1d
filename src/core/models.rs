/// A single `SendMessage` call, assembled fresh for every publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRequest {
    pub queue_url: String,
    pub body: String,
    pub delay_seconds: Option<i32>,
    // FIFO-only fields
    pub message_group_id: Option<String>,
    pub deduplication_id: Option<String>,
}

impl MessageRequest {
    pub fn new(queue_url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            queue_url: queue_url.into(),
            body: body.into(),
            delay_seconds: None,
            message_group_id: None,
            deduplication_id: None,
        }
    }
}

/// What the publisher needs back from the queue service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOutcome {
    pub status_code: u16,
}

impl SendOutcome {
    pub const HTTP_SUCCESS: u16 = 200;

    pub fn is_success(&self) -> bool {
        self.status_code == Self::HTTP_SUCCESS
    }
}
