//! Clients for external services

pub mod sqs;

pub use sqs::{ClientSettings, QueueClient, connect};
