//! # SQS Producer
//!
//! Batching message producer for AWS SQS with validation, automatic
//! chunking, and configurable retries.
//!
//! This library provides:
//! - Normalization of plain-text and structured messages into batch entries
//! - Batch submission in chunks of up to 10 entries per request
//! - Full-list retry with a configurable delay when entries are rejected
//! - Approximate queue size queries
//! - A pluggable [`Transport`] trait with SQS and in-memory implementations
//!
//! ## Module Organization
//!
//! - [`config`] - Producer configuration and queue URL validation
//! - [`error`] - Error types for configuration, validation, and delivery
//! - [`message`] - Message structures and batch entry normalization
//! - [`producer`] - The batching producer itself
//! - [`transport`] - The transport trait and batch outcome types
//! - [`transports`] - SQS and in-memory transport implementations
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sqs_producer::transports::{SqsTransport, SqsTransportConfig};
//! use sqs_producer::{Producer, ProducerConfig, QueueUrl};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = SqsTransport::new(SqsTransportConfig {
//!     region: "eu-west-1".to_string(),
//!     access_key_id: Some("...".to_string()),
//!     secret_access_key: Some("...".to_string()),
//!     endpoint: None,
//! })?;
//!
//! let queue_url = QueueUrl::new("https://sqs.eu-west-1.amazonaws.com/123456789012/orders")?;
//! let config = ProducerConfig::new(queue_url).with_retries(2);
//! let producer = Producer::new(config, Arc::new(transport))?;
//!
//! producer.send(vec!["first".into(), "second".into()]).await?;
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod message;
pub mod producer;
pub mod transport;
pub mod transports;

// Re-export commonly used types at crate root for convenience
pub use config::{ProducerConfig, QueueUrl, MAX_BATCH_SIZE, MIN_BATCH_SIZE};
pub use error::{ConfigurationError, ProducerError, TransportError, ValidationError};
pub use message::{
    BatchEntry, InputMessage, Message, MessageAttribute, MAX_DELAY_SECONDS, MIN_DELAY_SECONDS,
};
pub use producer::Producer;
pub use transport::{BatchFailure, BatchOutcome, Transport};
pub use transports::{InMemoryTransport, SqsTransport, SqsTransportConfig};
