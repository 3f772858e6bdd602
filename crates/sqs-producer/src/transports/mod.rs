//! Transport implementations.
//!
//! This module contains concrete implementations of the [`Transport`] trait:
//! the production SQS transport and an in-memory double for tests.
//!
//! [`Transport`]: crate::transport::Transport

pub mod memory;
pub mod sqs;

pub use memory::InMemoryTransport;
pub use sqs::{SqsTransport, SqsTransportConfig};
