//! Error types for producer operations.

use thiserror::Error;

/// Comprehensive error type for all producer operations
#[derive(Debug, Error)]
pub enum ProducerError {
    /// Invalid construction options. Fatal, never retried.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Malformed input message. Aborts the current `send` call, not retried.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The remote call itself failed. Aborts the current `send` call,
    /// surfaced verbatim, not retried by this layer.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Per-entry rejections remained after all configured retries.
    ///
    /// `failed_ids` aggregates the rejected entry ids across every attempt,
    /// so the same id can appear more than once.
    #[error("Failed to send messages: {}", failed_ids.join(", "))]
    DeliveryFailed { failed_ids: Vec<String> },
}

impl ProducerError {
    /// Entry ids that were rejected, empty for non-delivery errors
    pub fn failed_ids(&self) -> &[String] {
        match self {
            Self::DeliveryFailed { failed_ids } => failed_ids,
            _ => &[],
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Missing SQS producer option: {key}")]
    Missing { key: String },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Batch size {size} must be between {min} and {max}")]
    BatchSizeOutOfRange { size: usize, min: usize, max: usize },
}

/// Validation errors raised while normalizing input messages
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    Required { field: String },

    #[error("Invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },

    #[error("Value out of range for {field}: {message}")]
    OutOfRange { field: String, message: String },

    #[error("A message must be either a string or an object")]
    UnsupportedMessageType,
}

/// Errors raised by the queue transport at the call level
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Queue not found: {0}")]
    QueueNotFound(String),

    #[error("SQS service error ({code}): {message}")]
    Service { code: String, message: String },

    #[error("Response parsing failed: {0}")]
    Serialization(String),
}

impl TransportError {
    /// Check if the failure is transient from the service's point of view.
    ///
    /// The producer never retries transport errors itself; this is advisory
    /// for callers that wrap `send` in their own retry policy.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Authentication(_) => false,
            Self::Network(_) => true,
            Self::QueueNotFound(_) => false,
            Self::Service { .. } => true,
            Self::Serialization(_) => false,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
