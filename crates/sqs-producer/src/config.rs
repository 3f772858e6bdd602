//! Producer configuration types.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Smallest batch the SQS batch API accepts
pub const MIN_BATCH_SIZE: usize = 1;

/// Largest batch the SQS batch API accepts
pub const MAX_BATCH_SIZE: usize = 10;

/// Validated SQS queue URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueUrl(Url);

impl QueueUrl {
    /// Create new queue URL with validation
    pub fn new(url: &str) -> Result<Self, ConfigurationError> {
        if url.is_empty() {
            return Err(ConfigurationError::Missing {
                key: "queue_url".to_string(),
            });
        }

        let parsed = Url::parse(url).map_err(|e| ConfigurationError::Invalid {
            message: format!("queue_url is not a valid URL: {}", e),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigurationError::Invalid {
                message: format!("queue_url must use http or https, got {}", parsed.scheme()),
            });
        }

        Ok(Self(parsed))
    }

    /// Get queue URL as string
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for QueueUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QueueUrl {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Configuration for a producer, captured once at construction
///
/// Validated by [`Producer::new`](crate::Producer::new) and never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Destination queue for all sends
    pub queue_url: QueueUrl,

    /// Maximum entries per transport call (1-10, the service-imposed ceiling)
    pub batch_size: usize,

    /// Number of whole-list retries after a walk with per-entry rejections
    pub retries: u32,

    /// Delay between retry attempts
    pub retry_interval: Duration,

    /// Emit diagnostic traces of rejections and retry attempts
    pub debug_logging: bool,
}

impl ProducerConfig {
    /// Create configuration with defaults: batch size 10, no retries,
    /// 30 second retry interval, debug logging off
    pub fn new(queue_url: QueueUrl) -> Self {
        Self {
            queue_url,
            batch_size: MAX_BATCH_SIZE,
            retries: 0,
            retry_interval: Duration::from_secs(30),
            debug_logging: false,
        }
    }

    /// Set batch size (validated by `validate`)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set number of whole-list retries
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set delay between retry attempts
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Enable diagnostic traces of rejections and retry attempts
    pub fn with_debug_logging(mut self) -> Self {
        self.debug_logging = true;
        self
    }

    /// Validate configuration bounds
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&self.batch_size) {
            return Err(ConfigurationError::BatchSizeOutOfRange {
                size: self.batch_size,
                min: MIN_BATCH_SIZE,
                max: MAX_BATCH_SIZE,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
