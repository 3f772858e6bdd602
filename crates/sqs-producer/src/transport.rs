//! Transport trait for queue submission backends.

use crate::config::QueueUrl;
use crate::error::TransportError;
use crate::message::BatchEntry;
use async_trait::async_trait;

/// One entry rejected individually by the queue service
///
/// The call as a whole succeeded; this entry did not make it onto the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Identifier of the rejected entry
    pub id: String,
    /// Service error code, e.g. `InternalError`
    pub code: String,
    /// Human-readable description from the service
    pub message: String,
    /// Whether the sender caused the rejection
    pub sender_fault: bool,
}

/// Result of one successful batch submission
///
/// Entry ordering in `failed` is not guaranteed to match submission order;
/// correlation is by identifier only.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub failed: Vec<BatchFailure>,
}

impl BatchOutcome {
    /// Outcome with every entry accepted
    pub fn accepted() -> Self {
        Self::default()
    }
}

/// Interface to the remote queue service
///
/// The producer treats the queue as an opaque remote collaborator behind
/// this trait; implementations are injected explicitly so the batching and
/// retry logic stays testable against a fake.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit one batch of entries in a single service call.
    ///
    /// A `Err` means the call itself failed (network, auth, throttling at
    /// the call level). `Ok` carries the per-entry rejections, if any.
    async fn send_batch(
        &self,
        queue_url: &QueueUrl,
        entries: &[BatchEntry],
    ) -> Result<BatchOutcome, TransportError>;

    /// Approximate number of messages currently on the queue
    async fn queue_size(&self, queue_url: &QueueUrl) -> Result<u64, TransportError>;
}
