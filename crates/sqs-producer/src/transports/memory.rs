//! In-memory transport implementation for testing and development.
//!
//! This transport records every delivered entry and supports failure
//! injection, making it the reference double for exercising the producer's
//! batching and retry behavior without real infrastructure:
//! - per-entry rejections, permanent or for a bounded number of calls
//! - call-level transport failures on the next submission
//! - bookkeeping of call counts and batch sizes

use crate::config::QueueUrl;
use crate::error::TransportError;
use crate::message::BatchEntry;
use crate::transport::{BatchFailure, BatchOutcome, Transport};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

/// Internal mutable state, behind one lock
#[derive(Default)]
struct TransportState {
    /// Accepted entries per queue URL, in arrival order
    queues: HashMap<String, Vec<BatchEntry>>,
    /// Entry ids rejected on every call
    reject_always: HashSet<String>,
    /// Entry ids rejected for a remaining number of calls
    reject_times: HashMap<String, u32>,
    /// Error consumed by the next `send_batch` call
    fail_next_send: Option<TransportError>,
    /// Error consumed by the next `queue_size` call
    fail_next_queue_size: Option<TransportError>,
    /// Reported queue size override
    queue_size_override: Option<u64>,
    /// Number of `send_batch` calls observed
    send_batch_calls: usize,
    /// Entry count of each observed batch, in call order
    batch_sizes: Vec<usize>,
}

/// In-memory queue transport
///
/// ```
/// use sqs_producer::transports::InMemoryTransport;
/// use sqs_producer::{Producer, ProducerConfig, QueueUrl};
/// use std::sync::Arc;
///
/// let transport = Arc::new(InMemoryTransport::new());
/// let queue_url = QueueUrl::new("https://sqs.test.local/000000000000/inbox").unwrap();
/// let producer =
///     Producer::new(ProducerConfig::new(queue_url.clone()), transport.clone()).unwrap();
///
/// tokio_test::block_on(async {
///     producer.send_one("hello").await.unwrap();
///     assert_eq!(transport.sent_entries(&queue_url).await.len(), 1);
/// });
/// ```
#[derive(Default)]
pub struct InMemoryTransport {
    state: Mutex<TransportState>,
}

impl InMemoryTransport {
    /// Create new empty transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the entry with this id on every future call
    pub async fn reject_always(&self, id: impl Into<String>) {
        self.state.lock().await.reject_always.insert(id.into());
    }

    /// Reject the entry with this id for the next `calls` submissions that
    /// contain it, then accept it
    pub async fn reject_times(&self, id: impl Into<String>, calls: u32) {
        self.state.lock().await.reject_times.insert(id.into(), calls);
    }

    /// Fail the next `send_batch` call with this error
    pub async fn fail_next_send(&self, error: TransportError) {
        self.state.lock().await.fail_next_send = Some(error);
    }

    /// Fail the next `queue_size` call with this error
    pub async fn fail_next_queue_size(&self, error: TransportError) {
        self.state.lock().await.fail_next_queue_size = Some(error);
    }

    /// Report this size from `queue_size` instead of the stored entry count
    pub async fn set_queue_size(&self, size: u64) {
        self.state.lock().await.queue_size_override = Some(size);
    }

    /// Entries accepted for a queue so far
    pub async fn sent_entries(&self, queue_url: &QueueUrl) -> Vec<BatchEntry> {
        self.state
            .lock()
            .await
            .queues
            .get(queue_url.as_str())
            .cloned()
            .unwrap_or_default()
    }

    /// Number of `send_batch` calls observed
    pub async fn send_batch_calls(&self) -> usize {
        self.state.lock().await.send_batch_calls
    }

    /// Entry count of each observed batch, in call order
    pub async fn batch_sizes(&self) -> Vec<usize> {
        self.state.lock().await.batch_sizes.clone()
    }
}

impl TransportState {
    /// Decide whether to reject this entry, consuming a bounded rejection
    fn should_reject(&mut self, id: &str) -> bool {
        if self.reject_always.contains(id) {
            return true;
        }

        if let Some(remaining) = self.reject_times.get_mut(id) {
            if *remaining > 0 {
                *remaining -= 1;
                return true;
            }
        }

        false
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn send_batch(
        &self,
        queue_url: &QueueUrl,
        entries: &[BatchEntry],
    ) -> Result<BatchOutcome, TransportError> {
        let mut state = self.state.lock().await;
        state.send_batch_calls += 1;
        state.batch_sizes.push(entries.len());

        if let Some(error) = state.fail_next_send.take() {
            return Err(error);
        }

        let mut failed = Vec::new();
        for entry in entries {
            let id = entry.id.clone().unwrap_or_default();
            if state.should_reject(&id) {
                failed.push(BatchFailure {
                    id,
                    code: "InternalError".to_string(),
                    message: "injected rejection".to_string(),
                    sender_fault: false,
                });
            } else {
                state
                    .queues
                    .entry(queue_url.as_str().to_string())
                    .or_default()
                    .push(entry.clone());
            }
        }

        Ok(BatchOutcome { failed })
    }

    async fn queue_size(&self, queue_url: &QueueUrl) -> Result<u64, TransportError> {
        let mut state = self.state.lock().await;

        if let Some(error) = state.fail_next_queue_size.take() {
            return Err(error);
        }

        if let Some(size) = state.queue_size_override {
            return Ok(size);
        }

        Ok(state
            .queues
            .get(queue_url.as_str())
            .map(|entries| entries.len() as u64)
            .unwrap_or(0))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
