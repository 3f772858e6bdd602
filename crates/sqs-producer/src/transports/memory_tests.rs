//! Tests for the in-memory transport.

use super::*;

fn queue() -> QueueUrl {
    QueueUrl::new("https://sqs.test.local/000000000000/inbox").unwrap()
}

fn entries(ids: &[&str]) -> Vec<BatchEntry> {
    ids.iter().map(|id| BatchEntry::from_text(id)).collect()
}

#[tokio::test]
async fn test_accepts_and_records_entries() {
    let transport = InMemoryTransport::new();
    let queue = queue();

    let outcome = transport
        .send_batch(&queue, &entries(&["a", "b"]))
        .await
        .unwrap();
    assert!(outcome.failed.is_empty());

    let sent = transport.sent_entries(&queue).await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].body, "a");
    assert_eq!(sent[1].body, "b");
    assert_eq!(transport.send_batch_calls().await, 1);
    assert_eq!(transport.batch_sizes().await, vec![2]);
}

#[tokio::test]
async fn test_permanent_rejection() {
    let transport = InMemoryTransport::new();
    let queue = queue();
    transport.reject_always("b").await;

    for _ in 0..2 {
        let outcome = transport
            .send_batch(&queue, &entries(&["a", "b"]))
            .await
            .unwrap();
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].id, "b");
        assert!(!outcome.failed[0].sender_fault);
    }

    // Only "a" was ever accepted.
    let sent = transport.sent_entries(&queue).await;
    assert!(sent.iter().all(|entry| entry.body == "a"));
}

#[tokio::test]
async fn test_bounded_rejection_expires() {
    let transport = InMemoryTransport::new();
    let queue = queue();
    transport.reject_times("a", 1).await;

    let outcome = transport.send_batch(&queue, &entries(&["a"])).await.unwrap();
    assert_eq!(outcome.failed.len(), 1);

    let outcome = transport.send_batch(&queue, &entries(&["a"])).await.unwrap();
    assert!(outcome.failed.is_empty());
    assert_eq!(transport.sent_entries(&queue).await.len(), 1);
}

#[tokio::test]
async fn test_injected_transport_error_is_consumed() {
    let transport = InMemoryTransport::new();
    let queue = queue();
    transport
        .fail_next_send(TransportError::Network("connection reset".to_string()))
        .await;

    let result = transport.send_batch(&queue, &entries(&["a"])).await;
    assert!(matches!(result, Err(TransportError::Network(_))));

    // The failure was one-shot; the following call succeeds.
    let outcome = transport.send_batch(&queue, &entries(&["a"])).await.unwrap();
    assert!(outcome.failed.is_empty());
}

#[tokio::test]
async fn test_queue_size_reflects_stored_entries() {
    let transport = InMemoryTransport::new();
    let queue = queue();

    assert_eq!(transport.queue_size(&queue).await.unwrap(), 0);

    transport
        .send_batch(&queue, &entries(&["a", "b", "c"]))
        .await
        .unwrap();
    assert_eq!(transport.queue_size(&queue).await.unwrap(), 3);

    transport.set_queue_size(42).await;
    assert_eq!(transport.queue_size(&queue).await.unwrap(), 42);
}
