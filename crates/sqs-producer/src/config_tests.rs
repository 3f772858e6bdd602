//! Tests for configuration types.

use super::*;
use crate::error::ConfigurationError;

fn test_queue_url() -> QueueUrl {
    QueueUrl::new("https://sqs.eu-west-1.amazonaws.com/123456789012/orders")
        .expect("valid queue url")
}

#[test]
fn test_queue_url_rejects_empty() {
    let result = QueueUrl::new("");
    assert!(matches!(
        result,
        Err(ConfigurationError::Missing { ref key }) if key == "queue_url"
    ));
}

#[test]
fn test_queue_url_rejects_garbage() {
    let result = QueueUrl::new("not a url");
    assert!(matches!(result, Err(ConfigurationError::Invalid { .. })));
}

#[test]
fn test_queue_url_rejects_non_http_scheme() {
    for url in ["mailto:x@y", "ftp://host/queue", "file:///tmp/queue"] {
        let result = QueueUrl::new(url);
        assert!(
            matches!(result, Err(ConfigurationError::Invalid { .. })),
            "{} should be rejected",
            url
        );
    }

    // Plain http stays valid for LocalStack-style endpoints.
    assert!(QueueUrl::new("http://localhost:4566/000000000000/inbox").is_ok());
}

#[test]
fn test_queue_url_round_trip() {
    let url = test_queue_url();
    assert_eq!(
        url.as_str(),
        "https://sqs.eu-west-1.amazonaws.com/123456789012/orders"
    );
    assert_eq!(url.to_string(), url.as_str());

    let parsed: QueueUrl = url.as_str().parse().expect("parse via FromStr");
    assert_eq!(parsed, url);
}

#[test]
fn test_config_defaults() {
    let config = ProducerConfig::new(test_queue_url());

    assert_eq!(config.batch_size, 10);
    assert_eq!(config.retries, 0);
    assert_eq!(config.retry_interval, Duration::from_secs(30));
    assert!(!config.debug_logging);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_builder() {
    let config = ProducerConfig::new(test_queue_url())
        .with_batch_size(5)
        .with_retries(3)
        .with_retry_interval(Duration::from_secs(2))
        .with_debug_logging();

    assert_eq!(config.batch_size, 5);
    assert_eq!(config.retries, 3);
    assert_eq!(config.retry_interval, Duration::from_secs(2));
    assert!(config.debug_logging);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_batch_size_bounds() {
    let config = ProducerConfig::new(test_queue_url()).with_batch_size(0);
    assert!(matches!(
        config.validate(),
        Err(ConfigurationError::BatchSizeOutOfRange { size: 0, .. })
    ));

    let config = ProducerConfig::new(test_queue_url()).with_batch_size(11);
    assert!(matches!(
        config.validate(),
        Err(ConfigurationError::BatchSizeOutOfRange { size: 11, .. })
    ));

    for size in [1, 10] {
        let config = ProducerConfig::new(test_queue_url()).with_batch_size(size);
        assert!(config.validate().is_ok(), "batch size {} should be valid", size);
    }
}
