//! Tests for error types.

use super::*;

#[test]
fn test_delivery_failed_display_joins_ids() {
    let error = ProducerError::DeliveryFailed {
        failed_ids: vec!["a".to_string(), "b".to_string(), "c".to_string()],
    };

    assert_eq!(error.to_string(), "Failed to send messages: a, b, c");
}

#[test]
fn test_failed_ids_accessor() {
    let error = ProducerError::DeliveryFailed {
        failed_ids: vec!["id-1".to_string()],
    };
    assert_eq!(error.failed_ids(), &["id-1".to_string()]);

    let error = ProducerError::Transport(TransportError::Network("timeout".to_string()));
    assert!(error.failed_ids().is_empty());
}

#[test]
fn test_configuration_error_display() {
    let error = ConfigurationError::Missing {
        key: "queue_url".to_string(),
    };
    assert_eq!(error.to_string(), "Missing SQS producer option: queue_url");

    let error = ConfigurationError::BatchSizeOutOfRange {
        size: 11,
        min: 1,
        max: 10,
    };
    assert_eq!(error.to_string(), "Batch size 11 must be between 1 and 10");
}

#[test]
fn test_validation_error_display() {
    let error = ValidationError::Required {
        field: "body".to_string(),
    };
    assert_eq!(error.to_string(), "Required field missing: body");

    let error = ValidationError::OutOfRange {
        field: "delay_seconds".to_string(),
        message: "must be within 0-900".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Value out of range for delay_seconds: must be within 0-900"
    );
}

#[test]
fn test_transport_error_transience() {
    assert!(TransportError::Network("reset".to_string()).is_transient());
    assert!(TransportError::Service {
        code: "InternalError".to_string(),
        message: "retry later".to_string(),
    }
    .is_transient());

    assert!(!TransportError::Authentication("denied".to_string()).is_transient());
    assert!(!TransportError::QueueNotFound("missing".to_string()).is_transient());
    assert!(!TransportError::Serialization("bad xml".to_string()).is_transient());
}

#[test]
fn test_error_conversions() {
    let validation = ValidationError::Required {
        field: "body".to_string(),
    };
    let error: ProducerError = validation.into();
    assert!(matches!(error, ProducerError::Validation(_)));

    let transport = TransportError::Network("down".to_string());
    let error: ProducerError = transport.into();
    assert!(matches!(error, ProducerError::Transport(_)));
}
