//! Message types and normalization into wire-ready batch entries.

use crate::error::ValidationError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Smallest delivery delay the service accepts, in seconds
pub const MIN_DELAY_SECONDS: i64 = 0;

/// Largest delivery delay the service accepts, in seconds
pub const MAX_DELAY_SECONDS: i64 = 900;

// ============================================================================
// Message Attributes
// ============================================================================

/// Typed attribute attached to a message
///
/// Mirrors the SQS message attribute shape: a required `data_type` plus a
/// string or binary payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAttribute {
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "optional_bytes_serde"
    )]
    pub binary_value: Option<Bytes>,
}

/// Custom serialization for optional binary payloads
mod optional_bytes_serde {
    use base64::{engine::general_purpose, Engine as _};
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bytes: &Option<Bytes>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match bytes {
            Some(bytes) => general_purpose::STANDARD.encode(bytes).serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Bytes>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => general_purpose::STANDARD
                .decode(encoded)
                .map(|decoded| Some(Bytes::from(decoded)))
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

impl MessageAttribute {
    /// String-typed attribute
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            data_type: "String".to_string(),
            string_value: Some(value.into()),
            binary_value: None,
        }
    }

    /// Number-typed attribute (SQS carries numbers as strings)
    pub fn number(value: impl ToString) -> Self {
        Self {
            data_type: "Number".to_string(),
            string_value: Some(value.to_string()),
            binary_value: None,
        }
    }

    /// Binary-typed attribute
    pub fn binary(value: impl Into<Bytes>) -> Self {
        Self {
            data_type: "Binary".to_string(),
            string_value: None,
            binary_value: Some(value.into()),
        }
    }
}

// ============================================================================
// Input Messages
// ============================================================================

/// A structured message accepted by [`Producer::send`](crate::Producer::send)
///
/// Every field is optional at the type level so that deserialized input with
/// missing fields still reaches normalization, where the producer's
/// validation rules decide what is acceptable. `body` is required there, as
/// is at least one of `id`, `group_id`, or `deduplication_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_attributes: Option<HashMap<String, MessageAttribute>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduplication_id: Option<String>,
}

impl Message {
    /// Create new message with body
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            ..Self::default()
        }
    }

    /// Set the entry identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set delivery delay in seconds (0-900)
    pub fn with_delay_seconds(mut self, delay_seconds: i64) -> Self {
        self.delay_seconds = Some(delay_seconds);
        self
    }

    /// Add message attribute
    pub fn with_attribute(mut self, key: impl Into<String>, attribute: MessageAttribute) -> Self {
        self.message_attributes
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), attribute);
        self
    }

    /// Set FIFO message group
    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Set FIFO deduplication identifier (requires a group id)
    pub fn with_deduplication_id(mut self, deduplication_id: impl Into<String>) -> Self {
        self.deduplication_id = Some(deduplication_id.into());
        self
    }
}

/// Heterogeneous producer input: plain text or a structured message
///
/// Text input uses the text as both payload and entry identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputMessage {
    Text(String),
    Structured(Message),
}

impl InputMessage {
    /// Interpret a JSON value as producer input.
    ///
    /// Strings become text messages and objects become structured messages;
    /// any other JSON shape is rejected as an unsupported message type.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ValidationError> {
        match value {
            serde_json::Value::String(text) => Ok(Self::Text(text)),
            serde_json::Value::Object(_) => serde_json::from_value(value)
                .map(Self::Structured)
                .map_err(|e| ValidationError::InvalidFormat {
                    field: "message".to_string(),
                    message: e.to_string(),
                }),
            _ => Err(ValidationError::UnsupportedMessageType),
        }
    }
}

impl From<&str> for InputMessage {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for InputMessage {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Message> for InputMessage {
    fn from(message: Message) -> Self {
        Self::Structured(message)
    }
}

// ============================================================================
// Wire Entries
// ============================================================================

/// Canonical wire-ready form of one message within a batch
///
/// Built fresh per normalization call and owned by the producer for the
/// duration of one batch submission. `id` is absent only when the source
/// message relied on FIFO `group_id`/`deduplication_id` identification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub id: Option<String>,
    pub body: String,
    pub delay_seconds: Option<i64>,
    pub message_attributes: HashMap<String, MessageAttribute>,
    pub group_id: Option<String>,
    pub deduplication_id: Option<String>,
}

impl BatchEntry {
    /// Normalize a text message; the text serves as both payload and id
    pub fn from_text(text: &str) -> Self {
        Self {
            id: Some(text.to_string()),
            body: text.to_string(),
            delay_seconds: None,
            message_attributes: HashMap::new(),
            group_id: None,
            deduplication_id: None,
        }
    }

    /// Normalize a structured message, validating every constraint
    pub fn from_structured(message: &Message) -> Result<Self, ValidationError> {
        let body = message.body.as_ref().ok_or_else(|| ValidationError::Required {
            field: "body".to_string(),
        })?;

        if message.id.is_none() && message.group_id.is_none() && message.deduplication_id.is_none()
        {
            return Err(ValidationError::Required {
                field: "id".to_string(),
            });
        }

        if message.deduplication_id.is_some() && message.group_id.is_none() {
            return Err(ValidationError::InvalidFormat {
                field: "deduplication_id".to_string(),
                message: "FIFO queue messages must also carry group_id".to_string(),
            });
        }

        if let Some(delay_seconds) = message.delay_seconds {
            if !(MIN_DELAY_SECONDS..=MAX_DELAY_SECONDS).contains(&delay_seconds) {
                return Err(ValidationError::OutOfRange {
                    field: "delay_seconds".to_string(),
                    message: format!(
                        "must be within [{} - {}]",
                        MIN_DELAY_SECONDS, MAX_DELAY_SECONDS
                    ),
                });
            }
        }

        let mut message_attributes = HashMap::new();
        if let Some(attributes) = &message.message_attributes {
            for (key, attribute) in attributes {
                if attribute.data_type.is_empty() {
                    return Err(ValidationError::InvalidFormat {
                        field: format!("message_attributes.{}", key),
                        message: "a message attribute must have a data_type".to_string(),
                    });
                }
                message_attributes.insert(key.clone(), attribute.clone());
            }
        }

        Ok(Self {
            id: message.id.clone(),
            body: body.clone(),
            delay_seconds: message.delay_seconds,
            message_attributes,
            group_id: message.group_id.clone(),
            deduplication_id: message.deduplication_id.clone(),
        })
    }
}

impl TryFrom<&InputMessage> for BatchEntry {
    type Error = ValidationError;

    fn try_from(message: &InputMessage) -> Result<Self, Self::Error> {
        match message {
            InputMessage::Text(text) => Ok(Self::from_text(text)),
            InputMessage::Structured(message) => Self::from_structured(message),
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
