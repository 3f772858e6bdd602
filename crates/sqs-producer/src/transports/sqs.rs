//! AWS SQS transport over the query API.
//!
//! Talks to SQS through direct HTTP calls with AWS Signature V4 signing
//! instead of the AWS SDK. This keeps the request/response handling fully
//! under our control and unit-testable: parameter encoding and XML parsing
//! are plain functions over strings.
//!
//! ## Operations
//!
//! - `SendMessageBatch` for batch submission, reporting per-entry rejections
//!   as [`BatchFailure`]s
//! - `GetQueueAttributes` for the approximate queue size
//!
//! ## Authentication
//!
//! Explicit access keys via [`SqsTransportConfig`]. Requests without
//! configured credentials fail with an authentication error rather than
//! falling back to an ambient credential chain.
//!
//! ## Endpoint override
//!
//! `endpoint` in the configuration points the transport at an
//! SQS-compatible local service (LocalStack and friends) instead of the
//! regional AWS endpoint.

use crate::config::QueueUrl;
use crate::error::{ConfigurationError, TransportError};
use crate::message::BatchEntry;
use crate::transport::{BatchFailure, BatchOutcome, Transport};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client as HttpClient;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

#[cfg(test)]
#[path = "sqs_tests.rs"]
mod tests;

const SQS_API_VERSION: &str = "2012-11-05";

type HmacSha256 = Hmac<Sha256>;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the SQS transport
#[derive(Debug, Clone)]
pub struct SqsTransportConfig {
    /// AWS region, e.g. `eu-west-1`
    pub region: String,
    /// AWS access key ID
    pub access_key_id: Option<String>,
    /// AWS secret access key
    pub secret_access_key: Option<String>,
    /// Endpoint override for SQS-compatible local services
    pub endpoint: Option<String>,
}

// ============================================================================
// AWS Signature V4 Signing
// ============================================================================

/// AWS Signature Version 4 request signer
///
/// Produces the `Authorization`, `x-amz-date`, and `host` headers for one
/// request: canonical request, string to sign, 4-level HMAC key derivation,
/// final signature.
#[derive(Clone)]
struct SigV4 {
    access_key: String,
    secret_key: String,
    region: String,
}

impl SigV4 {
    const ALGORITHM: &'static str = "AWS4-HMAC-SHA256";
    const SERVICE: &'static str = "sqs";
    const SIGNED_HEADERS: &'static str = "host;x-amz-date";

    fn new(access_key: String, secret_key: String, region: String) -> Self {
        Self {
            access_key,
            secret_key,
            region,
        }
    }

    /// Sign a request, returning the headers to attach
    fn sign(
        &self,
        method: &str,
        host: &str,
        path: &str,
        query: &HashMap<String, String>,
        body: &str,
        timestamp: &DateTime<Utc>,
    ) -> HashMap<String, String> {
        let amz_date = timestamp.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = timestamp.format("%Y%m%d").to_string();

        // Canonical query string is sorted by encoded key=value pairs.
        let mut query_pairs: Vec<String> = query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        query_pairs.sort();
        let canonical_query = query_pairs.join("&");

        let canonical_headers = format!("host:{}\nx-amz-date:{}\n", host, amz_date);
        let payload_hash = hex::encode(Sha256::digest(body.as_bytes()));

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method,
            path,
            canonical_query,
            canonical_headers,
            Self::SIGNED_HEADERS,
            payload_hash
        );

        let scope = format!(
            "{}/{}/{}/aws4_request",
            date_stamp,
            self.region,
            Self::SERVICE
        );
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            Self::ALGORITHM,
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signature = self.signature(&date_stamp, &string_to_sign);
        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            Self::ALGORITHM,
            self.access_key,
            scope,
            Self::SIGNED_HEADERS,
            signature
        );

        HashMap::from([
            ("Authorization".to_string(), authorization),
            ("x-amz-date".to_string(), amz_date),
            ("host".to_string(), host.to_string()),
        ])
    }

    /// Derive the signing key and compute the final signature
    ///
    /// Key chain: AWS4+secret -> date -> region -> service -> aws4_request.
    fn signature(&self, date_stamp: &str, string_to_sign: &str) -> String {
        let k_secret = format!("AWS4{}", self.secret_key);
        let k_date = hmac_sha256(k_secret.as_bytes(), date_stamp.as_bytes());
        let k_region = hmac_sha256(&k_date, self.region.as_bytes());
        let k_service = hmac_sha256(&k_region, Self::SERVICE.as_bytes());
        let k_signing = hmac_sha256(&k_service, b"aws4_request");

        hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes()))
    }
}

/// Compute HMAC-SHA256
fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

// ============================================================================
// SQS Transport
// ============================================================================

/// SQS implementation of the [`Transport`] trait
///
/// Thread-safe; share across tasks with `Arc`.
pub struct SqsTransport {
    http_client: HttpClient,
    signer: Option<SigV4>,
    endpoint: String,
}

impl SqsTransport {
    /// Create new SQS transport
    ///
    /// Fails if the region is missing or the HTTP client cannot be built.
    pub fn new(config: SqsTransportConfig) -> Result<Self, ConfigurationError> {
        if config.region.is_empty() {
            return Err(ConfigurationError::Missing {
                key: "region".to_string(),
            });
        }

        let signer = match (&config.access_key_id, &config.secret_access_key) {
            (Some(access_key), Some(secret_key)) => Some(SigV4::new(
                access_key.clone(),
                secret_key.clone(),
                config.region.clone(),
            )),
            _ => None,
        };

        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://sqs.{}.amazonaws.com", config.region));

        let http_client = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ConfigurationError::Invalid {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            signer,
            endpoint,
        })
    }

    /// Issue one signed query-API call, returning the response body
    async fn query(&self, params: &HashMap<String, String>) -> Result<String, TransportError> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            TransportError::Authentication("no credentials configured".to_string())
        })?;

        let host = self
            .endpoint
            .trim_start_matches("https://")
            .trim_start_matches("http://");
        let timestamp = Utc::now();
        let headers = signer.sign("POST", host, "/", params, "", &timestamp);

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!("{}/?{}", self.endpoint, query_string);

        let mut request = self.http_client.post(&url);
        for (key, value) in headers {
            request = request.header(&key, value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Network(format!("request timeout: {}", e))
            } else if e.is_connect() {
                TransportError::Network(format!("connection failed: {}", e))
            } else {
                TransportError::Network(format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(parse_error_response(&body, status.as_u16()));
        }

        Ok(body)
    }
}

impl fmt::Debug for SqsTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqsTransport")
            .field("endpoint", &self.endpoint)
            .field("credentials", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Transport for SqsTransport {
    async fn send_batch(
        &self,
        queue_url: &QueueUrl,
        entries: &[BatchEntry],
    ) -> Result<BatchOutcome, TransportError> {
        let mut params = HashMap::new();
        params.insert("Action".to_string(), "SendMessageBatch".to_string());
        params.insert("Version".to_string(), SQS_API_VERSION.to_string());
        params.insert("QueueUrl".to_string(), queue_url.as_str().to_string());

        for (index, entry) in entries.iter().enumerate() {
            batch_entry_params(index, entry, &mut params);
        }

        let response = self.query(&params).await?;
        let failed = parse_batch_failures(&response)?;

        Ok(BatchOutcome { failed })
    }

    async fn queue_size(&self, queue_url: &QueueUrl) -> Result<u64, TransportError> {
        let mut params = HashMap::new();
        params.insert("Action".to_string(), "GetQueueAttributes".to_string());
        params.insert("Version".to_string(), SQS_API_VERSION.to_string());
        params.insert("QueueUrl".to_string(), queue_url.as_str().to_string());
        params.insert(
            "AttributeName.1".to_string(),
            "ApproximateNumberOfMessages".to_string(),
        );

        let response = self.query(&params).await?;
        let attributes = parse_attribute_response(&response)?;

        let count = attributes
            .get("ApproximateNumberOfMessages")
            .ok_or_else(|| {
                TransportError::Serialization(
                    "ApproximateNumberOfMessages not found in response".to_string(),
                )
            })?;

        count.parse::<u64>().map_err(|e| {
            TransportError::Serialization(format!(
                "ApproximateNumberOfMessages is not an integer: {}",
                e
            ))
        })
    }
}

// ============================================================================
// Wire Encoding
// ============================================================================

/// Encode one batch entry as `SendMessageBatchRequestEntry.N.*` parameters
///
/// Attribute keys are emitted in sorted order so requests are deterministic.
fn batch_entry_params(index: usize, entry: &BatchEntry, params: &mut HashMap<String, String>) {
    let prefix = format!("SendMessageBatchRequestEntry.{}", index + 1);

    if let Some(id) = &entry.id {
        params.insert(format!("{}.Id", prefix), id.clone());
    }
    params.insert(format!("{}.MessageBody", prefix), entry.body.clone());

    if let Some(delay_seconds) = entry.delay_seconds {
        params.insert(format!("{}.DelaySeconds", prefix), delay_seconds.to_string());
    }
    if let Some(group_id) = &entry.group_id {
        params.insert(format!("{}.MessageGroupId", prefix), group_id.clone());
    }
    if let Some(deduplication_id) = &entry.deduplication_id {
        params.insert(
            format!("{}.MessageDeduplicationId", prefix),
            deduplication_id.clone(),
        );
    }

    let mut keys: Vec<&String> = entry.message_attributes.keys().collect();
    keys.sort();
    for (attribute_index, key) in keys.into_iter().enumerate() {
        let attribute = &entry.message_attributes[key];
        let attribute_prefix = format!("{}.MessageAttribute.{}", prefix, attribute_index + 1);

        params.insert(format!("{}.Name", attribute_prefix), key.clone());
        params.insert(
            format!("{}.Value.DataType", attribute_prefix),
            attribute.data_type.clone(),
        );
        if let Some(value) = &attribute.string_value {
            params.insert(
                format!("{}.Value.StringValue", attribute_prefix),
                value.clone(),
            );
        }
        if let Some(value) = &attribute.binary_value {
            params.insert(
                format!("{}.Value.BinaryValue", attribute_prefix),
                STANDARD.encode(value),
            );
        }
    }
}

// ============================================================================
// Response Parsing
// ============================================================================

/// Parse `BatchResultErrorEntry` elements from a SendMessageBatch response
fn parse_batch_failures(xml: &str) -> Result<Vec<BatchFailure>, TransportError> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut failures = Vec::new();
    let mut in_entry = false;
    let mut current_field: Option<Vec<u8>> = None;
    let mut id: Option<String> = None;
    let mut code: Option<String> = None;
    let mut message: Option<String> = None;
    let mut sender_fault = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"BatchResultErrorEntry" => {
                    in_entry = true;
                    id = None;
                    code = None;
                    message = None;
                    sender_fault = false;
                }
                name @ (b"Id" | b"Code" | b"Message" | b"SenderFault") if in_entry => {
                    current_field = Some(name.to_vec());
                }
                _ => {}
            },
            Ok(Event::Text(e)) if in_entry => {
                let text = e.unescape().ok().map(|s| s.into_owned());
                match current_field.as_deref() {
                    Some(b"Id") => id = text,
                    Some(b"Code") => code = text,
                    Some(b"Message") => message = text,
                    Some(b"SenderFault") => {
                        sender_fault = text.as_deref() == Some("true");
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                if e.name().as_ref() == b"BatchResultErrorEntry" {
                    failures.push(BatchFailure {
                        id: id.take().unwrap_or_default(),
                        code: code.take().unwrap_or_default(),
                        message: message.take().unwrap_or_default(),
                        sender_fault,
                    });
                    in_entry = false;
                }
                current_field = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(TransportError::Serialization(format!(
                    "XML parsing error: {}",
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(failures)
}

/// Parse `Attribute` name/value pairs from a GetQueueAttributes response
fn parse_attribute_response(xml: &str) -> Result<HashMap<String, String>, TransportError> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut attributes = HashMap::new();
    let mut in_attribute = false;
    let mut current_field: Option<Vec<u8>> = None;
    let mut name: Option<String> = None;
    let mut value: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"Attribute" => {
                    in_attribute = true;
                    name = None;
                    value = None;
                }
                field @ (b"Name" | b"Value") if in_attribute => {
                    current_field = Some(field.to_vec());
                }
                _ => {}
            },
            Ok(Event::Text(e)) if in_attribute => {
                let text = e.unescape().ok().map(|s| s.into_owned());
                match current_field.as_deref() {
                    Some(b"Name") => name = text,
                    Some(b"Value") => value = text,
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                if e.name().as_ref() == b"Attribute" {
                    if let (Some(name), Some(value)) = (name.take(), value.take()) {
                        attributes.insert(name, value);
                    }
                    in_attribute = false;
                }
                current_field = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(TransportError::Serialization(format!(
                    "XML parsing error: {}",
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(attributes)
}

/// Map an SQS error response to a transport error
fn parse_error_response(xml: &str, status_code: u16) -> TransportError {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut error_code: Option<String> = None;
    let mut error_message: Option<String> = None;
    let mut in_error = false;
    let mut current_field: Option<Vec<u8>> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"Error" => in_error = true,
                field @ (b"Code" | b"Message") if in_error => {
                    current_field = Some(field.to_vec());
                }
                _ => {}
            },
            Ok(Event::Text(e)) if in_error => {
                let text = e.unescape().ok().map(|s| s.into_owned());
                match current_field.as_deref() {
                    Some(b"Code") => error_code = text,
                    Some(b"Message") => error_message = text,
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                if e.name().as_ref() == b"Error" {
                    in_error = false;
                }
                current_field = None;
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    let code = error_code.unwrap_or_else(|| "Unknown".to_string());
    let message = error_message.unwrap_or_else(|| "Unknown error".to_string());

    match code.as_str() {
        "AWS.SimpleQueueService.NonExistentQueue" | "QueueDoesNotExist" => {
            TransportError::QueueNotFound(message)
        }
        "InvalidClientTokenId" | "UnrecognizedClientException" | "SignatureDoesNotMatch" => {
            TransportError::Authentication(format!("{}: {}", code, message))
        }
        _ if status_code == 401 || status_code == 403 => {
            TransportError::Authentication(format!("{}: {}", code, message))
        }
        _ => TransportError::Service { code, message },
    }
}
