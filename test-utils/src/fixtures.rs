//! Test fixtures with sample data.
//!
//! Key material is a throwaway P-256 key pair with a self-signed certificate
//! for holder `foo`. It protects nothing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ledger_client::config::{
    CERT_HOLDER_ID, CERT_PEM, CERT_VERSION, PRIVATE_KEY_PEM, SERVER_HOST, SERVER_PORT,
};
use ledger_client::proto::Status;
use ledger_client::translator::BINARY_STATUS_KEY;
use ledger_client::{ClientConfig, FailureMetadata, StatusCode, TransportError};
use prost::Message;
use serde_json::{Value, json};
use std::collections::HashMap;
use tonic::metadata::{MetadataMap, MetadataValue};

/// SEC1 (`EC PRIVATE KEY`) PEM of the sample key.
pub const CLIENT_KEY_PEM: &str = include_str!("../fixtures/client-key.pem");

/// PKCS#8 (`PRIVATE KEY`) PEM of the same key.
pub const CLIENT_KEY_PKCS8_PEM: &str = include_str!("../fixtures/client-key-pkcs8.pem");

/// Self-signed certificate of the sample key.
pub const CLIENT_CERT_PEM: &str = include_str!("../fixtures/client-cert.pem");

/// An unrelated P-256 key.
pub const OTHER_KEY_PEM: &str = include_str!("../fixtures/other-key.pem");

/// Uncompressed public point of the sample key, base64.
pub const CLIENT_PUBLIC_KEY_BASE64: &str =
    "BCj6NdUFUqXtr2+Kt09m+FlTJBDAdnj+0Hw4gtHh//mmlNOi8F3nadU8rRAyiX2N2/KuhRbp3ElCcl2WJ3CRzFI=";

/// Holder id the sample certificate is issued to.
pub const CERT_HOLDER: &str = "foo";

/// Uncompressed public point of the sample key.
#[must_use]
pub fn client_public_key() -> Vec<u8> {
    STANDARD
        .decode(CLIENT_PUBLIC_KEY_BASE64)
        .unwrap_or_default()
}

/// Configuration for the sample identity with default endpoints.
#[must_use]
pub fn client_config() -> ClientConfig {
    ClientConfig::new(CERT_HOLDER, CLIENT_CERT_PEM, CLIENT_KEY_PEM)
}

/// Property map describing the sample identity.
#[must_use]
pub fn client_properties() -> Value {
    json!({
        SERVER_HOST.property: "ledger.example.com",
        SERVER_PORT.property: 60051,
        PRIVATE_KEY_PEM.property: CLIENT_KEY_PEM,
        CERT_PEM.property: CLIENT_CERT_PEM,
        CERT_HOLDER_ID.property: CERT_HOLDER,
        CERT_VERSION.property: 2,
    })
}

/// Encoded binary status payload.
#[must_use]
pub fn status_payload(code: StatusCode, message: &str) -> Vec<u8> {
    Status {
        code: code.code(),
        message: message.to_string(),
    }
    .encode_to_vec()
}

/// Transport failure carrying a status in native header metadata.
#[must_use]
pub fn header_status_error(code: StatusCode, message: &str) -> TransportError {
    let mut map = MetadataMap::new();
    map.insert_bin(
        BINARY_STATUS_KEY,
        MetadataValue::from_bytes(&status_payload(code, message)),
    );
    TransportError::new(tonic::Code::Internal, "server reported a failure")
        .with_metadata(FailureMetadata::Headers(map))
}

/// Transport failure carrying a status in browser dictionary metadata.
#[must_use]
pub fn dictionary_status_error(code: StatusCode, message: &str) -> TransportError {
    let mut entries = HashMap::new();
    entries.insert(
        BINARY_STATUS_KEY.to_string(),
        STANDARD.encode(status_payload(code, message)),
    );
    TransportError::new(tonic::Code::Internal, "server reported a failure")
        .with_metadata(FailureMetadata::Dictionary(entries))
}
