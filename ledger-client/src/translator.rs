//! Translation of transport failures into [`ClientError`].
//!
//! The ledger reports its domain status as a protobuf `Status` message in
//! the failure metadata under [`BINARY_STATUS_KEY`]. How that entry is stored
//! depends on the host transport, so reading it goes through a
//! [`FailureMetadataReader`] chosen once per runtime.

use crate::error::ClientError;
use crate::proto;
use crate::runtime::Runtime;
use crate::status::StatusCode;
use crate::transport::{FailureMetadata, TransportError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use prost::Message;
use tracing::{debug, warn};

/// Metadata key of the binary status payload.
pub const BINARY_STATUS_KEY: &str = "rpc.status-bin";

/// Reads the raw binary status payload out of failure metadata.
pub trait FailureMetadataReader: Send + Sync {
    /// The payload bytes, or `None` when the metadata holds no usable entry.
    fn read_status(&self, metadata: &FailureMetadata) -> Option<Vec<u8>>;
}

/// Reader for native header collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderMetadataReader;

impl FailureMetadataReader for HeaderMetadataReader {
    fn read_status(&self, metadata: &FailureMetadata) -> Option<Vec<u8>> {
        let FailureMetadata::Headers(map) = metadata else {
            return None;
        };
        let mut values = map.get_all_bin(BINARY_STATUS_KEY).iter();
        let value = values.next()?;
        if values.next().is_some() {
            debug!("Ignoring failure metadata with several status entries");
            return None;
        }
        value
            .to_bytes()
            .ok()
            .filter(|bytes| !bytes.is_empty())
            .map(|bytes| bytes.to_vec())
    }
}

/// Reader for flat string dictionaries whose binary entries are base64.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryMetadataReader;

impl FailureMetadataReader for DictionaryMetadataReader {
    fn read_status(&self, metadata: &FailureMetadata) -> Option<Vec<u8>> {
        let FailureMetadata::Dictionary(entries) = metadata else {
            return None;
        };
        let encoded = entries.get(BINARY_STATUS_KEY)?.trim();
        if encoded.is_empty() {
            return None;
        }
        STANDARD_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .ok()
            .filter(|bytes| !bytes.is_empty())
    }
}

/// Converts a [`TransportError`] into the domain error it carries.
pub struct StatusTranslator {
    reader: Box<dyn FailureMetadataReader>,
}

impl StatusTranslator {
    /// Translator reading with `reader`.
    #[must_use]
    pub fn new(reader: Box<dyn FailureMetadataReader>) -> Self {
        Self { reader }
    }

    /// Translator for the metadata shape of `runtime`.
    #[must_use]
    pub fn for_runtime(runtime: Runtime) -> Self {
        match runtime {
            Runtime::Native => Self::new(Box::new(HeaderMetadataReader)),
            Runtime::Browser => Self::new(Box::new(DictionaryMetadataReader)),
        }
    }

    /// Translate `error`.
    ///
    /// A decodable status becomes an error with its code and message. Anything
    /// else becomes `UNKNOWN_TRANSACTION_STATUS` with the transport message.
    #[must_use]
    pub fn translate(&self, error: &TransportError) -> ClientError {
        match self.decode(error) {
            Some(status) => match StatusCode::from_code(status.code) {
                Some(code) => ClientError::new(code, status.message),
                None => {
                    warn!(code = status.code, "Server reported an unrecognized status code");
                    ClientError::unknown_status(status.message)
                }
            },
            None => ClientError::unknown_status(error.message.clone()),
        }
    }

    fn decode(&self, error: &TransportError) -> Option<proto::Status> {
        let bytes = self.reader.read_status(error.metadata.as_ref()?)?;
        match proto::Status::decode(bytes.as_slice()) {
            Ok(status) => Some(status),
            Err(e) => {
                warn!(error = %e, "Failed to decode binary status payload");
                None
            }
        }
    }
}

impl std::fmt::Debug for StatusTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusTranslator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use std::collections::HashMap;
    use tonic::metadata::{MetadataMap, MetadataValue};

    fn payload(code: i32, message: &str) -> Vec<u8> {
        proto::Status {
            code,
            message: message.to_string(),
        }
        .encode_to_vec()
    }

    fn headers(values: &[Vec<u8>]) -> FailureMetadata {
        let mut map = MetadataMap::new();
        for value in values {
            map.append_bin(BINARY_STATUS_KEY, MetadataValue::from_bytes(value));
        }
        FailureMetadata::Headers(map)
    }

    fn dictionary(value: &str) -> FailureMetadata {
        let mut entries = HashMap::new();
        entries.insert(BINARY_STATUS_KEY.to_string(), value.to_string());
        FailureMetadata::Dictionary(entries)
    }

    fn failure(metadata: Option<FailureMetadata>) -> TransportError {
        let error = TransportError::new(tonic::Code::Internal, "transport failed");
        match metadata {
            Some(metadata) => error.with_metadata(metadata),
            None => error,
        }
    }

    #[test]
    fn test_no_metadata_is_unknown_status() {
        let err = StatusTranslator::for_runtime(Runtime::Native).translate(&failure(None));
        assert_eq!(err.code(), StatusCode::UnknownTransactionStatus);
        assert_eq!(err.message(), "transport failed");
    }

    #[test]
    fn test_header_status_is_decoded() {
        let error = failure(Some(headers(&[payload(414, "bad cert")])));
        let err = StatusTranslator::for_runtime(Runtime::Native).translate(&error);
        assert_eq!(err, ClientError::new(StatusCode::Unauthorized, "bad cert"));
    }

    #[test]
    fn test_dictionary_status_is_decoded() {
        let encoded = STANDARD.encode(payload(404, "no such contract"));
        let error = failure(Some(dictionary(&encoded)));
        let err = StatusTranslator::for_runtime(Runtime::Browser).translate(&error);
        assert_eq!(
            err,
            ClientError::new(StatusCode::ContractNotFound, "no such contract")
        );
    }

    #[test]
    fn test_dictionary_accepts_unpadded_base64() {
        let encoded = STANDARD_NO_PAD.encode(payload(504, "conflict"));
        let bytes = DictionaryMetadataReader.read_status(&dictionary(&encoded));
        assert_eq!(bytes, Some(payload(504, "conflict")));
    }

    #[test]
    fn test_mismatched_shape_yields_nothing() {
        let encoded = STANDARD.encode(payload(414, "bad cert"));
        assert!(HeaderMetadataReader.read_status(&dictionary(&encoded)).is_none());
        assert!(
            DictionaryMetadataReader
                .read_status(&headers(&[payload(414, "bad cert")]))
                .is_none()
        );

        let error = failure(Some(dictionary(&encoded)));
        let err = StatusTranslator::for_runtime(Runtime::Native).translate(&error);
        assert_eq!(err.code(), StatusCode::UnknownTransactionStatus);
    }

    #[test]
    fn test_several_header_values_yield_nothing() {
        let metadata = headers(&[payload(414, "a"), payload(404, "b")]);
        assert!(HeaderMetadataReader.read_status(&metadata).is_none());
    }

    #[test]
    fn test_undecodable_base64_yields_nothing() {
        assert!(
            DictionaryMetadataReader
                .read_status(&dictionary("not base64 !!"))
                .is_none()
        );
    }

    #[test]
    fn test_empty_status_entry_keeps_transport_message() {
        assert!(DictionaryMetadataReader.read_status(&dictionary("")).is_none());
        assert!(DictionaryMetadataReader.read_status(&dictionary("==")).is_none());
        assert!(HeaderMetadataReader.read_status(&headers(&[Vec::new()])).is_none());

        let err = StatusTranslator::for_runtime(Runtime::Browser)
            .translate(&failure(Some(dictionary(""))));
        assert_eq!(err.code(), StatusCode::UnknownTransactionStatus);
        assert_eq!(err.message(), "transport failed");

        let err = StatusTranslator::for_runtime(Runtime::Native)
            .translate(&failure(Some(headers(&[Vec::new()]))));
        assert_eq!(err.code(), StatusCode::UnknownTransactionStatus);
        assert_eq!(err.message(), "transport failed");
    }

    #[test]
    fn test_undecodable_payload_is_unknown_status() {
        let error = failure(Some(headers(&[vec![0xff, 0xff, 0xff]])));
        let err = StatusTranslator::for_runtime(Runtime::Native).translate(&error);
        assert_eq!(err.code(), StatusCode::UnknownTransactionStatus);
        assert_eq!(err.message(), "transport failed");
    }

    #[test]
    fn test_unrecognized_code_is_unknown_status() {
        let error = failure(Some(headers(&[payload(999, "mystery")])));
        let err = StatusTranslator::for_runtime(Runtime::Native).translate(&error);
        assert_eq!(err.code(), StatusCode::UnknownTransactionStatus);
        assert_eq!(err.message(), "mystery");
    }
}
