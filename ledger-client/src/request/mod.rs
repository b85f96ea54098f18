//! Signed request construction.
//!
//! Each ledger operation has a builder that collects its fields, lays the
//! signed subset out in a fixed order and signs it. The server rebuilds the
//! same byte sequence to verify the signature, so field order per operation
//! is part of the wire contract.

mod builder;

pub use builder::{
    CertificateRegistrationRequestBuilder, ContractExecutionRequestBuilder,
    ContractRegistrationRequestBuilder, ContractsListingRequestBuilder,
    FunctionRegistrationRequestBuilder, LedgerValidationRequestBuilder, NONCE_KEY,
};

use crate::error::ClientError;
use crate::signer::SignerError;
use thiserror::Error;

/// Failure to build a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A required builder field was never set
    #[error("required field '{0}' is not set")]
    MissingField(&'static str),

    /// Signing the canonical bytes failed
    #[error(transparent)]
    Signing(#[from] SignerError),
}

impl From<BuildError> for ClientError {
    fn from(err: BuildError) -> Self {
        Self::runtime(err.to_string())
    }
}

/// Accumulates the canonical byte sequence of a request.
#[derive(Debug, Default)]
pub(crate) struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a UTF-8 string; absent strings contribute nothing.
    pub(crate) fn string(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.0.extend_from_slice(value.as_bytes());
        }
        self
    }

    pub(crate) fn bytes(mut self, value: &[u8]) -> Self {
        self.0.extend_from_slice(value);
        self
    }

    /// Append a 32-bit big-endian integer.
    pub(crate) fn u32(mut self, value: u32) -> Self {
        self.0.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub(crate) fn into_vec(self) -> Vec<u8> {
        self.0
    }
}
