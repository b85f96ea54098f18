//! Domain status codes reported by the ledger and by this client.
//!
//! The numeric values are part of the wire contract: the server encodes them
//! into the binary status payload and into validation responses.

use serde::{Serialize, Serializer};
use std::fmt;

/// Closed set of ledger outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StatusCode {
    /// Request succeeded
    Ok = 200,
    /// Asset hash does not match its content
    InvalidHash = 300,
    /// Asset back-link hash does not match the previous age
    InvalidPrevHash = 301,
    /// Contract was tampered with or is otherwise invalid
    InvalidContract = 302,
    /// Contract output is inconsistent with the recorded state
    InvalidOutput = 303,
    /// Nonce was already used
    InvalidNonce = 304,
    /// Asset states are inconsistent between replicas
    InconsistentStates = 305,
    /// Request signature failed verification
    InvalidSignature = 400,
    /// Key could not be loaded
    UnloadableKey = 401,
    /// Contract could not be loaded
    UnloadableContract = 402,
    /// Certificate is not registered
    CertificateNotFound = 403,
    /// Contract is not registered
    ContractNotFound = 404,
    /// Certificate is already registered
    CertificateAlreadyRegistered = 405,
    /// Function is not registered
    FunctionNotFound = 406,
    /// Function could not be loaded
    UnloadableFunction = 407,
    /// Function is invalid
    InvalidFunction = 408,
    /// Contract is already registered
    ContractAlreadyRegistered = 409,
    /// Request is malformed
    InvalidRequest = 410,
    /// Contract raised a contextual error
    ContractContextualError = 411,
    /// Asset does not exist
    AssetNotFound = 412,
    /// Function is already registered
    FunctionAlreadyRegistered = 413,
    /// Caller is not authorized for the operation
    Unauthorized = 414,
    /// Server-side database failure
    DatabaseError = 500,
    /// The operation may or may not have taken effect on the ledger
    UnknownTransactionStatus = 501,
    /// Unexpected runtime failure
    RuntimeError = 502,
    /// Service is unavailable
    Unavailable = 503,
    /// Conflicting concurrent transaction
    Conflict = 504,
    /// Local misconfiguration or invalid input; never reaches the network
    ClientIoError = 600,
    /// Client-side database failure
    ClientDatabaseError = 601,
    /// Client-side runtime failure
    ClientRuntimeError = 602,
}

impl StatusCode {
    const ALL: [Self; 30] = [
        Self::Ok,
        Self::InvalidHash,
        Self::InvalidPrevHash,
        Self::InvalidContract,
        Self::InvalidOutput,
        Self::InvalidNonce,
        Self::InconsistentStates,
        Self::InvalidSignature,
        Self::UnloadableKey,
        Self::UnloadableContract,
        Self::CertificateNotFound,
        Self::ContractNotFound,
        Self::CertificateAlreadyRegistered,
        Self::FunctionNotFound,
        Self::UnloadableFunction,
        Self::InvalidFunction,
        Self::ContractAlreadyRegistered,
        Self::InvalidRequest,
        Self::ContractContextualError,
        Self::AssetNotFound,
        Self::FunctionAlreadyRegistered,
        Self::Unauthorized,
        Self::DatabaseError,
        Self::UnknownTransactionStatus,
        Self::RuntimeError,
        Self::Unavailable,
        Self::Conflict,
        Self::ClientIoError,
        Self::ClientDatabaseError,
        Self::ClientRuntimeError,
    ];

    /// Every status code, in wire order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &Self::ALL
    }

    /// Numeric wire value.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Look up a status code by its numeric wire value.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.code() == code)
    }

    /// Canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::InvalidHash => "INVALID_HASH",
            Self::InvalidPrevHash => "INVALID_PREV_HASH",
            Self::InvalidContract => "INVALID_CONTRACT",
            Self::InvalidOutput => "INVALID_OUTPUT",
            Self::InvalidNonce => "INVALID_NONCE",
            Self::InconsistentStates => "INCONSISTENT_STATES",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::UnloadableKey => "UNLOADABLE_KEY",
            Self::UnloadableContract => "UNLOADABLE_CONTRACT",
            Self::CertificateNotFound => "CERTIFICATE_NOT_FOUND",
            Self::ContractNotFound => "CONTRACT_NOT_FOUND",
            Self::CertificateAlreadyRegistered => "CERTIFICATE_ALREADY_REGISTERED",
            Self::FunctionNotFound => "FUNCTION_NOT_FOUND",
            Self::UnloadableFunction => "UNLOADABLE_FUNCTION",
            Self::InvalidFunction => "INVALID_FUNCTION",
            Self::ContractAlreadyRegistered => "CONTRACT_ALREADY_REGISTERED",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::ContractContextualError => "CONTRACT_CONTEXTUAL_ERROR",
            Self::AssetNotFound => "ASSET_NOT_FOUND",
            Self::FunctionAlreadyRegistered => "FUNCTION_ALREADY_REGISTERED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::UnknownTransactionStatus => "UNKNOWN_TRANSACTION_STATUS",
            Self::RuntimeError => "RUNTIME_ERROR",
            Self::Unavailable => "UNAVAILABLE",
            Self::Conflict => "CONFLICT",
            Self::ClientIoError => "CLIENT_IO_ERROR",
            Self::ClientDatabaseError => "CLIENT_DATABASE_ERROR",
            Self::ClientRuntimeError => "CLIENT_RUNTIME_ERROR",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatusCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_lookup_matches_every_variant() {
        for status in StatusCode::all() {
            assert_eq!(StatusCode::from_code(status.code()), Some(*status));
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(StatusCode::from_code(0), None);
        assert_eq!(StatusCode::from_code(999), None);
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(StatusCode::Ok.code(), 200);
        assert_eq!(StatusCode::UnknownTransactionStatus.code(), 501);
        assert_eq!(StatusCode::ClientIoError.code(), 600);
    }

    #[test]
    fn test_display() {
        assert_eq!(StatusCode::Unauthorized.to_string(), "UNAUTHORIZED");
        assert_eq!(
            StatusCode::CertificateAlreadyRegistered.to_string(),
            "CERTIFICATE_ALREADY_REGISTERED"
        );
    }

    #[test]
    fn test_serializes_as_name() {
        let json = serde_json::to_string(&StatusCode::InvalidNonce).unwrap();
        assert_eq!(json, "\"INVALID_NONCE\"");
    }
}
