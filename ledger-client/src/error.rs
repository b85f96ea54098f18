//! Public error type for ledger client operations.
//!
//! Every failure that crosses the public API is a [`ClientError`] carrying a
//! [`StatusCode`] and a message. Internal failures (signing, request building,
//! transport) convert into it at the service boundary.

use crate::status::StatusCode;
use thiserror::Error;

/// Error surfaced by every public client operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ClientError {
    code: StatusCode,
    message: String,
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Create an error with an explicit status code.
    #[must_use]
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Local misconfiguration or invalid input.
    #[must_use]
    pub fn client_io(message: impl Into<String>) -> Self {
        Self::new(StatusCode::ClientIoError, message)
    }

    /// Failure while building or signing a request.
    #[must_use]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(StatusCode::RuntimeError, message)
    }

    /// The transport failed and no status could be recovered.
    #[must_use]
    pub fn unknown_status(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UnknownTransactionStatus, message)
    }

    /// Status code of this error.
    #[must_use]
    pub const fn code(&self) -> StatusCode {
        self.code
    }

    /// Human readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the request may have been applied on the ledger anyway.
    ///
    /// Only `UNKNOWN_TRANSACTION_STATUS` leaves the outcome open. Every other
    /// code is a definite answer, though not one a plain retry can change.
    #[must_use]
    pub const fn may_have_taken_effect(&self) -> bool {
        matches!(self.code, StatusCode::UnknownTransactionStatus)
    }
}
