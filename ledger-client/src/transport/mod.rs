//! Transport contract between the client and the ledger services.
//!
//! Stubs are callback based: every method takes the request, the call
//! metadata and a one-shot [`Callback`] that receives the outcome. The
//! [`invoke`] adapter turns such a call into a future.
//!
//! Native targets get the `tonic` stub. Browser builds bring their own stub,
//! typically over gRPC-Web.

#[cfg(not(target_arch = "wasm32"))]
mod grpc;
mod invoker;

#[cfg(not(target_arch = "wasm32"))]
pub use grpc::GrpcLedgerStub;
pub use invoker::invoke;

use crate::proto::{
    CertificateRegistrationRequest, ContractExecutionRequest, ContractExecutionResponse,
    ContractRegistrationRequest, ContractsListingRequest, ContractsListingResponse,
    FunctionRegistrationRequest, LedgerValidationRequest, LedgerValidationResponse,
};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tonic::metadata::{Ascii, MetadataMap, MetadataValue};

/// Metadata key carrying the bearer credential.
pub const AUTHORIZATION_KEY: &str = "authorization";

/// Completion handler passed to a stub. Called at most once.
pub type Callback<T> = Box<dyn FnOnce(Result<T, TransportError>) + Send>;

/// Metadata attached to a failed call, in the shape the host transport uses.
#[derive(Debug, Clone)]
pub enum FailureMetadata {
    /// Native header collection; binary values are read with `get_all_bin`.
    Headers(MetadataMap),
    /// Flat dictionary of browser transports; binary values are base64 text.
    Dictionary(HashMap<String, String>),
}

/// A failed remote call as reported by the transport.
#[derive(Error, Debug, Clone)]
#[error("transport error ({code:?}): {message}")]
pub struct TransportError {
    /// Transport status code
    pub code: tonic::Code,
    /// Transport message
    pub message: String,
    /// Trailing metadata of the failure, if any
    pub metadata: Option<FailureMetadata>,
}

impl TransportError {
    /// Create an error without metadata.
    #[must_use]
    pub fn new(code: tonic::Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            metadata: None,
        }
    }

    /// Attach failure metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: FailureMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The stub dropped its callback without reporting an outcome.
    #[must_use]
    pub fn dropped() -> Self {
        Self::new(
            tonic::Code::Unknown,
            "transport dropped the call without completing it",
        )
    }
}

impl From<tonic::Status> for TransportError {
    fn from(status: tonic::Status) -> Self {
        let error = Self::new(status.code(), status.message());
        if status.metadata().is_empty() {
            error
        } else {
            error.with_metadata(FailureMetadata::Headers(status.metadata().clone()))
        }
    }
}

/// Per-call metadata sent with every request.
#[derive(Clone, Default)]
pub struct CallMetadata {
    authorization: Option<SecretString>,
}

impl CallMetadata {
    /// Metadata with no entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `credential` as the `authorization` entry.
    #[must_use]
    pub fn with_authorization(mut self, credential: SecretString) -> Self {
        self.authorization = Some(credential);
        self
    }

    /// The bearer credential, if configured.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Copy the entries into a gRPC metadata map.
    ///
    /// # Errors
    ///
    /// Fails if the credential is not a valid ASCII header value.
    pub fn apply_to(&self, map: &mut MetadataMap) -> Result<(), TransportError> {
        if let Some(credential) = self.authorization() {
            let value = MetadataValue::<Ascii>::try_from(credential).map_err(|_| {
                TransportError::new(
                    tonic::Code::InvalidArgument,
                    "authorization credential is not a valid header value",
                )
            })?;
            map.insert(AUTHORIZATION_KEY, value);
        }
        Ok(())
    }
}

impl fmt::Debug for CallMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallMetadata")
            .field(
                "authorization",
                &self.authorization.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Stub of the regular ledger service.
pub trait LedgerStub: Send + Sync {
    /// Register a contract.
    fn register_contract(
        &self,
        request: ContractRegistrationRequest,
        metadata: &CallMetadata,
        callback: Callback<()>,
    );

    /// List registered contracts.
    fn list_contracts(
        &self,
        request: ContractsListingRequest,
        metadata: &CallMetadata,
        callback: Callback<ContractsListingResponse>,
    );

    /// Validate the ledger, or one asset of it.
    fn validate_ledger(
        &self,
        request: LedgerValidationRequest,
        metadata: &CallMetadata,
        callback: Callback<LedgerValidationResponse>,
    );

    /// Execute a contract.
    fn execute_contract(
        &self,
        request: ContractExecutionRequest,
        metadata: &CallMetadata,
        callback: Callback<ContractExecutionResponse>,
    );
}

/// Stub of the privileged ledger service.
pub trait LedgerPrivilegedStub: Send + Sync {
    /// Register a certificate.
    fn register_cert(
        &self,
        request: CertificateRegistrationRequest,
        metadata: &CallMetadata,
        callback: Callback<()>,
    );

    /// Register a function.
    fn register_function(
        &self,
        request: FunctionRegistrationRequest,
        metadata: &CallMetadata,
        callback: Callback<()>,
    );
}
