//! Client library for a certificate-authenticated ledger service.
//!
//! This crate provides:
//! - Configuration from property maps or environment variables
//! - Request signing with ECDSA P-256, DER or fixed-width encoded per runtime
//! - Signed request builders for every ledger operation
//! - Adaptation of callback-style transport stubs into futures
//! - Translation of binary status metadata into typed errors
//! - A gRPC transport over `tonic` on native targets
//! - Optional log output scoped to the client target

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod identity;
pub mod proto;
pub mod request;
pub mod result;
pub mod runtime;
pub mod service;
pub mod signer;
pub mod status;
pub mod telemetry;
pub mod translator;
pub mod transport;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use identity::IdentityContext;
pub use result::{AssetProof, ContractExecutionResult, LedgerValidationResult};
pub use runtime::Runtime;
pub use service::ClientService;
pub use signer::{SignatureSigner, SignerError};
pub use status::StatusCode;
pub use telemetry::{CLIENT_TARGET, LogFormat, init_tracing};
pub use translator::StatusTranslator;
#[cfg(not(target_arch = "wasm32"))]
pub use transport::GrpcLedgerStub;
pub use transport::{
    CallMetadata, Callback, FailureMetadata, LedgerPrivilegedStub, LedgerStub, TransportError,
};
