//! Request signing backends.
//!
//! Callers depend only on [`SignatureSigner`]; the concrete backend is picked
//! once from the [`Runtime`] and shared for the lifetime of a client.

mod key;
mod native;
mod web;

pub use native::NativeSigner;
pub use web::WebCryptoSigner;

use crate::runtime::Runtime;
use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;

/// Signing failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// The private key could not be loaded
    #[error("Failed to load private key: {0}")]
    InvalidKey(String),

    /// The signing primitive failed
    #[error("Failed to sign the request: {0}")]
    Signing(String),
}

impl SignerError {
    /// Create an invalid key error.
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Create a signing error.
    #[must_use]
    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }
}

/// Signs canonical request bytes with the caller's private key.
#[async_trait]
pub trait SignatureSigner: Send + Sync {
    /// Sign `content` and return the encoded ECDSA signature.
    async fn sign(&self, content: &[u8]) -> Result<Vec<u8>, SignerError>;
}

/// Pick the signing backend for `runtime`.
#[must_use]
pub fn signer_for(runtime: Runtime, private_key_pem: SecretString) -> Arc<dyn SignatureSigner> {
    match runtime {
        Runtime::Native => Arc::new(NativeSigner::new(private_key_pem)),
        Runtime::Browser => Arc::new(WebCryptoSigner::new(private_key_pem)),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{SignatureSigner, SignerError};
    use async_trait::async_trait;

    /// Deterministic signer that records nothing and returns a fixed prefix
    /// plus the content length.
    pub struct FixedSigner;

    #[async_trait]
    impl SignatureSigner for FixedSigner {
        async fn sign(&self, content: &[u8]) -> Result<Vec<u8>, SignerError> {
            let mut signature = b"sig:".to_vec();
            signature.extend_from_slice(&(content.len() as u32).to_be_bytes());
            Ok(signature)
        }
    }

    /// Signer that always fails.
    pub struct FailingSigner;

    #[async_trait]
    impl SignatureSigner for FailingSigner {
        async fn sign(&self, _content: &[u8]) -> Result<Vec<u8>, SignerError> {
            Err(SignerError::invalid_key("unsupported PKCS#1/5 hexadecimal key"))
        }
    }
}
