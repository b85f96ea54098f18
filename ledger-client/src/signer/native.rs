//! Native-process signing backend.

use super::key::load_key_pair;
use super::{SignatureSigner, SignerError};
use async_trait::async_trait;
use ring::rand::SystemRandom;
use ring::signature::ECDSA_P256_SHA256_ASN1_SIGNING;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// ECDSA P-256/SHA-256 signer producing ASN.1 DER signatures.
///
/// The key is parsed on every call; a malformed key surfaces as a
/// [`SignerError`] from [`SignatureSigner::sign`] rather than at construction.
#[derive(Debug)]
pub struct NativeSigner {
    private_key_pem: SecretString,
    rng: SystemRandom,
}

impl NativeSigner {
    /// Create a signer over a SEC1 or PKCS#8 PEM private key.
    #[must_use]
    pub fn new(private_key_pem: SecretString) -> Self {
        Self {
            private_key_pem,
            rng: SystemRandom::new(),
        }
    }
}

#[async_trait]
impl SignatureSigner for NativeSigner {
    async fn sign(&self, content: &[u8]) -> Result<Vec<u8>, SignerError> {
        let key_pair = load_key_pair(
            self.private_key_pem.expose_secret(),
            &ECDSA_P256_SHA256_ASN1_SIGNING,
            &self.rng,
        )?;
        let signature = key_pair
            .sign(&self.rng, content)
            .map_err(|e| SignerError::signing(e.to_string()))?;
        debug!(content_len = content.len(), "Signed request content");
        Ok(signature.as_ref().to_vec())
    }
}
