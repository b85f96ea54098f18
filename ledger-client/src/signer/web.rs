//! Browser signing backend.
//!
//! Mirrors what the WebCrypto `subtle.sign({name: "ECDSA", hash: "SHA-256"})`
//! call produces: the key is imported as PKCS#8 and the signature is the
//! fixed-width IEEE P1363 `r || s` encoding instead of DER.

use super::key::load_key_pair;
use super::{SignatureSigner, SignerError};
use async_trait::async_trait;
use ring::rand::SystemRandom;
use ring::signature::ECDSA_P256_SHA256_FIXED_SIGNING;
use secrecy::{ExposeSecret, SecretString};

/// Length of a P-256 `r || s` signature.
pub const FIXED_SIGNATURE_LEN: usize = 64;

/// ECDSA P-256/SHA-256 signer producing fixed-width signatures.
#[derive(Debug)]
pub struct WebCryptoSigner {
    private_key_pem: SecretString,
    rng: SystemRandom,
}

impl WebCryptoSigner {
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
impl SignatureSigner for WebCryptoSigner {
    async fn sign(&self, content: &[u8]) -> Result<Vec<u8>, SignerError> {
        let key_pair = load_key_pair(
            self.private_key_pem.expose_secret(),
            &ECDSA_P256_SHA256_FIXED_SIGNING,
            &self.rng,
        )?;
        key_pair
            .sign(&self.rng, content)
            .map(|signature| signature.as_ref().to_vec())
            .map_err(|e| SignerError::signing(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ring::signature::{ECDSA_P256_SHA256_FIXED, KeyPair, UnparsedPublicKey};

    const SEC1_PEM: &str = include_str!("../../../test-utils/fixtures/client-key.pem");

    #[tokio::test]
    async fn test_fixed_signature_verifies() {
        let signer = WebCryptoSigner::new(SecretString::from(SEC1_PEM.to_string()));
        let signature = signer.sign(b"Content").await.unwrap();
        assert_eq!(signature.len(), FIXED_SIGNATURE_LEN);

        let key_pair =
            load_key_pair(SEC1_PEM, &ECDSA_P256_SHA256_FIXED_SIGNING, &SystemRandom::new())
                .unwrap();
        let verifier =
            UnparsedPublicKey::new(&ECDSA_P256_SHA256_FIXED, key_pair.public_key().as_ref());
        assert!(verifier.verify(b"Content", &signature).is_ok());
    }

    #[tokio::test]
    async fn test_incorrect_pem() {
        let signer = WebCryptoSigner::new(SecretString::from("incorrect pem".to_string()));
        let err = signer.sign(b"content").await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to load private key"));
    }
}
