//! Private key loading.
//!
//! `ring` only imports EC keys as PKCS#8, while ledger identities are usually
//! issued as SEC1 (`EC PRIVATE KEY`) PEM. SEC1 documents are wrapped into a
//! PKCS#8 `PrivateKeyInfo` for the P-256 curve before import.

use super::SignerError;
use ring::rand::SystemRandom;
use ring::signature::{EcdsaKeyPair, EcdsaSigningAlgorithm};
use zeroize::Zeroizing;

const SEC1_LABEL: &str = "EC PRIVATE KEY";
const PKCS8_LABEL: &str = "PRIVATE KEY";

/// DER of `version INTEGER 0` followed by the `AlgorithmIdentifier`
/// `{ id-ecPublicKey, prime256v1 }`.
const PKCS8_P256_PREFIX: [u8; 24] = [
    0x02, 0x01, 0x00, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06,
    0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07,
];

const DER_SEQUENCE: u8 = 0x30;
const DER_OCTET_STRING: u8 = 0x04;

/// Parse a PEM private key into an ECDSA key pair for `algorithm`.
pub(crate) fn load_key_pair(
    pem_text: &str,
    algorithm: &'static EcdsaSigningAlgorithm,
    rng: &SystemRandom,
) -> Result<EcdsaKeyPair, SignerError> {
    let pkcs8 = pkcs8_der(pem_text)?;
    EcdsaKeyPair::from_pkcs8(algorithm, &pkcs8, rng)
        .map_err(|e| SignerError::invalid_key(format!("not a P-256 EC private key ({e})")))
}

fn pkcs8_der(pem_text: &str) -> Result<Zeroizing<Vec<u8>>, SignerError> {
    let document = pem::parse(pem_text).map_err(|e| SignerError::invalid_key(e.to_string()))?;
    let contents = Zeroizing::new(document.contents().to_vec());

    match document.tag() {
        PKCS8_LABEL => Ok(contents),
        SEC1_LABEL => Ok(wrap_sec1(&contents)),
        other => Err(SignerError::invalid_key(format!(
            "unsupported PEM label '{other}'"
        ))),
    }
}

/// Wrap a SEC1 `ECPrivateKey` into a PKCS#8 `PrivateKeyInfo`.
fn wrap_sec1(sec1: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut octet_string = Zeroizing::new(Vec::with_capacity(sec1.len() + 4));
    octet_string.push(DER_OCTET_STRING);
    push_der_length(&mut octet_string, sec1.len());
    octet_string.extend_from_slice(sec1);

    let body_len = PKCS8_P256_PREFIX.len() + octet_string.len();
    let mut der = Zeroizing::new(Vec::with_capacity(body_len + 4));
    der.push(DER_SEQUENCE);
    push_der_length(&mut der, body_len);
    der.extend_from_slice(&PKCS8_P256_PREFIX);
    der.extend_from_slice(&octet_string);
    der
}

#[allow(clippy::cast_possible_truncation)]
fn push_der_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        // Short form.
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count();
    let significant = &bytes[skip..];
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(significant);
}
