//! Property-based tests for request signing and status translation.

use ledger_client::request::{
    ContractExecutionRequestBuilder, ContractRegistrationRequestBuilder,
    LedgerValidationRequestBuilder,
};
use ledger_client::signer::{NativeSigner, SignatureSigner, WebCryptoSigner};
use ledger_client::{Runtime, StatusCode, StatusTranslator};
use ledger_test_utils::fixtures::{
    CLIENT_KEY_PEM, OTHER_KEY_PEM, client_public_key, dictionary_status_error, header_status_error,
};
use ledger_test_utils::{
    binary_name_strategy, byte_code_strategy, cert_version_strategy, id_strategy,
    json_object_strategy, status_code_strategy,
};
use proptest::prelude::*;
use ring::signature::{ECDSA_P256_SHA256_ASN1, ECDSA_P256_SHA256_FIXED, UnparsedPublicKey};
use secrecy::SecretString;

fn native_signer() -> NativeSigner {
    NativeSigner::new(SecretString::from(CLIENT_KEY_PEM.to_string()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Canonical bytes depend only on the builder inputs.
    #[test]
    fn prop_registration_bytes_are_deterministic(
        id in id_strategy(),
        name in binary_name_strategy(),
        byte_code in byte_code_strategy(),
        version in cert_version_strategy(),
    ) {
        let signer = native_signer();
        let build = || {
            ContractRegistrationRequestBuilder::new(&signer)
                .with_contract_id(id.clone())
                .with_contract_binary_name(name.clone())
                .with_contract_byte_code(byte_code.clone())
                .with_cert_holder_id("foo")
                .with_cert_version(version)
                .canonical_bytes()
                .unwrap()
        };
        let bytes = build();
        prop_assert_eq!(&bytes, &build());
        prop_assert!(bytes.ends_with(&version.to_be_bytes()));
    }

    /// Execution bytes are fixed for a fixed nonce and change with it.
    #[test]
    fn prop_execution_bytes_follow_nonce(
        id in id_strategy(),
        argument in json_object_strategy(),
        nonce in 0_u64..u64::MAX / 2,
    ) {
        let signer = native_signer();
        let bytes_for = |nonce: u64| {
            ContractExecutionRequestBuilder::new(&signer)
                .with_contract_id(id.clone())
                .with_contract_argument_and_nonce(argument.clone(), nonce.to_string())
                .with_cert_holder_id("foo")
                .canonical_bytes()
                .unwrap()
        };
        prop_assert_eq!(bytes_for(nonce), bytes_for(nonce));
        prop_assert_ne!(bytes_for(nonce), bytes_for(nonce + 1));
    }

    /// Any status survives translation from either metadata shape.
    #[test]
    fn prop_status_translation_roundtrip(
        code in status_code_strategy(),
        message in "[ -~]{0,40}",
    ) {
        let native = StatusTranslator::for_runtime(Runtime::Native)
            .translate(&header_status_error(code, &message));
        prop_assert_eq!(native.code(), code);
        prop_assert_eq!(native.message(), message.as_str());

        let browser = StatusTranslator::for_runtime(Runtime::Browser)
            .translate(&dictionary_status_error(code, &message));
        prop_assert_eq!(browser.code(), code);
        prop_assert_eq!(browser.message(), message.as_str());
    }

    /// A translator never reads the other runtime's shape.
    #[test]
    fn prop_mismatched_shape_is_unknown(code in status_code_strategy()) {
        let err = StatusTranslator::for_runtime(Runtime::Browser)
            .translate(&header_status_error(code, "x"));
        prop_assert_eq!(err.code(), StatusCode::UnknownTransactionStatus);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Signatures from both backends verify under the certificate key.
    #[test]
    fn prop_signatures_verify(
        asset_id in id_strategy(),
        version in cert_version_strategy(),
    ) {
        let public_key = client_public_key();
        let native = native_signer();
        let web = WebCryptoSigner::new(SecretString::from(CLIENT_KEY_PEM.to_string()));

        let content = LedgerValidationRequestBuilder::new(&native)
            .with_asset_id(Some(asset_id.as_str()))
            .with_cert_holder_id("foo")
            .with_cert_version(version)
            .canonical_bytes()
            .unwrap();

        let der = tokio_test::block_on(native.sign(&content)).unwrap();
        let fixed = tokio_test::block_on(web.sign(&content)).unwrap();

        prop_assert!(UnparsedPublicKey::new(&ECDSA_P256_SHA256_ASN1, &public_key)
            .verify(&content, &der)
            .is_ok());
        prop_assert!(UnparsedPublicKey::new(&ECDSA_P256_SHA256_FIXED, &public_key)
            .verify(&content, &fixed)
            .is_ok());
    }
}

#[test]
fn test_foreign_key_signature_does_not_verify() {
    let foreign = NativeSigner::new(SecretString::from(OTHER_KEY_PEM.to_string()));
    let signature = tokio_test::block_on(foreign.sign(b"content")).unwrap();

    let public_key = client_public_key();
    assert!(
        UnparsedPublicKey::new(&ECDSA_P256_SHA256_ASN1, &public_key)
            .verify(b"content", &signature)
            .is_err()
    );
}
