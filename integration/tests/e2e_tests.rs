//! End-to-end scenarios for the ledger client against a mock ledger.

use ledger_client::proto::{AssetProof, ContractExecutionResponse, LedgerValidationResponse};
use ledger_client::{ClientConfig, LogFormat, Runtime, StatusCode, TransportError, init_tracing};
use ledger_integration_tests::Scenario;
use ledger_test_utils::fixtures::{
    CERT_HOLDER, CLIENT_CERT_PEM, client_config, client_properties, dictionary_status_error,
    header_status_error,
};
use ledger_test_utils::{MockLedgerStub, Operation, RecordedRequest};
use serde_json::{Value, json};
use std::time::Duration;

fn proof(asset_id: &str, age: u32) -> AssetProof {
    AssetProof {
        asset_id: asset_id.to_string(),
        age,
        nonce: "1700000000000".to_string(),
        input: "{}".to_string(),
        hash: vec![7; 32],
        prev_hash: vec![0; 32],
        signature: vec![1, 2, 3],
    }
}

#[test]
fn test_missing_identity_field_fails_before_network() {
    let mut properties = client_properties();
    properties
        .as_object_mut()
        .unwrap()
        .remove("scalar.ledger.client.cert_pem");

    let err = ClientConfig::from_properties(&properties).unwrap_err();
    assert_eq!(err.code(), StatusCode::ClientIoError);
    assert!(err.message().contains("scalar.ledger.client.cert_pem"));
}

#[tokio::test]
async fn test_register_certificate() {
    let scenario = Scenario::native(MockLedgerStub::new()).unwrap();
    scenario.client.register_certificate().await.unwrap();

    let calls = scenario.ledger.calls();
    assert_eq!(calls.len(), 1);
    let RecordedRequest::RegisterCert(request) = &calls[0].request else {
        panic!("expected a certificate registration");
    };
    assert_eq!(request.cert_holder_id, CERT_HOLDER);
    assert_eq!(request.cert_version, 1);
    assert_eq!(request.cert_pem, CLIENT_CERT_PEM);
}

#[tokio::test]
async fn test_register_function_is_unsigned_and_privileged() {
    let scenario = Scenario::native(MockLedgerStub::new()).unwrap();
    scenario
        .client
        .register_function("fn-1", "com.example.Audit", &[0xca, 0xfe])
        .await
        .unwrap();

    let RecordedRequest::RegisterFunction(request) = &scenario.ledger.calls()[0].request else {
        panic!("expected a function registration");
    };
    assert_eq!(request.function_id, "fn-1");
    assert_eq!(request.function_byte_code, [0xca, 0xfe]);
}

#[tokio::test]
async fn test_register_contract_is_signed() {
    let scenario = Scenario::native(MockLedgerStub::new()).unwrap();
    let properties = json!({"owner": "foo"});
    scenario
        .client
        .register_contract("transfer", "com.example.Transfer", &[1, 2, 3], Some(&properties))
        .await
        .unwrap();

    let RecordedRequest::RegisterContract(request) = &scenario.ledger.calls()[0].request else {
        panic!("expected a contract registration");
    };
    assert_eq!(request.contract_properties, r#"{"owner":"foo"}"#);
    assert_eq!(request.signature[0], 0x30, "native signatures are DER");
}

#[tokio::test]
async fn test_empty_byte_code_is_signed_and_sent() {
    let scenario = Scenario::native(MockLedgerStub::new()).unwrap();

    scenario
        .client
        .register_contract("c1", "com.example.C", &[], None)
        .await
        .unwrap();

    let RecordedRequest::RegisterContract(request) = &scenario.ledger.calls()[0].request else {
        panic!("expected a contract registration");
    };
    assert!(request.contract_byte_code.is_empty());
    assert!(!request.signature.is_empty());
}

#[tokio::test]
async fn test_execute_contract_injects_nonce_and_parses_result() {
    let ledger = MockLedgerStub::new().with_execution(ContractExecutionResponse {
        result: r#"{"balance":90}"#.to_string(),
        proofs: vec![proof("alice", 4), proof("bob", 2)],
    });
    let scenario = Scenario::native(ledger).unwrap();

    let result = scenario
        .client
        .execute_contract("transfer", json!({"from": "alice", "to": "bob", "amount": 10}), None)
        .await
        .unwrap();

    assert_eq!(result.result(), Some(&json!({"balance": 90})));
    assert_eq!(result.proofs().len(), 2);
    assert_eq!(result.proofs()[0].id(), "alice");
    assert_eq!(result.proofs()[0].age(), 4);

    let executions = scenario.ledger.executions();
    let argument: Value = serde_json::from_str(&executions[0].contract_argument).unwrap();
    assert_eq!(argument["amount"], 10);
    let nonce: i64 = argument["nonce"].as_str().unwrap().parse().unwrap();
    assert!(nonce > 0);
}

#[tokio::test]
async fn test_executions_a_millisecond_apart_differ() {
    let scenario = Scenario::native(MockLedgerStub::new()).unwrap();

    for _ in 0..2 {
        scenario
            .client
            .execute_contract("counter", json!({"step": 1}), None)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let executions = scenario.ledger.executions();
    assert_eq!(executions.len(), 2);
    assert_ne!(
        executions[0].contract_argument,
        executions[1].contract_argument
    );
    assert_ne!(executions[0].signature, executions[1].signature);
}

#[tokio::test]
async fn test_list_contracts_unauthorized() {
    let ledger = MockLedgerStub::new().failing(
        Operation::ListContracts,
        header_status_error(StatusCode::Unauthorized, "bad cert"),
    );
    let scenario = Scenario::native(ledger).unwrap();

    let err = scenario.client.list_contracts(None).await.unwrap_err();
    assert_eq!(err.code(), StatusCode::Unauthorized);
    assert_eq!(err.message(), "bad cert");
}

#[tokio::test]
async fn test_browser_runtime_reads_dictionary_status() {
    let ledger = MockLedgerStub::new().failing(
        Operation::ExecuteContract,
        dictionary_status_error(StatusCode::ContractNotFound, "no such contract"),
    );
    let scenario = Scenario::browser(ledger).unwrap();

    let err = scenario
        .client
        .execute_contract("missing", json!({}), None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), StatusCode::ContractNotFound);
    assert_eq!(err.message(), "no such contract");

    let signature = &scenario.ledger.executions()[0].signature;
    assert_eq!(signature.len(), 64, "browser signatures are r||s");
}

#[tokio::test]
async fn test_failure_without_metadata_is_unknown_status() {
    let ledger = MockLedgerStub::new().failing(
        Operation::ValidateLedger,
        TransportError::new(tonic::Code::DeadlineExceeded, "deadline exceeded"),
    );
    let scenario = Scenario::native(ledger).unwrap();

    let err = scenario.client.validate_ledger(None).await.unwrap_err();
    assert_eq!(err.code(), StatusCode::UnknownTransactionStatus);
    assert_eq!(err.message(), "deadline exceeded");
    assert!(err.may_have_taken_effect());
}

#[tokio::test]
async fn test_dropped_callback_is_unknown_status() {
    let ledger = MockLedgerStub::new().dropping(Operation::RegisterCert);
    let scenario = Scenario::native(ledger).unwrap();

    let err = scenario.client.register_certificate().await.unwrap_err();
    assert_eq!(err.code(), StatusCode::UnknownTransactionStatus);
    assert_eq!(
        err.message(),
        "transport dropped the call without completing it"
    );
}

#[tokio::test]
async fn test_validate_ledger_returns_proof() {
    let ledger = MockLedgerStub::new().deferred().with_validation(LedgerValidationResponse {
        status_code: StatusCode::Ok.code(),
        proof: Some(proof("alice", 7)),
    });
    let scenario = Scenario::native(ledger).unwrap();

    let result = scenario.client.validate_ledger(Some("alice")).await.unwrap();
    assert_eq!(result.code(), StatusCode::Ok);
    let proof = result.proof().unwrap();
    assert_eq!(proof.id(), "alice");
    assert_eq!(proof.age(), 7);
}

#[tokio::test]
async fn test_credential_is_sent_as_authorization() {
    let config = client_config().with_credential("bearer-token");
    let ledger = MockLedgerStub::new().with_listing_json("{}");
    let scenario = Scenario::build(&config, Runtime::Native, ledger).unwrap();

    scenario.client.list_contracts(Some("c1")).await.unwrap();
    scenario.client.register_certificate().await.unwrap();

    for call in scenario.ledger.calls() {
        assert_eq!(call.authorization.as_deref(), Some("bearer-token"));
    }
}

#[tokio::test]
async fn test_client_is_shareable_across_tasks() {
    let ledger = MockLedgerStub::new().with_listing_json(r#"{"c1":{}}"#);
    let scenario = std::sync::Arc::new(Scenario::native(ledger).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let scenario = std::sync::Arc::clone(&scenario);
            tokio::spawn(async move { scenario.client.list_contracts(None).await })
        })
        .collect();

    for handle in handles {
        let listing = handle.await.unwrap().unwrap();
        assert!(listing.get("c1").is_some());
    }
    assert_eq!(scenario.ledger.call_count(), 4);
}

#[tokio::test]
async fn test_scenario_installs_client_tracing() {
    let scenario = Scenario::native(MockLedgerStub::new()).unwrap();
    scenario.client.register_certificate().await.unwrap();

    assert!(!init_tracing(tracing::Level::INFO, LogFormat::Json));
}
