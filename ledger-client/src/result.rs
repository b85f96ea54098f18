//! Result values returned by ledger operations.

use crate::proto;
use crate::status::StatusCode;
use serde::Serialize;
use serde_json::Value;

/// Proof of one asset age, as returned by validation and execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetProof {
    id: String,
    age: u32,
    nonce: String,
    input: String,
    hash: Vec<u8>,
    prev_hash: Vec<u8>,
    signature: Vec<u8>,
}

impl AssetProof {
    /// Asset id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Age of the asset this proof covers.
    #[must_use]
    pub const fn age(&self) -> u32 {
        self.age
    }

    /// Nonce of the execution that produced this age.
    #[must_use]
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// Input dependencies of the execution, as JSON text.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Hash of this age.
    #[must_use]
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    /// Hash of the previous age.
    #[must_use]
    pub fn prev_hash(&self) -> &[u8] {
        &self.prev_hash
    }

    /// Server signature over the proof.
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

impl From<proto::AssetProof> for AssetProof {
    fn from(proof: proto::AssetProof) -> Self {
        Self {
            id: proof.asset_id,
            age: proof.age,
            nonce: proof.nonce,
            input: proof.input,
            hash: proof.hash,
            prev_hash: proof.prev_hash,
            signature: proof.signature,
        }
    }
}

/// Outcome of a ledger validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerValidationResult {
    code: StatusCode,
    proof: Option<AssetProof>,
}

impl LedgerValidationResult {
    /// Create a result.
    #[must_use]
    pub const fn new(code: StatusCode, proof: Option<AssetProof>) -> Self {
        Self { code, proof }
    }

    /// Validation status.
    #[must_use]
    pub const fn code(&self) -> StatusCode {
        self.code
    }

    /// Proof of the validated asset, if the server returned one.
    #[must_use]
    pub const fn proof(&self) -> Option<&AssetProof> {
        self.proof.as_ref()
    }
}

impl From<proto::LedgerValidationResponse> for LedgerValidationResult {
    fn from(response: proto::LedgerValidationResponse) -> Self {
        let code = StatusCode::from_code(response.status_code)
            .unwrap_or(StatusCode::UnknownTransactionStatus);
        Self::new(code, response.proof.map(AssetProof::from))
    }
}

/// Outcome of a contract execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractExecutionResult {
    result: Option<Value>,
    proofs: Vec<AssetProof>,
}

impl ContractExecutionResult {
    /// Create a result.
    #[must_use]
    pub const fn new(result: Option<Value>, proofs: Vec<AssetProof>) -> Self {
        Self { result, proofs }
    }

    /// Contract output, `None` when the contract returned nothing.
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Proofs of the assets the execution touched.
    #[must_use]
    pub fn proofs(&self) -> &[AssetProof] {
        &self.proofs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proto_proof() -> proto::AssetProof {
        proto::AssetProof {
            asset_id: "a1".to_string(),
            age: 3,
            nonce: "n".to_string(),
            input: "{}".to_string(),
            hash: vec![1],
            prev_hash: vec![0],
            signature: vec![9],
        }
    }

    #[test]
    fn test_proof_from_proto() {
        let proof = AssetProof::from(proto_proof());
        assert_eq!(proof.id(), "a1");
        assert_eq!(proof.age(), 3);
        assert_eq!(proof.nonce(), "n");
        assert_eq!(proof.input(), "{}");
        assert_eq!(proof.hash(), [1]);
        assert_eq!(proof.prev_hash(), [0]);
        assert_eq!(proof.signature(), [9]);
    }

    #[test]
    fn test_validation_result_from_response() {
        let result = LedgerValidationResult::from(proto::LedgerValidationResponse {
            status_code: 300,
            proof: Some(proto_proof()),
        });
        assert_eq!(result.code(), StatusCode::InvalidHash);
        assert_eq!(result.proof().map(AssetProof::id), Some("a1"));
    }

    #[test]
    fn test_validation_result_with_unrecognized_code() {
        let result = LedgerValidationResult::from(proto::LedgerValidationResponse {
            status_code: 7,
            proof: None,
        });
        assert_eq!(result.code(), StatusCode::UnknownTransactionStatus);
        assert!(result.proof().is_none());
    }

    #[test]
    fn test_proof_serializes() {
        let json = serde_json::to_value(AssetProof::from(proto_proof())).unwrap();
        assert_eq!(json["id"], "a1");
        assert_eq!(json["age"], 3);
    }
}
