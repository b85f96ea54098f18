//! Wire messages of the `rpc` ledger package.
//!
//! Declared with `prost` derives so requests and responses can be encoded
//! without a protoc step at build time. Field tags must stay in sync with the
//! server's schema.

#![allow(missing_docs)]

use prost::alloc::string::String;
use prost::alloc::vec::Vec;

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct CertificateRegistrationRequest {
    #[prost(string, tag = "1")]
    pub cert_holder_id: String,
    #[prost(uint32, tag = "2")]
    pub cert_version: u32,
    #[prost(string, tag = "3")]
    pub cert_pem: String,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct FunctionRegistrationRequest {
    #[prost(string, tag = "1")]
    pub function_id: String,
    #[prost(string, tag = "2")]
    pub function_binary_name: String,
    #[prost(bytes = "vec", tag = "3")]
    pub function_byte_code: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ContractRegistrationRequest {
    #[prost(string, tag = "1")]
    pub contract_id: String,
    #[prost(string, tag = "2")]
    pub contract_binary_name: String,
    #[prost(bytes = "vec", tag = "3")]
    pub contract_byte_code: Vec<u8>,
    #[prost(string, tag = "4")]
    pub contract_properties: String,
    #[prost(string, tag = "5")]
    pub cert_holder_id: String,
    #[prost(uint32, tag = "6")]
    pub cert_version: u32,
    #[prost(bytes = "vec", tag = "7")]
    pub signature: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ContractsListingRequest {
    #[prost(string, tag = "1")]
    pub cert_holder_id: String,
    #[prost(uint32, tag = "2")]
    pub cert_version: u32,
    #[prost(string, tag = "3")]
    pub contract_id: String,
    #[prost(bytes = "vec", tag = "4")]
    pub signature: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ContractsListingResponse {
    #[prost(string, tag = "1")]
    pub json: String,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct LedgerValidationRequest {
    #[prost(string, tag = "1")]
    pub asset_id: String,
    #[prost(string, tag = "2")]
    pub cert_holder_id: String,
    #[prost(uint32, tag = "3")]
    pub cert_version: u32,
    #[prost(bytes = "vec", tag = "4")]
    pub signature: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct LedgerValidationResponse {
    #[prost(int32, tag = "1")]
    pub status_code: i32,
    #[prost(message, optional, tag = "2")]
    pub proof: Option<AssetProof>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct AssetProof {
    #[prost(string, tag = "1")]
    pub asset_id: String,
    #[prost(uint32, tag = "2")]
    pub age: u32,
    #[prost(string, tag = "3")]
    pub nonce: String,
    #[prost(string, tag = "4")]
    pub input: String,
    #[prost(bytes = "vec", tag = "5")]
    pub hash: Vec<u8>,
    #[prost(bytes = "vec", tag = "6")]
    pub prev_hash: Vec<u8>,
    #[prost(bytes = "vec", tag = "7")]
    pub signature: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ContractExecutionRequest {
    #[prost(string, tag = "1")]
    pub contract_id: String,
    #[prost(string, tag = "2")]
    pub contract_argument: String,
    #[prost(string, tag = "3")]
    pub cert_holder_id: String,
    #[prost(uint32, tag = "4")]
    pub cert_version: u32,
    #[prost(string, tag = "5")]
    pub function_argument: String,
    #[prost(bytes = "vec", tag = "6")]
    pub signature: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ContractExecutionResponse {
    #[prost(string, tag = "1")]
    pub result: String,
    #[prost(message, repeated, tag = "2")]
    pub proofs: Vec<AssetProof>,
}

/// Binary status carried in failure metadata.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct Status {
    #[prost(int32, tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub message: String,
}
