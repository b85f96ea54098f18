//! Per-operation request builders.

use super::{BuildError, CanonicalBytes};
use crate::config::DEFAULT_CERT_VERSION;
use crate::proto::{
    CertificateRegistrationRequest, ContractExecutionRequest, ContractRegistrationRequest,
    ContractsListingRequest, FunctionRegistrationRequest, LedgerValidationRequest,
};
use crate::signer::SignatureSigner;
use serde_json::{Map, Value};
use tracing::debug;

/// Key under which the execution nonce is injected into contract arguments.
pub const NONCE_KEY: &str = "nonce";

fn required<'s>(value: Option<&'s str>, field: &'static str) -> Result<&'s str, BuildError> {
    value.ok_or(BuildError::MissingField(field))
}

/// Current wall-clock time in milliseconds, as a decimal string.
fn current_nonce() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

/// Builds an unsigned certificate registration request.
#[derive(Debug, Clone)]
pub struct CertificateRegistrationRequestBuilder {
    cert_holder_id: Option<String>,
    cert_version: u32,
    cert_pem: Option<String>,
}

impl Default for CertificateRegistrationRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificateRegistrationRequestBuilder {
    /// Create an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cert_holder_id: None,
            cert_version: DEFAULT_CERT_VERSION,
            cert_pem: None,
        }
    }

    /// Set the certificate holder id.
    #[must_use]
    pub fn with_cert_holder_id(mut self, id: impl Into<String>) -> Self {
        self.cert_holder_id = Some(id.into());
        self
    }

    /// Set the certificate version.
    #[must_use]
    pub const fn with_cert_version(mut self, version: u32) -> Self {
        self.cert_version = version;
        self
    }

    /// Set the certificate PEM.
    #[must_use]
    pub fn with_cert_pem(mut self, pem: impl Into<String>) -> Self {
        self.cert_pem = Some(pem.into());
        self
    }

    /// Build the request. Certificate registration is self-authenticating and
    /// carries no signature.
    ///
    /// # Errors
    ///
    /// Fails if the holder id or PEM was never set.
    pub fn build(self) -> Result<CertificateRegistrationRequest, BuildError> {
        Ok(CertificateRegistrationRequest {
            cert_holder_id: self
                .cert_holder_id
                .ok_or(BuildError::MissingField("cert_holder_id"))?,
            cert_version: self.cert_version,
            cert_pem: self.cert_pem.ok_or(BuildError::MissingField("cert_pem"))?,
        })
    }
}

/// Builds an unsigned function registration request for the privileged service.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistrationRequestBuilder {
    function_id: Option<String>,
    binary_name: Option<String>,
    byte_code: Option<Vec<u8>>,
}

impl FunctionRegistrationRequestBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the function id.
    #[must_use]
    pub fn with_function_id(mut self, id: impl Into<String>) -> Self {
        self.function_id = Some(id.into());
        self
    }

    /// Set the function binary name.
    #[must_use]
    pub fn with_function_binary_name(mut self, name: impl Into<String>) -> Self {
        self.binary_name = Some(name.into());
        self
    }

    /// Set the function byte code.
    #[must_use]
    pub fn with_function_byte_code(mut self, byte_code: impl Into<Vec<u8>>) -> Self {
        self.byte_code = Some(byte_code.into());
        self
    }

    /// Build the request.
    ///
    /// # Errors
    ///
    /// Fails if any field was never set.
    pub fn build(self) -> Result<FunctionRegistrationRequest, BuildError> {
        Ok(FunctionRegistrationRequest {
            function_id: self.function_id.ok_or(BuildError::MissingField("function_id"))?,
            function_binary_name: self
                .binary_name
                .ok_or(BuildError::MissingField("function_binary_name"))?,
            function_byte_code: self
                .byte_code
                .ok_or(BuildError::MissingField("function_byte_code"))?,
        })
    }
}

/// Builds a signed contract registration request.
///
/// Signed fields, in order: contract id, binary name, byte code, properties
/// JSON, cert holder id, cert version.
pub struct ContractRegistrationRequestBuilder<'a> {
    signer: &'a dyn SignatureSigner,
    contract_id: Option<String>,
    binary_name: Option<String>,
    byte_code: Option<Vec<u8>>,
    properties: Option<String>,
    cert_holder_id: Option<String>,
    cert_version: u32,
}

impl<'a> ContractRegistrationRequestBuilder<'a> {
    /// Create an empty builder that signs with `signer`.
    #[must_use]
    pub fn new(signer: &'a dyn SignatureSigner) -> Self {
        Self {
            signer,
            contract_id: None,
            binary_name: None,
            byte_code: None,
            properties: None,
            cert_holder_id: None,
            cert_version: DEFAULT_CERT_VERSION,
        }
    }

    /// Set the contract id.
    #[must_use]
    pub fn with_contract_id(mut self, id: impl Into<String>) -> Self {
        self.contract_id = Some(id.into());
        self
    }

    /// Set the canonical binary name of the contract.
    #[must_use]
    pub fn with_contract_binary_name(mut self, name: impl Into<String>) -> Self {
        self.binary_name = Some(name.into());
        self
    }

    /// Set the contract byte code.
    #[must_use]
    pub fn with_contract_byte_code(mut self, byte_code: impl Into<Vec<u8>>) -> Self {
        self.byte_code = Some(byte_code.into());
        self
    }

    /// Set the contract properties. `None` leaves them empty.
    #[must_use]
    pub fn with_contract_properties(mut self, properties: Option<&Value>) -> Self {
        self.properties = properties.map(Value::to_string);
        self
    }

    /// Set the certificate holder id.
    #[must_use]
    pub fn with_cert_holder_id(mut self, id: impl Into<String>) -> Self {
        self.cert_holder_id = Some(id.into());
        self
    }

    /// Set the certificate version.
    #[must_use]
    pub const fn with_cert_version(mut self, version: u32) -> Self {
        self.cert_version = version;
        self
    }

    /// The byte sequence that is signed.
    ///
    /// # Errors
    ///
    /// Fails if a required field was never set.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, BuildError> {
        let byte_code = self
            .byte_code
            .as_deref()
            .ok_or(BuildError::MissingField("contract_byte_code"))?;
        Ok(CanonicalBytes::new()
            .string(Some(required(self.contract_id.as_deref(), "contract_id")?))
            .string(Some(required(
                self.binary_name.as_deref(),
                "contract_binary_name",
            )?))
            .bytes(byte_code)
            .string(self.properties.as_deref())
            .string(Some(required(self.cert_holder_id.as_deref(), "cert_holder_id")?))
            .u32(self.cert_version)
            .into_vec())
    }

    /// Sign and build the request.
    ///
    /// # Errors
    ///
    /// Fails if a required field was never set or signing fails.
    pub async fn build(self) -> Result<ContractRegistrationRequest, BuildError> {
        let signature = self.signer.sign(&self.canonical_bytes()?).await?;
        debug!(contract_id = ?self.contract_id, "Built contract registration request");
        Ok(ContractRegistrationRequest {
            contract_id: self.contract_id.unwrap_or_default(),
            contract_binary_name: self.binary_name.unwrap_or_default(),
            contract_byte_code: self.byte_code.unwrap_or_default(),
            contract_properties: self.properties.unwrap_or_default(),
            cert_holder_id: self.cert_holder_id.unwrap_or_default(),
            cert_version: self.cert_version,
            signature,
        })
    }
}

/// Builds a signed contract listing request.
///
/// Signed fields, in order: cert holder id, cert version, contract id.
pub struct ContractsListingRequestBuilder<'a> {
    signer: &'a dyn SignatureSigner,
    cert_holder_id: Option<String>,
    cert_version: u32,
    contract_id: Option<String>,
}

impl<'a> ContractsListingRequestBuilder<'a> {
    /// Create an empty builder that signs with `signer`.
    #[must_use]
    pub fn new(signer: &'a dyn SignatureSigner) -> Self {
        Self {
            signer,
            cert_holder_id: None,
            cert_version: DEFAULT_CERT_VERSION,
            contract_id: None,
        }
    }

    /// Set the certificate holder id.
    #[must_use]
    pub fn with_cert_holder_id(mut self, id: impl Into<String>) -> Self {
        self.cert_holder_id = Some(id.into());
        self
    }

    /// Set the certificate version.
    #[must_use]
    pub const fn with_cert_version(mut self, version: u32) -> Self {
        self.cert_version = version;
        self
    }

    /// Restrict the listing to one contract. `None` lists all contracts.
    #[must_use]
    pub fn with_contract_id(mut self, id: Option<&str>) -> Self {
        self.contract_id = id.map(str::to_string);
        self
    }

    /// The byte sequence that is signed.
    ///
    /// # Errors
    ///
    /// Fails if the holder id was never set.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, BuildError> {
        Ok(CanonicalBytes::new()
            .string(Some(required(self.cert_holder_id.as_deref(), "cert_holder_id")?))
            .u32(self.cert_version)
            .string(self.contract_id.as_deref())
            .into_vec())
    }

    /// Sign and build the request.
    ///
    /// # Errors
    ///
    /// Fails if the holder id was never set or signing fails.
    pub async fn build(self) -> Result<ContractsListingRequest, BuildError> {
        let signature = self.signer.sign(&self.canonical_bytes()?).await?;
        Ok(ContractsListingRequest {
            cert_holder_id: self.cert_holder_id.unwrap_or_default(),
            cert_version: self.cert_version,
            contract_id: self.contract_id.unwrap_or_default(),
            signature,
        })
    }
}

/// Builds a signed ledger validation request.
///
/// Signed fields, in order: asset id, cert holder id, cert version.
pub struct LedgerValidationRequestBuilder<'a> {
    signer: &'a dyn SignatureSigner,
    asset_id: Option<String>,
    cert_holder_id: Option<String>,
    cert_version: u32,
}

impl<'a> LedgerValidationRequestBuilder<'a> {
    /// Create an empty builder that signs with `signer`.
    #[must_use]
    pub fn new(signer: &'a dyn SignatureSigner) -> Self {
        Self {
            signer,
            asset_id: None,
            cert_holder_id: None,
            cert_version: DEFAULT_CERT_VERSION,
        }
    }

    /// Set the asset to validate.
    #[must_use]
    pub fn with_asset_id(mut self, id: Option<&str>) -> Self {
        self.asset_id = id.map(str::to_string);
        self
    }

    /// Set the certificate holder id.
    #[must_use]
    pub fn with_cert_holder_id(mut self, id: impl Into<String>) -> Self {
        self.cert_holder_id = Some(id.into());
        self
    }

    /// Set the certificate version.
    #[must_use]
    pub const fn with_cert_version(mut self, version: u32) -> Self {
        self.cert_version = version;
        self
    }

    /// The byte sequence that is signed.
    ///
    /// # Errors
    ///
    /// Fails if the holder id was never set.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, BuildError> {
        Ok(CanonicalBytes::new()
            .string(self.asset_id.as_deref())
            .string(Some(required(self.cert_holder_id.as_deref(), "cert_holder_id")?))
            .u32(self.cert_version)
            .into_vec())
    }

    /// Sign and build the request.
    ///
    /// # Errors
    ///
    /// Fails if the holder id was never set or signing fails.
    pub async fn build(self) -> Result<LedgerValidationRequest, BuildError> {
        let signature = self.signer.sign(&self.canonical_bytes()?).await?;
        Ok(LedgerValidationRequest {
            asset_id: self.asset_id.unwrap_or_default(),
            cert_holder_id: self.cert_holder_id.unwrap_or_default(),
            cert_version: self.cert_version,
            signature,
        })
    }
}

/// Builds a signed contract execution request.
///
/// Signed fields, in order: contract id, argument JSON, function argument
/// JSON, cert holder id, cert version. The argument always carries a
/// [`NONCE_KEY`] entry so repeated executions sign distinct bytes.
pub struct ContractExecutionRequestBuilder<'a> {
    signer: &'a dyn SignatureSigner,
    contract_id: Option<String>,
    argument: Option<String>,
    function_argument: Option<String>,
    cert_holder_id: Option<String>,
    cert_version: u32,
}

impl<'a> ContractExecutionRequestBuilder<'a> {
    /// Create an empty builder that signs with `signer`.
    #[must_use]
    pub fn new(signer: &'a dyn SignatureSigner) -> Self {
        Self {
            signer,
            contract_id: None,
            argument: None,
            function_argument: None,
            cert_holder_id: None,
            cert_version: DEFAULT_CERT_VERSION,
        }
    }

    /// Set the contract id.
    #[must_use]
    pub fn with_contract_id(mut self, id: impl Into<String>) -> Self {
        self.contract_id = Some(id.into());
        self
    }

    /// Set the contract argument, injecting the current time in milliseconds
    /// as its nonce.
    ///
    /// Two calls within the same millisecond get the same nonce.
    #[must_use]
    pub fn with_contract_argument(self, argument: Map<String, Value>) -> Self {
        self.with_contract_argument_and_nonce(argument, current_nonce())
    }

    /// Set the contract argument with an explicit nonce.
    #[must_use]
    pub fn with_contract_argument_and_nonce(
        mut self,
        mut argument: Map<String, Value>,
        nonce: impl Into<String>,
    ) -> Self {
        argument.insert(NONCE_KEY.to_string(), Value::String(nonce.into()));
        self.argument = Some(Value::Object(argument).to_string());
        self
    }

    /// Set the optional function argument.
    #[must_use]
    pub fn with_function_argument(mut self, argument: Option<&Value>) -> Self {
        self.function_argument = argument.map(Value::to_string);
        self
    }

    /// Set the certificate holder id.
    #[must_use]
    pub fn with_cert_holder_id(mut self, id: impl Into<String>) -> Self {
        self.cert_holder_id = Some(id.into());
        self
    }

    /// Set the certificate version.
    #[must_use]
    pub const fn with_cert_version(mut self, version: u32) -> Self {
        self.cert_version = version;
        self
    }

    /// The byte sequence that is signed.
    ///
    /// # Errors
    ///
    /// Fails if a required field was never set.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, BuildError> {
        Ok(CanonicalBytes::new()
            .string(Some(required(self.contract_id.as_deref(), "contract_id")?))
            .string(Some(required(self.argument.as_deref(), "contract_argument")?))
            .string(self.function_argument.as_deref())
            .string(Some(required(self.cert_holder_id.as_deref(), "cert_holder_id")?))
            .u32(self.cert_version)
            .into_vec())
    }

    /// Sign and build the request.
    ///
    /// # Errors
    ///
    /// Fails if a required field was never set or signing fails.
    pub async fn build(self) -> Result<ContractExecutionRequest, BuildError> {
        let signature = self.signer.sign(&self.canonical_bytes()?).await?;
        debug!(contract_id = ?self.contract_id, "Built contract execution request");
        Ok(ContractExecutionRequest {
            contract_id: self.contract_id.unwrap_or_default(),
            contract_argument: self.argument.unwrap_or_default(),
            cert_holder_id: self.cert_holder_id.unwrap_or_default(),
            cert_version: self.cert_version,
            function_argument: self.function_argument.unwrap_or_default(),
            signature,
        })
    }
}
