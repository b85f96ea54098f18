//! Client facade over the ledger services.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::identity::IdentityContext;
use crate::request::{
    CertificateRegistrationRequestBuilder, ContractExecutionRequestBuilder,
    ContractRegistrationRequestBuilder, ContractsListingRequestBuilder,
    FunctionRegistrationRequestBuilder, LedgerValidationRequestBuilder,
};
use crate::result::{AssetProof, ContractExecutionResult, LedgerValidationResult};
use crate::runtime::Runtime;
use crate::translator::StatusTranslator;
#[cfg(not(target_arch = "wasm32"))]
use crate::transport::GrpcLedgerStub;
use crate::transport::{CallMetadata, Callback, LedgerPrivilegedStub, LedgerStub, invoke};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Signs requests with the caller's identity and runs them against the
/// ledger services.
///
/// Shareable across tasks; every call is independent and nothing is retried.
pub struct ClientService {
    identity: IdentityContext,
    ledger: Arc<dyn LedgerStub>,
    privileged: Arc<dyn LedgerPrivilegedStub>,
    translator: StatusTranslator,
}

impl ClientService {
    /// Create a service for the detected runtime over the given stubs.
    ///
    /// # Errors
    ///
    /// Returns `CLIENT_IO_ERROR` if the configuration lacks an identity field.
    pub fn new(
        config: &ClientConfig,
        ledger: Arc<dyn LedgerStub>,
        privileged: Arc<dyn LedgerPrivilegedStub>,
    ) -> ClientResult<Self> {
        Self::with_runtime(config, Runtime::detect(), ledger, privileged)
    }

    /// Create a service for an explicit runtime.
    ///
    /// # Errors
    ///
    /// Returns `CLIENT_IO_ERROR` if the configuration lacks an identity field.
    pub fn with_runtime(
        config: &ClientConfig,
        runtime: Runtime,
        ledger: Arc<dyn LedgerStub>,
        privileged: Arc<dyn LedgerPrivilegedStub>,
    ) -> ClientResult<Self> {
        let identity = IdentityContext::new(config, runtime)?;
        Ok(Self::with_identity(identity, ledger, privileged))
    }

    /// Create a service from a prepared identity.
    #[must_use]
    pub fn with_identity(
        identity: IdentityContext,
        ledger: Arc<dyn LedgerStub>,
        privileged: Arc<dyn LedgerPrivilegedStub>,
    ) -> Self {
        let translator = StatusTranslator::for_runtime(identity.runtime());
        Self {
            identity,
            ledger,
            privileged,
            translator,
        }
    }

    /// Connect to the configured ledger endpoints over gRPC.
    ///
    /// The regular endpoint is connected eagerly; the privileged endpoint is
    /// connected on first use.
    ///
    /// # Errors
    ///
    /// Returns `CLIENT_IO_ERROR` if the configuration is invalid or the
    /// regular endpoint cannot be reached.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn connect(config: &ClientConfig) -> ClientResult<Self> {
        let identity = IdentityContext::new(config, Runtime::detect())?;
        let ledger = GrpcLedgerStub::connect(&config.endpoint()?, config).await?;
        let privileged = GrpcLedgerStub::connect_lazy(&config.privileged_endpoint()?, config)?;
        Ok(Self::with_identity(
            identity,
            Arc::new(ledger),
            Arc::new(privileged),
        ))
    }

    /// Identity the service signs with.
    #[must_use]
    pub const fn identity(&self) -> &IdentityContext {
        &self.identity
    }

    /// Register the caller's certificate.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the ledger, or
    /// `UNKNOWN_TRANSACTION_STATUS` if none could be recovered.
    #[instrument(skip(self), fields(cert_holder_id = %self.identity.cert_holder_id()))]
    pub async fn register_certificate(&self) -> ClientResult<()> {
        let request = CertificateRegistrationRequestBuilder::new()
            .with_cert_holder_id(self.identity.cert_holder_id())
            .with_cert_version(self.identity.cert_version())
            .with_cert_pem(self.identity.cert_pem())
            .build()?;
        self.call("register_certificate", request, |req, md, cb| {
            self.privileged.register_cert(req, md, cb);
        })
        .await
    }

    /// Register a function on the privileged service.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the ledger, or
    /// `UNKNOWN_TRANSACTION_STATUS` if none could be recovered.
    #[instrument(skip(self, byte_code), fields(byte_code_len = byte_code.len()))]
    pub async fn register_function(
        &self,
        function_id: &str,
        function_binary_name: &str,
        byte_code: &[u8],
    ) -> ClientResult<()> {
        let request = FunctionRegistrationRequestBuilder::new()
            .with_function_id(function_id)
            .with_function_binary_name(function_binary_name)
            .with_function_byte_code(byte_code)
            .build()?;
        self.call("register_function", request, |req, md, cb| {
            self.privileged.register_function(req, md, cb);
        })
        .await
    }

    /// Register a contract.
    ///
    /// # Errors
    ///
    /// Returns `RUNTIME_ERROR` if signing fails, otherwise the status
    /// reported by the ledger.
    #[instrument(skip(self, byte_code, properties), fields(byte_code_len = byte_code.len()))]
    pub async fn register_contract(
        &self,
        contract_id: &str,
        contract_binary_name: &str,
        byte_code: &[u8],
        properties: Option<&Value>,
    ) -> ClientResult<()> {
        let request = ContractRegistrationRequestBuilder::new(self.identity.signer())
            .with_contract_id(contract_id)
            .with_contract_binary_name(contract_binary_name)
            .with_contract_byte_code(byte_code)
            .with_contract_properties(properties)
            .with_cert_holder_id(self.identity.cert_holder_id())
            .with_cert_version(self.identity.cert_version())
            .build()
            .await?;
        self.call("register_contract", request, |req, md, cb| {
            self.ledger.register_contract(req, md, cb);
        })
        .await
    }

    /// List registered contracts, or only `contract_id` when given.
    ///
    /// # Errors
    ///
    /// Returns `RUNTIME_ERROR` if signing fails or the response is not JSON,
    /// otherwise the status reported by the ledger.
    #[instrument(skip(self))]
    pub async fn list_contracts(&self, contract_id: Option<&str>) -> ClientResult<Value> {
        let request = ContractsListingRequestBuilder::new(self.identity.signer())
            .with_cert_holder_id(self.identity.cert_holder_id())
            .with_cert_version(self.identity.cert_version())
            .with_contract_id(contract_id)
            .build()
            .await?;
        let response = self
            .call("list_contracts", request, |req, md, cb| {
                self.ledger.list_contracts(req, md, cb);
            })
            .await?;
        parse_json(&response.json, "contract listing")
    }

    /// Validate the ledger, or only `asset_id` when given.
    ///
    /// # Errors
    ///
    /// Returns `RUNTIME_ERROR` if signing fails, otherwise the status
    /// reported by the ledger.
    #[instrument(skip(self))]
    pub async fn validate_ledger(
        &self,
        asset_id: Option<&str>,
    ) -> ClientResult<LedgerValidationResult> {
        let request = LedgerValidationRequestBuilder::new(self.identity.signer())
            .with_asset_id(asset_id)
            .with_cert_holder_id(self.identity.cert_holder_id())
            .with_cert_version(self.identity.cert_version())
            .build()
            .await?;
        let response = self
            .call("validate_ledger", request, |req, md, cb| {
                self.ledger.validate_ledger(req, md, cb);
            })
            .await?;
        let result = LedgerValidationResult::from(response);
        debug!(code = %result.code(), "Ledger validated");
        Ok(result)
    }

    /// Execute a contract with `argument`, which must be a JSON object.
    ///
    /// A `nonce` entry holding the current time in milliseconds is added to
    /// the argument before signing.
    ///
    /// # Errors
    ///
    /// Returns `CLIENT_IO_ERROR` if `argument` is not an object,
    /// `RUNTIME_ERROR` if signing fails or the result is not JSON, otherwise
    /// the status reported by the ledger.
    #[instrument(skip(self, argument, function_argument))]
    pub async fn execute_contract(
        &self,
        contract_id: &str,
        argument: Value,
        function_argument: Option<&Value>,
    ) -> ClientResult<ContractExecutionResult> {
        let Value::Object(argument) = argument else {
            return Err(ClientError::client_io(
                "contract argument must be a JSON object",
            ));
        };
        let request = ContractExecutionRequestBuilder::new(self.identity.signer())
            .with_contract_id(contract_id)
            .with_contract_argument(argument)
            .with_function_argument(function_argument)
            .with_cert_holder_id(self.identity.cert_holder_id())
            .with_cert_version(self.identity.cert_version())
            .build()
            .await?;
        let response = self
            .call("execute_contract", request, |req, md, cb| {
                self.ledger.execute_contract(req, md, cb);
            })
            .await?;

        let result = if response.result.is_empty() {
            None
        } else {
            Some(parse_json(&response.result, "contract result")?)
        };
        let proofs = response.proofs.into_iter().map(AssetProof::from).collect();
        Ok(ContractExecutionResult::new(result, proofs))
    }

    async fn call<Req, Resp, F>(
        &self,
        operation: &'static str,
        request: Req,
        call: F,
    ) -> ClientResult<Resp>
    where
        Req: Send,
        Resp: Send + 'static,
        F: FnOnce(Req, &CallMetadata, Callback<Resp>) + Send,
    {
        let metadata = self.identity.call_metadata();
        match invoke(request, &metadata, call).await {
            Ok(response) => {
                debug!(operation, "Ledger call succeeded");
                Ok(response)
            }
            Err(e) => {
                let err = self.translator.translate(&e);
                warn!(
                    operation,
                    code = %err.code(),
                    error = %err.message(),
                    transport_code = ?e.code,
                    "Ledger call failed"
                );
                Err(err)
            }
        }
    }
}

impl fmt::Debug for ClientService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientService")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

fn parse_json(text: &str, what: &str) -> ClientResult<Value> {
    serde_json::from_str(text)
        .map_err(|e| ClientError::runtime(format!("malformed {what} JSON: {e}")))
}
