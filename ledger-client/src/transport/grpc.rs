//! `tonic` implementation of the ledger stubs.

use super::{Callback, CallMetadata, LedgerPrivilegedStub, LedgerStub, TransportError};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::proto::{
    CertificateRegistrationRequest, ContractExecutionRequest, ContractExecutionResponse,
    ContractRegistrationRequest, ContractsListingRequest, ContractsListingResponse,
    FunctionRegistrationRequest, LedgerValidationRequest, LedgerValidationResponse,
};
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::{Code, Request, Response};
use tracing::{debug, info};
use url::Url;

const REGISTER_CONTRACT: &str = "/rpc.Ledger/RegisterContract";
const LIST_CONTRACTS: &str = "/rpc.Ledger/ListContracts";
const VALIDATE_LEDGER: &str = "/rpc.Ledger/ValidateLedger";
const EXECUTE_CONTRACT: &str = "/rpc.Ledger/ExecuteContract";
const REGISTER_CERT: &str = "/rpc.LedgerPrivileged/RegisterCert";
const REGISTER_FUNCTION: &str = "/rpc.LedgerPrivileged/RegisterFunction";

/// gRPC stub for one ledger endpoint.
///
/// The same type serves both services; which one it talks to depends on the
/// endpoint it was connected to. Each call runs on its own spawned task and
/// completes its callback from there, so a tokio runtime must be active.
#[derive(Debug, Clone)]
pub struct GrpcLedgerStub {
    grpc: Grpc<Channel>,
}

impl GrpcLedgerStub {
    /// Connect to `url`, failing if the endpoint is unreachable.
    ///
    /// # Errors
    ///
    /// Returns `CLIENT_IO_ERROR` if the endpoint is invalid or the connection
    /// cannot be established within the connect timeout.
    pub async fn connect(url: &Url, config: &ClientConfig) -> ClientResult<Self> {
        let channel = endpoint(url, config)?
            .connect()
            .await
            .map_err(|e| ClientError::client_io(format!("failed to connect to {url}: {e}")))?;
        info!(%url, "Connected to ledger endpoint");
        Ok(Self::from_channel(channel))
    }

    /// Create a stub whose connection is established on first use.
    ///
    /// # Errors
    ///
    /// Returns `CLIENT_IO_ERROR` if the endpoint is invalid.
    pub fn connect_lazy(url: &Url, config: &ClientConfig) -> ClientResult<Self> {
        let channel = endpoint(url, config)?.connect_lazy();
        debug!(%url, "Created lazy ledger channel");
        Ok(Self::from_channel(channel))
    }

    /// Wrap an existing channel.
    #[must_use]
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            grpc: Grpc::new(channel),
        }
    }

    fn unary<Req, Resp>(
        &self,
        path: &'static str,
        request: Req,
        metadata: &CallMetadata,
        callback: Callback<Resp>,
    ) where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut request = Request::new(request);
        if let Err(e) = metadata.apply_to(request.metadata_mut()) {
            callback(Err(e));
            return;
        }

        let mut grpc = self.grpc.clone();
        tokio::spawn(async move {
            let result: Result<Resp, TransportError> = async {
                grpc.ready().await.map_err(|e| {
                    TransportError::new(Code::Unavailable, format!("service was not ready: {e}"))
                })?;
                let codec: ProstCodec<Req, Resp> = ProstCodec::default();
                grpc.unary(request, PathAndQuery::from_static(path), codec)
                    .await
                    .map(Response::into_inner)
                    .map_err(TransportError::from)
            }
            .await;
            callback(result);
        });
    }
}

fn endpoint(url: &Url, config: &ClientConfig) -> ClientResult<Endpoint> {
    let endpoint = Channel::from_shared(url.to_string())
        .map_err(|e| ClientError::client_io(format!("invalid endpoint {url}: {e}")))?
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout);

    if config.tls_enabled {
        endpoint
            .tls_config(ClientTlsConfig::new().with_webpki_roots())
            .map_err(|e| ClientError::client_io(format!("invalid TLS configuration: {e}")))
    } else {
        Ok(endpoint)
    }
}

impl LedgerStub for GrpcLedgerStub {
    fn register_contract(
        &self,
        request: ContractRegistrationRequest,
        metadata: &CallMetadata,
        callback: Callback<()>,
    ) {
        self.unary(REGISTER_CONTRACT, request, metadata, callback);
    }

    fn list_contracts(
        &self,
        request: ContractsListingRequest,
        metadata: &CallMetadata,
        callback: Callback<ContractsListingResponse>,
    ) {
        self.unary(LIST_CONTRACTS, request, metadata, callback);
    }

    fn validate_ledger(
        &self,
        request: LedgerValidationRequest,
        metadata: &CallMetadata,
        callback: Callback<LedgerValidationResponse>,
    ) {
        self.unary(VALIDATE_LEDGER, request, metadata, callback);
    }

    fn execute_contract(
        &self,
        request: ContractExecutionRequest,
        metadata: &CallMetadata,
        callback: Callback<ContractExecutionResponse>,
    ) {
        self.unary(EXECUTE_CONTRACT, request, metadata, callback);
    }
}

impl LedgerPrivilegedStub for GrpcLedgerStub {
    fn register_cert(
        &self,
        request: CertificateRegistrationRequest,
        metadata: &CallMetadata,
        callback: Callback<()>,
    ) {
        self.unary(REGISTER_CERT, request, metadata, callback);
    }

    fn register_function(
        &self,
        request: FunctionRegistrationRequest,
        metadata: &CallMetadata,
        callback: Callback<()>,
    ) {
        self.unary(REGISTER_FUNCTION, request, metadata, callback);
    }
}
