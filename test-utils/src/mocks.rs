//! Mock ledger stubs for testing.
//!
//! [`MockLedgerStub`] implements both stub traits, records every request it
//! receives and answers from canned responses or injected failures.

use ledger_client::proto::{
    CertificateRegistrationRequest, ContractExecutionRequest, ContractExecutionResponse,
    ContractRegistrationRequest, ContractsListingRequest, ContractsListingResponse,
    FunctionRegistrationRequest, LedgerValidationRequest, LedgerValidationResponse,
};
use ledger_client::{CallMetadata, Callback, LedgerPrivilegedStub, LedgerStub, TransportError};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Stub operations, used to target failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Certificate registration
    RegisterCert,
    /// Function registration
    RegisterFunction,
    /// Contract registration
    RegisterContract,
    /// Contract listing
    ListContracts,
    /// Ledger validation
    ValidateLedger,
    /// Contract execution
    ExecuteContract,
}

/// A request received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    /// Certificate registration
    RegisterCert(CertificateRegistrationRequest),
    /// Function registration
    RegisterFunction(FunctionRegistrationRequest),
    /// Contract registration
    RegisterContract(ContractRegistrationRequest),
    /// Contract listing
    ListContracts(ContractsListingRequest),
    /// Ledger validation
    ValidateLedger(LedgerValidationRequest),
    /// Contract execution
    ExecuteContract(ContractExecutionRequest),
}

/// One recorded call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The request
    pub request: RecordedRequest,
    /// Authorization entry of the call metadata
    pub authorization: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<RecordedCall>,
    failures: HashMap<Operation, TransportError>,
    dropped: HashSet<Operation>,
    listing_json: String,
    validation: LedgerValidationResponse,
    execution: ContractExecutionResponse,
    deferred: bool,
}

/// Mock implementation of both ledger stubs.
#[derive(Debug, Default)]
pub struct MockLedgerStub {
    state: Mutex<MockState>,
}

impl MockLedgerStub {
    /// Create a mock that succeeds with empty responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer contract listings with `json`.
    #[must_use]
    pub fn with_listing_json(self, json: impl Into<String>) -> Self {
        self.state().listing_json = json.into();
        self
    }

    /// Answer validations with `response`.
    #[must_use]
    pub fn with_validation(self, response: LedgerValidationResponse) -> Self {
        self.state().validation = response;
        self
    }

    /// Answer executions with `response`.
    #[must_use]
    pub fn with_execution(self, response: ContractExecutionResponse) -> Self {
        self.state().execution = response;
        self
    }

    /// Fail `operation` with `error`.
    #[must_use]
    pub fn failing(self, operation: Operation, error: TransportError) -> Self {
        self.state().failures.insert(operation, error);
        self
    }

    /// Drop the callback of `operation` without completing it.
    #[must_use]
    pub fn dropping(self, operation: Operation) -> Self {
        self.state().dropped.insert(operation);
        self
    }

    /// Complete callbacks from a spawned task instead of inline.
    #[must_use]
    pub fn deferred(self) -> Self {
        self.state().deferred = true;
        self
    }

    /// Every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Contract execution requests received so far.
    #[must_use]
    pub fn executions(&self) -> Vec<ContractExecutionRequest> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match &call.request {
                RecordedRequest::ExecuteContract(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn answer<T: Send + 'static>(
        &self,
        operation: Operation,
        request: RecordedRequest,
        metadata: &CallMetadata,
        response: impl FnOnce(&MockState) -> T,
        callback: Callback<T>,
    ) {
        let (outcome, deferred) = {
            let mut state = self.state();
            state.calls.push(RecordedCall {
                request,
                authorization: metadata.authorization().map(str::to_string),
            });
            if state.dropped.contains(&operation) {
                return;
            }
            let outcome = match state.failures.get(&operation) {
                Some(error) => Err(error.clone()),
                None => Ok(response(&state)),
            };
            (outcome, state.deferred)
        };

        if deferred {
            tokio::spawn(async move {
                tokio::task::yield_now().await;
                callback(outcome);
            });
        } else {
            callback(outcome);
        }
    }
}

impl LedgerStub for MockLedgerStub {
    fn register_contract(
        &self,
        request: ContractRegistrationRequest,
        metadata: &CallMetadata,
        callback: Callback<()>,
    ) {
        self.answer(
            Operation::RegisterContract,
            RecordedRequest::RegisterContract(request),
            metadata,
            |_| (),
            callback,
        );
    }

    fn list_contracts(
        &self,
        request: ContractsListingRequest,
        metadata: &CallMetadata,
        callback: Callback<ContractsListingResponse>,
    ) {
        self.answer(
            Operation::ListContracts,
            RecordedRequest::ListContracts(request),
            metadata,
            |state| ContractsListingResponse {
                json: state.listing_json.clone(),
            },
            callback,
        );
    }

    fn validate_ledger(
        &self,
        request: LedgerValidationRequest,
        metadata: &CallMetadata,
        callback: Callback<LedgerValidationResponse>,
    ) {
        self.answer(
            Operation::ValidateLedger,
            RecordedRequest::ValidateLedger(request),
            metadata,
            |state| state.validation.clone(),
            callback,
        );
    }

    fn execute_contract(
        &self,
        request: ContractExecutionRequest,
        metadata: &CallMetadata,
        callback: Callback<ContractExecutionResponse>,
    ) {
        self.answer(
            Operation::ExecuteContract,
            RecordedRequest::ExecuteContract(request),
            metadata,
            |state| state.execution.clone(),
            callback,
        );
    }
}

impl LedgerPrivilegedStub for MockLedgerStub {
    fn register_cert(
        &self,
        request: CertificateRegistrationRequest,
        metadata: &CallMetadata,
        callback: Callback<()>,
    ) {
        self.answer(
            Operation::RegisterCert,
            RecordedRequest::RegisterCert(request),
            metadata,
            |_| (),
            callback,
        );
    }

    fn register_function(
        &self,
        request: FunctionRegistrationRequest,
        metadata: &CallMetadata,
        callback: Callback<()>,
    ) {
        self.answer(
            Operation::RegisterFunction,
            RecordedRequest::RegisterFunction(request),
            metadata,
            |_| (),
            callback,
        );
    }
}
