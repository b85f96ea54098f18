//! Scenario harness for end-to-end ledger client tests.
//!
//! Wires a [`ClientService`] for the sample identity to a shared
//! [`MockLedgerStub`] standing in for both ledger services. Client events are
//! logged at debug level; `RUST_LOG` overrides that.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use ledger_client::{
    ClientConfig, ClientResult, ClientService, LedgerPrivilegedStub, LedgerStub, LogFormat,
    Runtime, init_tracing,
};
use ledger_test_utils::MockLedgerStub;
use ledger_test_utils::fixtures::client_config;
use std::sync::Arc;

/// A client wired to a mock ledger.
pub struct Scenario {
    /// Client under test
    pub client: ClientService,
    /// Mock answering both services
    pub ledger: Arc<MockLedgerStub>,
}

impl Scenario {
    /// Native-runtime client for the sample identity.
    ///
    /// # Errors
    ///
    /// Fails if the sample configuration is rejected.
    pub fn native(ledger: MockLedgerStub) -> ClientResult<Self> {
        Self::build(&client_config(), Runtime::Native, ledger)
    }

    /// Browser-runtime client for the sample identity.
    ///
    /// # Errors
    ///
    /// Fails if the sample configuration is rejected.
    pub fn browser(ledger: MockLedgerStub) -> ClientResult<Self> {
        Self::build(&client_config(), Runtime::Browser, ledger)
    }

    /// Client for an arbitrary configuration and runtime.
    ///
    /// # Errors
    ///
    /// Fails if `config` is rejected.
    pub fn build(
        config: &ClientConfig,
        runtime: Runtime,
        ledger: MockLedgerStub,
    ) -> ClientResult<Self> {
        init_tracing(tracing::Level::DEBUG, LogFormat::Text);
        let ledger = Arc::new(ledger);
        let client = ClientService::with_runtime(
            config,
            runtime,
            Arc::clone(&ledger) as Arc<dyn LedgerStub>,
            Arc::clone(&ledger) as Arc<dyn LedgerPrivilegedStub>,
        )?;
        tracing::debug!(?runtime, "Scenario client ready");
        Ok(Self { client, ledger })
    }
}
