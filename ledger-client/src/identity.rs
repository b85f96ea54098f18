//! The caller's certificate identity.

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::runtime::Runtime;
use crate::signer::{SignatureSigner, signer_for};
use crate::transport::CallMetadata;
use secrecy::SecretString;
use std::fmt;
use std::sync::Arc;

/// Immutable identity used to sign and authorize every request.
///
/// Holds the certificate fields, the optional bearer credential and the
/// signing backend selected for the runtime.
#[derive(Clone)]
pub struct IdentityContext {
    cert_holder_id: String,
    cert_version: u32,
    cert_pem: String,
    credential: Option<SecretString>,
    signer: Arc<dyn SignatureSigner>,
    runtime: Runtime,
}

impl IdentityContext {
    /// Build the identity for `runtime` from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `CLIENT_IO_ERROR` if a required identity field is empty.
    pub fn new(config: &ClientConfig, runtime: Runtime) -> ClientResult<Self> {
        config.validate()?;
        let signer = signer_for(runtime, config.private_key_pem.clone());
        Ok(Self::assemble(config, signer, runtime))
    }

    /// Build the identity with an explicit signing backend.
    ///
    /// # Errors
    ///
    /// Returns `CLIENT_IO_ERROR` if a required identity field is empty.
    pub fn with_signer(
        config: &ClientConfig,
        signer: Arc<dyn SignatureSigner>,
        runtime: Runtime,
    ) -> ClientResult<Self> {
        config.validate()?;
        Ok(Self::assemble(config, signer, runtime))
    }

    fn assemble(config: &ClientConfig, signer: Arc<dyn SignatureSigner>, runtime: Runtime) -> Self {
        Self {
            cert_holder_id: config.cert_holder_id.clone(),
            cert_version: config.cert_version,
            cert_pem: config.cert_pem.clone(),
            credential: config.credential.clone(),
            signer,
            runtime,
        }
    }

    /// Certificate holder id.
    #[must_use]
    pub fn cert_holder_id(&self) -> &str {
        &self.cert_holder_id
    }

    /// Certificate version.
    #[must_use]
    pub const fn cert_version(&self) -> u32 {
        self.cert_version
    }

    /// Certificate PEM.
    #[must_use]
    pub fn cert_pem(&self) -> &str {
        &self.cert_pem
    }

    /// Runtime the identity was built for.
    #[must_use]
    pub const fn runtime(&self) -> Runtime {
        self.runtime
    }

    /// Signing backend.
    #[must_use]
    pub fn signer(&self) -> &dyn SignatureSigner {
        self.signer.as_ref()
    }

    /// Metadata to send with each call.
    #[must_use]
    pub fn call_metadata(&self) -> CallMetadata {
        match &self.credential {
            Some(credential) => CallMetadata::new().with_authorization(credential.clone()),
            None => CallMetadata::new(),
        }
    }
}

impl fmt::Debug for IdentityContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityContext")
            .field("cert_holder_id", &self.cert_holder_id)
            .field("cert_version", &self.cert_version)
            .field("credential", &self.credential.as_ref().map(|_| "[REDACTED]"))
            .field("runtime", &self.runtime)
            .finish_non_exhaustive()
    }
}
