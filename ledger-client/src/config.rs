//! Client configuration.
//!
//! Configuration is read from a property map (the JSON object applications
//! already use for client properties) or from environment variables, and is
//! validated before any connection is attempted. Every configuration failure
//! is reported as `CLIENT_IO_ERROR`.

use crate::error::{ClientError, ClientResult};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use std::env;
use std::time::Duration;
use url::Url;

/// Default certificate version when none is configured.
pub const DEFAULT_CERT_VERSION: u32 = 1;

const DEFAULT_SERVER_HOST: &str = "localhost";
const DEFAULT_SERVER_PORT: u16 = 50051;
const DEFAULT_PRIVILEGED_PORT: u16 = 50052;
const DEFAULT_CONNECT_TIMEOUT_MILLIS: u64 = 5_000;
const DEFAULT_REQUEST_TIMEOUT_MILLIS: u64 = 30_000;

/// A recognized configuration key, addressable as a property or an env var.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigKey {
    /// Property-map key
    pub property: &'static str,
    /// Environment variable name
    pub env: &'static str,
}

impl ConfigKey {
    const fn new(property: &'static str, env: &'static str) -> Self {
        Self { property, env }
    }
}

/// Server host.
pub const SERVER_HOST: ConfigKey =
    ConfigKey::new("scalar.ledger.client.server_host", "LEDGER_CLIENT_SERVER_HOST");
/// Server port for regular operations.
pub const SERVER_PORT: ConfigKey =
    ConfigKey::new("scalar.ledger.client.server_port", "LEDGER_CLIENT_SERVER_PORT");
/// Server port for privileged operations.
pub const SERVER_PRIVILEGED_PORT: ConfigKey = ConfigKey::new(
    "scalar.ledger.client.server_privileged_port",
    "LEDGER_CLIENT_SERVER_PRIVILEGED_PORT",
);
/// Whether TLS is enabled.
pub const TLS_ENABLED: ConfigKey =
    ConfigKey::new("scalar.ledger.client.tls.enabled", "LEDGER_CLIENT_TLS_ENABLED");
/// Private key PEM.
pub const PRIVATE_KEY_PEM: ConfigKey = ConfigKey::new(
    "scalar.ledger.client.private_key_pem",
    "LEDGER_CLIENT_PRIVATE_KEY_PEM",
);
/// Certificate PEM.
pub const CERT_PEM: ConfigKey =
    ConfigKey::new("scalar.ledger.client.cert_pem", "LEDGER_CLIENT_CERT_PEM");
/// Certificate holder id.
pub const CERT_HOLDER_ID: ConfigKey = ConfigKey::new(
    "scalar.ledger.client.cert_holder_id",
    "LEDGER_CLIENT_CERT_HOLDER_ID",
);
/// Certificate version.
pub const CERT_VERSION: ConfigKey =
    ConfigKey::new("scalar.ledger.client.cert_version", "LEDGER_CLIENT_CERT_VERSION");
/// Bearer credential sent as the `authorization` metadata entry.
pub const AUTHORIZATION_CREDENTIAL: ConfigKey = ConfigKey::new(
    "scalar.ledger.client.authorization.credential",
    "LEDGER_CLIENT_AUTHORIZATION_CREDENTIAL",
);
/// Connect timeout in milliseconds.
pub const CONNECT_TIMEOUT_MILLIS: ConfigKey = ConfigKey::new(
    "scalar.ledger.client.connect_timeout_millis",
    "LEDGER_CLIENT_CONNECT_TIMEOUT_MILLIS",
);
/// Request timeout in milliseconds.
pub const REQUEST_TIMEOUT_MILLIS: ConfigKey = ConfigKey::new(
    "scalar.ledger.client.request_timeout_millis",
    "LEDGER_CLIENT_REQUEST_TIMEOUT_MILLIS",
);

/// Ledger client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server host
    pub server_host: String,
    /// Port of the regular ledger service
    pub server_port: u16,
    /// Port of the privileged ledger service
    pub server_privileged_port: u16,
    /// Whether to connect over TLS
    pub tls_enabled: bool,
    /// Caller's EC private key (SEC1 or PKCS#8 PEM)
    pub private_key_pem: SecretString,
    /// Caller's certificate PEM
    pub cert_pem: String,
    /// Certificate holder id
    pub cert_holder_id: String,
    /// Certificate version
    pub cert_version: u32,
    /// Optional bearer credential
    pub credential: Option<SecretString>,
    /// Transport connect timeout
    pub connect_timeout: Duration,
    /// Transport request timeout
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration from the three identity fields, with defaults
    /// for everything else.
    #[must_use]
    pub fn new(
        cert_holder_id: impl Into<String>,
        cert_pem: impl Into<String>,
        private_key_pem: impl Into<String>,
    ) -> Self {
        Self {
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            server_privileged_port: DEFAULT_PRIVILEGED_PORT,
            tls_enabled: false,
            private_key_pem: SecretString::from(private_key_pem.into()),
            cert_pem: cert_pem.into(),
            cert_holder_id: cert_holder_id.into(),
            cert_version: DEFAULT_CERT_VERSION,
            credential: None,
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MILLIS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MILLIS),
        }
    }

    /// Load configuration from a JSON property map.
    ///
    /// # Errors
    ///
    /// Returns `CLIENT_IO_ERROR` if `properties` is not an object, a required
    /// property is missing or empty, or a property has the wrong type.
    pub fn from_properties(properties: &Value) -> ClientResult<Self> {
        let map = properties
            .as_object()
            .ok_or_else(|| ClientError::client_io("client properties must be a JSON object"))?;
        Self::load(&PropertySource(map))
    }

    /// Load configuration from `LEDGER_CLIENT_*` environment variables,
    /// reading a `.env` file first if one is present.
    ///
    /// # Errors
    ///
    /// Returns `CLIENT_IO_ERROR` if a required variable is missing or a
    /// variable cannot be parsed.
    pub fn from_env() -> ClientResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::load(&LookupSource(lookup))
    }

    fn load(source: &impl ConfigSource) -> ClientResult<Self> {
        let private_key_pem = source.required_string(PRIVATE_KEY_PEM)?;
        let cert_pem = source.required_string(CERT_PEM)?;
        let cert_holder_id = source.required_string(CERT_HOLDER_ID)?;

        let mut config = Self::new(cert_holder_id, cert_pem, private_key_pem);

        if let Some(host) = source.string(SERVER_HOST)? {
            config.server_host = host;
        }
        if let Some(port) = source.integer(SERVER_PORT)? {
            config.server_port = to_port(SERVER_PORT, port)?;
        }
        if let Some(port) = source.integer(SERVER_PRIVILEGED_PORT)? {
            config.server_privileged_port = to_port(SERVER_PRIVILEGED_PORT, port)?;
        }
        if let Some(enabled) = source.boolean(TLS_ENABLED)? {
            config.tls_enabled = enabled;
        }
        if let Some(version) = source.integer(CERT_VERSION)? {
            config.cert_version = u32::try_from(version).map_err(|_| {
                ClientError::client_io(format!(
                    "property '{}' is out of range",
                    CERT_VERSION.property
                ))
            })?;
        }
        config.credential = source
            .string(AUTHORIZATION_CREDENTIAL)?
            .filter(|credential| !credential.is_empty())
            .map(SecretString::from);
        if let Some(millis) = source.integer(CONNECT_TIMEOUT_MILLIS)? {
            config.connect_timeout = Duration::from_millis(millis);
        }
        if let Some(millis) = source.integer(REQUEST_TIMEOUT_MILLIS)? {
            config.request_timeout = Duration::from_millis(millis);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the server host.
    #[must_use]
    pub fn with_server_host(mut self, host: impl Into<String>) -> Self {
        self.server_host = host.into();
        self
    }

    /// Set the regular and privileged server ports.
    #[must_use]
    pub const fn with_ports(mut self, port: u16, privileged_port: u16) -> Self {
        self.server_port = port;
        self.server_privileged_port = privileged_port;
        self
    }

    /// Enable or disable TLS.
    #[must_use]
    pub const fn with_tls(mut self, enabled: bool) -> Self {
        self.tls_enabled = enabled;
        self
    }

    /// Set the certificate version.
    #[must_use]
    pub const fn with_cert_version(mut self, version: u32) -> Self {
        self.cert_version = version;
        self
    }

    /// Set the bearer credential.
    #[must_use]
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(SecretString::from(credential.into()));
        self
    }

    /// Set transport timeouts.
    #[must_use]
    pub const fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }

    /// Check the invariants the identity relies on.
    ///
    /// # Errors
    ///
    /// Returns `CLIENT_IO_ERROR` when an identity field is empty or a port is zero.
    pub fn validate(&self) -> ClientResult<()> {
        if self.private_key_pem.expose_secret().is_empty() {
            return Err(required(PRIVATE_KEY_PEM));
        }
        if self.cert_pem.is_empty() {
            return Err(required(CERT_PEM));
        }
        if self.cert_holder_id.is_empty() {
            return Err(required(CERT_HOLDER_ID));
        }
        if self.server_port == 0 {
            return Err(invalid_port(SERVER_PORT));
        }
        if self.server_privileged_port == 0 {
            return Err(invalid_port(SERVER_PRIVILEGED_PORT));
        }
        Ok(())
    }

    /// Endpoint of the regular ledger service.
    ///
    /// # Errors
    ///
    /// Returns `CLIENT_IO_ERROR` if the host does not form a valid URL.
    pub fn endpoint(&self) -> ClientResult<Url> {
        self.endpoint_for(self.server_port)
    }

    /// Endpoint of the privileged ledger service.
    ///
    /// # Errors
    ///
    /// Returns `CLIENT_IO_ERROR` if the host does not form a valid URL.
    pub fn privileged_endpoint(&self) -> ClientResult<Url> {
        self.endpoint_for(self.server_privileged_port)
    }

    fn endpoint_for(&self, port: u16) -> ClientResult<Url> {
        let scheme = if self.tls_enabled { "https" } else { "http" };
        Url::parse(&format!("{scheme}://{}:{port}", self.server_host)).map_err(|e| {
            ClientError::client_io(format!(
                "invalid server address '{}': {e}",
                self.server_host
            ))
        })
    }
}

fn required(key: ConfigKey) -> ClientError {
    ClientError::client_io(format!("property '{}' is required", key.property))
}

fn invalid_port(key: ConfigKey) -> ClientError {
    ClientError::client_io(format!(
        "property '{}' must be between 1 and 65535",
        key.property
    ))
}

fn to_port(key: ConfigKey, value: u64) -> ClientResult<u16> {
    match u16::try_from(value) {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(invalid_port(key)),
    }
}

trait ConfigSource {
    fn string(&self, key: ConfigKey) -> ClientResult<Option<String>>;
    fn boolean(&self, key: ConfigKey) -> ClientResult<Option<bool>>;
    fn integer(&self, key: ConfigKey) -> ClientResult<Option<u64>>;

    fn required_string(&self, key: ConfigKey) -> ClientResult<String> {
        match self.string(key)? {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(required(key)),
        }
    }
}

struct PropertySource<'a>(&'a Map<String, Value>);

impl ConfigSource for PropertySource<'_> {
    fn string(&self, key: ConfigKey) -> ClientResult<Option<String>> {
        match self.0.get(key.property) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(ClientError::client_io(format!(
                "property '{}' is not a string",
                key.property
            ))),
        }
    }

    fn boolean(&self, key: ConfigKey) -> ClientResult<Option<bool>> {
        match self.0.get(key.property) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(value)) => Ok(Some(*value)),
            Some(_) => Err(ClientError::client_io(format!(
                "property '{}' is not a boolean",
                key.property
            ))),
        }
    }

    fn integer(&self, key: ConfigKey) -> ClientResult<Option<u64>> {
        match self.0.get(key.property) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(number)) => number.as_u64().map(Some).ok_or_else(|| {
                ClientError::client_io(format!(
                    "property '{}' is not a non-negative integer",
                    key.property
                ))
            }),
            Some(Value::String(text)) => parse_integer(key.property, text).map(Some),
            Some(_) => Err(ClientError::client_io(format!(
                "property '{}' is not an integer",
                key.property
            ))),
        }
    }
}

struct LookupSource<F>(F);

impl<F> ConfigSource for LookupSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: ConfigKey) -> ClientResult<Option<String>> {
        Ok((self.0)(key.env))
    }

    fn boolean(&self, key: ConfigKey) -> ClientResult<Option<bool>> {
        (self.0)(key.env)
            .map(|value| {
                value.trim().parse::<bool>().map_err(|_| {
                    ClientError::client_io(format!("variable '{}' is not a boolean", key.env))
                })
            })
            .transpose()
    }

    fn integer(&self, key: ConfigKey) -> ClientResult<Option<u64>> {
        (self.0)(key.env)
            .map(|value| parse_integer(key.env, &value))
            .transpose()
    }
}

fn parse_integer(name: &str, text: &str) -> ClientResult<u64> {
    text.trim()
        .parse::<u64>()
        .map_err(|e| ClientError::client_io(format!("'{name}' is not a valid integer: {e}")))
}
