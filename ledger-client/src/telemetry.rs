//! Log output for applications embedding the client.
//!
//! Every event the client emits lives under the [`CLIENT_TARGET`] target.
//! Nothing is printed until a subscriber is installed, either by the
//! application itself or with [`init_tracing`].

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Target prefix of every client event.
pub const CLIENT_TARGET: &str = "ledger_client";

/// Line format written by [`init_tracing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per event, with the enclosing operation span.
    Json,
}

/// Filter directives showing client events at `level` and everything else,
/// including the transport crates, at `warn`.
#[must_use]
pub fn client_directives(level: Level) -> String {
    format!(
        "warn,{CLIENT_TARGET}={}",
        level.as_str().to_ascii_lowercase()
    )
}

/// Install a global subscriber for client events.
///
/// `RUST_LOG` wins over [`client_directives`] when set. Returns `false` if a
/// subscriber was already installed; that one stays in place.
pub fn init_tracing(level: Level, format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(client_directives(level)));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Text => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
    }
    .is_ok();

    if installed {
        tracing::debug!(?format, "Client tracing installed");
    }
    installed
}
