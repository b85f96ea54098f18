//! Runtime environment detection.

/// The environment the client is running in.
///
/// The runtime decides which signing backend signs requests and how failure
/// metadata is read back from the transport. It is resolved once, when the
/// client identity is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Runtime {
    /// A native process with an operating system underneath.
    #[default]
    Native,
    /// A browser host (`wasm32` without an operating system).
    Browser,
}

impl Runtime {
    /// Detect the runtime from the compilation target.
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(all(target_arch = "wasm32", target_os = "unknown")) {
            Self::Browser
        } else {
            Self::Native
        }
    }

    /// Whether this is the native runtime.
    #[must_use]
    pub const fn is_native(self) -> bool {
        matches!(self, Self::Native)
    }
}
