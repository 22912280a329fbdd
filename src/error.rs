//! Error types for agent runtime invocation and status polling.
//!
//! All fallible operations in this crate return [`AgentCoreResult`], built on
//! a single [`AgentCoreError`] enum. Decode failures and transport failures
//! abort the current operation with a descriptive error; they are never
//! swallowed into a generic "no output" state.

/// Unified error type for runtime invocation, decoding, and polling.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AgentCoreError {
    /// Malformed JSON in a `data: `-prefixed stream line, or in a fully
    /// reassembled JSON response body.
    ///
    /// Raised only for payloads the server contract guarantees are JSON;
    /// lines without the `data: ` prefix are retained verbatim instead.
    #[error("Decode error: {0}")]
    Decode(String),

    /// I/O failure while reading the response chunk source or talking to the
    /// control plane (connection reset, broken pipe, invalid UTF-8 framing).
    ///
    /// Fatal to the current invocation; this crate does not retry.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A request timed out, or a status poll exhausted its attempt bound
    /// without reaching a terminal state.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The operation was canceled via its cancellation token.
    #[error("Operation canceled")]
    Canceled,

    /// The runtime directory listing returned zero identities.
    ///
    /// A distinct variant so callers cannot confuse "nothing deployed" with a
    /// successful call, and never invoke with an undefined identity.
    #[error("No agent runtimes are registered")]
    EmptyDirectory,

    /// Non-2xx HTTP response from the control or data plane.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Catch-all for errors that don't fit other categories.
    #[error("{0}")]
    Other(String),
}

/// Convenience result type for runtime operations.
pub type AgentCoreResult<T> = Result<T, AgentCoreError>;

impl AgentCoreError {
    /// Create a `Decode` error from anything displayable.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a `Transport` error from anything displayable.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a `Timeout` error from anything displayable.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// True if this error means the remote sent bytes we could not decode,
    /// as opposed to a failure reaching the remote at all.
    pub fn is_decode(&self) -> bool {
        matches!(self, AgentCoreError::Decode(_))
    }
}

impl From<serde_json::Error> for AgentCoreError {
    fn from(err: serde_json::Error) -> Self {
        AgentCoreError::Decode(err.to_string())
    }
}
