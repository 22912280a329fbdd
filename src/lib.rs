//! # agentcore-rs — client SDK for managed agent runtimes
//!
//! A Rust client for a hosted "agent runtime" service: deployed execution
//! units that accept an invocation payload and reply with either a streamed
//! event sequence or a JSON document. The crate covers the parts of that
//! interaction where careless handling silently loses data or hangs:
//!
//! - **Streaming response decoding** — [`client::StreamingResponseDecoder`]
//!   dispatches on the declared content-type and turns an event-stream body
//!   into a lazy, strictly ordered sequence of text fragments (with the full
//!   raw transcript kept alongside), reassembles chunked JSON bodies into one
//!   document, and passes anything else through untouched.
//! - **Deployment status polling** — [`client::poll_until_terminal`] waits
//!   for a deployed resource to settle into a terminal state
//!   (`READY` / `CREATE_FAILED` / `UPDATE_FAILED` / `DELETE_FAILED`) with a
//!   fixed interval, a bounded attempt count, and token-based cancellation.
//! - **Invocation orchestration** — [`client::RuntimeClient`] lists the
//!   registered runtime identities, submits a payload, and drives the decoder
//!   while emitting fragments to a caller-supplied sink.
//!
//! ## Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `http`  | yes     | HTTP transport for the control and data planes (reqwest) |
//!
//! With `http` disabled the crate is transport-agnostic: implement
//! [`client::RuntimeTransport`] over whatever binding you have.
//!
//! ## Quick Start
//!
//! ```no_run
//! use agentcore_rs::client::{BufferSink, HttpTransport, RuntimeClient};
//! use agentcore_rs::types::InvocationRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::new("https://runtime.example.com")
//!         .with_bearer_token(std::env::var("RUNTIME_TOKEN")?);
//!     let client = RuntimeClient::with_transport(Box::new(transport));
//!
//!     // Pick a runtime and stream a reply into a buffer.
//!     let runtime = client.first_available().await?;
//!     let request = InvocationRequest::from_prompt(&runtime.arn, "Tell me a story");
//!     let mut sink = BufferSink::new();
//!     client.invoke_with_sink(&request, &mut sink).await?;
//!     println!("{}", sink.concatenated());
//!     Ok(())
//! }
//! ```
//!
//! ## Waiting for a deployment
//!
//! ```no_run
//! use agentcore_rs::client::{PollConfig, RuntimeClient};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(client: RuntimeClient) -> agentcore_rs::AgentCoreResult<()> {
//! let cancel = CancellationToken::new();
//! let status = client
//!     .wait_until_terminal("support_agent-x1", &PollConfig::default(), &cancel)
//!     .await?;
//! if status.is_failed() {
//!     eprintln!("deployment failed: {status}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod types;

/// Prelude module that re-exports the most commonly used types.
///
/// Import with `use agentcore_rs::prelude::*;`.
pub mod prelude {
    pub use crate::client::{
        BufferSink, ConsoleSink, DecodedResponse, FnSink, FragmentSink, FragmentStream,
        InvocationOutcome, PollConfig, RuntimeClient, RuntimeTransport, StatusFetcher,
        StreamingResponseDecoder,
    };
    pub use crate::error::{AgentCoreError, AgentCoreResult};
    pub use crate::types::{
        ContentType, DeploymentStatus, InvocationRequest, InvocationResponse, RuntimeSummary,
        StreamEvent,
    };

    #[cfg(feature = "http")]
    pub use crate::client::{HttpTransport, TransportConfig};
}

// Re-export core types at crate root for convenience.
pub use error::{AgentCoreError, AgentCoreResult};
pub use types::*;
