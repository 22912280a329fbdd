//! Client side of the agent runtime service.
//!
//! - [`RuntimeClient`] — resolve a runtime identity and drive invocations
//!   end to end
//! - [`StreamingResponseDecoder`] / [`FragmentStream`] — decode streamed
//!   invocation responses incrementally
//! - [`poll_until_terminal`] — wait for a deployment to settle into a
//!   terminal state
//! - [`RuntimeTransport`] / [`HttpTransport`] — pluggable transport layer
//!
//! # Quick Start
//!
//! ```no_run
//! use agentcore_rs::client::{ConsoleSink, HttpTransport, RuntimeClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new("https://runtime.example.com")
//!     .with_bearer_token(std::env::var("RUNTIME_TOKEN")?);
//! let client = RuntimeClient::with_transport(Box::new(transport));
//!
//! // Stream a reply from the first registered runtime to the console.
//! let mut sink = ConsoleSink;
//! client
//!     .invoke_text("What is the weather like in Seattle?", &mut sink)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod decoder;
mod poller;
mod runtime_client;
mod sink;
mod transport;

pub use decoder::{DecodedResponse, FragmentStream, StreamingResponseDecoder};
pub use poller::{poll_until_terminal, PollConfig, StatusFetcher};
pub use runtime_client::{InvocationOutcome, RuntimeClient};
pub use sink::{BufferSink, ConsoleSink, FnSink, FragmentSink};
pub use transport::RuntimeTransport;

#[cfg(feature = "http")]
pub use transport::{HttpTransport, TransportConfig};
