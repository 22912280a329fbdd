//! High-level client for invoking deployed agent runtimes.
//!
//! Ties the directory listing, the invocation capability, the streaming
//! decoder, and the status poller together for the interactive use case. The
//! client holds no per-invocation state; each call owns its own response
//! stream and discards everything when it returns.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{AgentCoreError, AgentCoreResult};
use crate::types::{DeploymentStatus, InvocationRequest, InvocationResponse, RuntimeSummary};

use super::decoder::{DecodedResponse, StreamingResponseDecoder};
use super::poller::{poll_until_terminal, PollConfig, StatusFetcher};
use super::sink::FragmentSink;
use super::transport::RuntimeTransport;

/// The result of one fully driven invocation.
#[derive(Debug)]
pub enum InvocationOutcome {
    /// The response streamed; fragments were already emitted to the sink and
    /// this carries the full raw frame transcript.
    Stream {
        /// Raw frames in arrival order.
        transcript: Vec<String>,
    },
    /// The response was a single JSON document.
    Json(serde_json::Value),
    /// Unrecognized content-type; the raw response for the caller to handle.
    Opaque(InvocationResponse),
}

/// Client for a managed agent runtime service.
///
/// # Construction
///
/// ```no_run
/// use agentcore_rs::client::{HttpTransport, RuntimeClient};
///
/// let transport = HttpTransport::new("https://runtime.example.com")
///     .with_bearer_token("eyJraWQi...");
/// let client = RuntimeClient::with_transport(Box::new(transport));
/// ```
pub struct RuntimeClient {
    transport: Box<dyn RuntimeTransport>,
}

impl std::fmt::Debug for RuntimeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeClient").finish_non_exhaustive()
    }
}

impl RuntimeClient {
    /// Create a client over any transport implementation.
    pub fn with_transport(transport: Box<dyn RuntimeTransport>) -> Self {
        Self { transport }
    }

    /// Create a client over an [`HttpTransport`](super::HttpTransport) for
    /// the given base URL.
    #[cfg(feature = "http")]
    pub fn from_endpoint(base_url: &str) -> Self {
        Self::with_transport(Box::new(super::HttpTransport::new(base_url)))
    }

    /// List currently registered runtime identities, in the order the
    /// service returns them.
    ///
    /// An empty listing is a valid result here; use
    /// [`first_available()`](Self::first_available) when an identity is
    /// required.
    pub async fn list_runtimes(&self) -> AgentCoreResult<Vec<RuntimeSummary>> {
        self.transport.list_runtimes().await
    }

    /// The first registered runtime, per the service's own ordering.
    ///
    /// # Errors
    ///
    /// [`AgentCoreError::EmptyDirectory`] if nothing is registered, so
    /// callers never invoke with an undefined identity.
    pub async fn first_available(&self) -> AgentCoreResult<RuntimeSummary> {
        let runtimes = self.transport.list_runtimes().await?;
        match runtimes.into_iter().next() {
            Some(runtime) => Ok(runtime),
            None => {
                warn!("runtime directory is empty; nothing to invoke");
                Err(AgentCoreError::EmptyDirectory)
            }
        }
    }

    /// Submit one invocation and dispatch its response by content-type.
    ///
    /// The event-stream arm of the returned [`DecodedResponse`] is lazy; pull
    /// fragments from it or use [`invoke_with_sink()`](Self::invoke_with_sink)
    /// to drive it in one call.
    ///
    /// Decode and transport errors surface to the caller; a failed invocation
    /// is fatal to that call and is not retried.
    pub async fn invoke(&self, request: &InvocationRequest) -> AgentCoreResult<DecodedResponse> {
        let response = self.transport.invoke(request).await?;
        debug!(content_type = %response.content_type(), "invocation response received");
        StreamingResponseDecoder::decode(response).await
    }

    /// Submit one invocation and drive it to completion, emitting streamed
    /// fragments to `sink` as they arrive.
    pub async fn invoke_with_sink(
        &self,
        request: &InvocationRequest,
        sink: &mut dyn FragmentSink,
    ) -> AgentCoreResult<InvocationOutcome> {
        match self.invoke(request).await? {
            DecodedResponse::EventStream(mut stream) => {
                stream.forward_to(sink).await?;
                Ok(InvocationOutcome::Stream {
                    transcript: stream.into_transcript(),
                })
            }
            DecodedResponse::Json(value) => Ok(InvocationOutcome::Json(value)),
            DecodedResponse::Opaque(response) => Ok(InvocationOutcome::Opaque(response)),
        }
    }

    /// Send a prompt to the first available runtime.
    ///
    /// Convenience for the interactive flow: resolves the directory, builds a
    /// `{"prompt": ...}` payload against the `DEFAULT` qualifier, and drives
    /// the response through `sink`.
    pub async fn invoke_text(
        &self,
        prompt: &str,
        sink: &mut dyn FragmentSink,
    ) -> AgentCoreResult<InvocationOutcome> {
        let runtime = self.first_available().await?;
        debug!(runtime = %runtime.name, "invoking first available runtime");
        let request = InvocationRequest::from_prompt(&runtime.arn, prompt);
        self.invoke_with_sink(&request, sink).await
    }

    /// Fetch a runtime's current deployment status once.
    pub async fn runtime_status(&self, runtime_id: &str) -> AgentCoreResult<DeploymentStatus> {
        self.transport.runtime_status(runtime_id).await
    }

    /// Poll a runtime's deployment status until it settles into a terminal
    /// state.
    ///
    /// Returns the terminal status; `*_FAILED` values are returned for the
    /// caller to interpret, not raised. See
    /// [`poll_until_terminal`](super::poll_until_terminal) for the bound and
    /// cancellation semantics.
    pub async fn wait_until_terminal(
        &self,
        runtime_id: &str,
        config: &PollConfig,
        cancel: &CancellationToken,
    ) -> AgentCoreResult<DeploymentStatus> {
        let fetcher = TransportStatusFetcher {
            transport: self.transport.as_ref(),
            runtime_id,
        };
        poll_until_terminal(&fetcher, config, cancel).await
    }

    /// Delete a runtime.
    pub async fn delete_runtime(&self, runtime_id: &str) -> AgentCoreResult<()> {
        self.transport.delete_runtime(runtime_id).await
    }
}

/// Adapts a transport's status operation to the poller's fetch capability.
struct TransportStatusFetcher<'a> {
    transport: &'a dyn RuntimeTransport,
    runtime_id: &'a str,
}

#[async_trait]
impl StatusFetcher for TransportStatusFetcher<'_> {
    async fn fetch_status(&self) -> AgentCoreResult<DeploymentStatus> {
        self.transport.runtime_status(self.runtime_id).await
    }
}
