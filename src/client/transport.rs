//! Transport layer for the agent runtime control and data planes.
//!
//! Provides the [`RuntimeTransport`] trait abstracting the consumed
//! capabilities (directory listing, invocation, status fetch, deletion), and
//! [`HttpTransport`] for the HTTP binding with opaque bearer-token auth.

use async_trait::async_trait;

use crate::error::AgentCoreResult;
use crate::types::{DeploymentStatus, InvocationRequest, InvocationResponse, RuntimeSummary};

/// Capabilities consumed from the external runtime service.
///
/// Implementations handle the low-level details of one protocol binding; the
/// client and decoder treat every operation here as opaque.
#[async_trait]
pub trait RuntimeTransport: Send + Sync {
    /// List currently registered runtime identities.
    ///
    /// Order is whatever the service returns, not otherwise guaranteed
    /// stable. An empty listing is a valid, non-error result.
    async fn list_runtimes(&self) -> AgentCoreResult<Vec<RuntimeSummary>>;

    /// Submit one invocation and obtain the raw response.
    ///
    /// The returned response owns its body stream exclusively; it is consumed
    /// exactly once.
    async fn invoke(&self, request: &InvocationRequest) -> AgentCoreResult<InvocationResponse>;

    /// Fetch the current deployment status of a runtime.
    async fn runtime_status(&self, runtime_id: &str) -> AgentCoreResult<DeploymentStatus>;

    /// Delete a runtime.
    async fn delete_runtime(&self, runtime_id: &str) -> AgentCoreResult<()>;
}

#[cfg(feature = "http")]
pub use http_transport::{HttpTransport, TransportConfig};

#[cfg(feature = "http")]
mod http_transport {
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use futures::TryStreamExt;
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
    use serde::Deserialize;
    use tracing::debug;

    use crate::error::{AgentCoreError, AgentCoreResult};
    use crate::types::{
        DeploymentStatus, InvocationRequest, InvocationResponse, RuntimeSummary,
    };

    use super::RuntimeTransport;

    /// Configuration for [`HttpTransport`].
    #[derive(Debug, Clone)]
    pub struct TransportConfig {
        /// Per-request timeout for control-plane calls (list, status,
        /// delete). Defaults to 60 seconds. Invocations are exempt: a
        /// streamed response legitimately outlives any fixed request timeout.
        pub timeout: Duration,
        /// Additional HTTP headers to include on every request.
        pub headers: HashMap<String, String>,
    }

    impl Default for TransportConfig {
        fn default() -> Self {
            Self {
                timeout: Duration::from_secs(60),
                headers: HashMap::new(),
            }
        }
    }

    /// HTTP binding for the runtime service, using `reqwest`.
    ///
    /// Control-plane operations (list, status, delete) are plain
    /// request/response JSON calls; invocation streams the response body
    /// without buffering it. Authentication is an opaque bearer token set by
    /// the caller; token issuance and refresh are out of scope.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use agentcore_rs::client::HttpTransport;
    ///
    /// let transport = HttpTransport::new("https://runtime.example.com")
    ///     .with_bearer_token("eyJraWQi...");
    /// ```
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: reqwest::Client,
        base_url: String,
        bearer_token: Option<String>,
        control_timeout: Duration,
    }

    impl HttpTransport {
        /// Create a transport targeting the given service base URL.
        ///
        /// Uses default configuration (60s control-plane timeout, no extra
        /// headers).
        pub fn new(base_url: impl Into<String>) -> Self {
            Self::with_config(base_url, TransportConfig::default())
        }

        /// Create a transport with custom configuration.
        pub fn with_config(base_url: impl Into<String>, config: TransportConfig) -> Self {
            let mut default_headers = HeaderMap::new();
            for (key, value) in &config.headers {
                if let (Ok(name), Ok(val)) = (
                    HeaderName::from_bytes(key.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    default_headers.insert(name, val);
                }
            }

            // No client-level timeout: it would also cap streamed invocation
            // bodies. Control-plane calls get a per-request timeout instead.
            let client = reqwest::Client::builder()
                .default_headers(default_headers)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new());

            Self {
                client,
                base_url: base_url.into().trim_end_matches('/').to_string(),
                bearer_token: None,
                control_timeout: config.timeout,
            }
        }

        /// Create a transport with an existing `reqwest::Client`.
        ///
        /// Useful when you want to share a connection pool or configure TLS
        /// settings externally.
        pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
            Self {
                client,
                base_url: base_url.into().trim_end_matches('/').to_string(),
                bearer_token: None,
                control_timeout: TransportConfig::default().timeout,
            }
        }

        /// Attach an opaque bearer token (builder-style).
        pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
            self.bearer_token = Some(token.into());
            self
        }

        /// The base URL this transport sends requests to.
        pub fn base_url(&self) -> &str {
            &self.base_url
        }

        fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
            let mut builder = self.client.request(method, url);
            if let Some(token) = &self.bearer_token {
                builder = builder.bearer_auth(token);
            }
            builder
        }

        /// Like [`request()`](Self::request) but with the control-plane
        /// timeout applied.
        fn control_request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
            self.request(method, url).timeout(self.control_timeout)
        }
    }

    /// Map a reqwest failure onto the crate's error kinds.
    fn map_request_error(e: reqwest::Error) -> AgentCoreError {
        if e.is_timeout() {
            AgentCoreError::Timeout(format!("request timed out: {e}"))
        } else if e.is_connect() {
            AgentCoreError::Transport(format!("connection failed: {e}"))
        } else {
            AgentCoreError::Transport(format!("HTTP request failed: {e}"))
        }
    }

    /// Convert a non-2xx response into `AgentCoreError::Http`.
    async fn check_status(response: reqwest::Response) -> AgentCoreResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentCoreError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    #[derive(Deserialize)]
    struct ListRuntimesResponse {
        #[serde(rename = "agentRuntimes", default)]
        agent_runtimes: Vec<RuntimeSummary>,
    }

    #[derive(Deserialize)]
    struct RuntimeStatusResponse {
        status: DeploymentStatus,
    }

    #[async_trait]
    impl RuntimeTransport for HttpTransport {
        async fn list_runtimes(&self) -> AgentCoreResult<Vec<RuntimeSummary>> {
            let url = format!("{}/runtimes", self.base_url);
            debug!(%url, "listing agent runtimes");

            let response = self
                .control_request(reqwest::Method::GET, url)
                .send()
                .await
                .map_err(map_request_error)?;
            let response = check_status(response).await?;

            let listing: ListRuntimesResponse = response.json().await.map_err(|e| {
                AgentCoreError::Decode(format!("failed to parse runtime listing: {e}"))
            })?;

            Ok(listing.agent_runtimes)
        }

        async fn invoke(
            &self,
            request: &InvocationRequest,
        ) -> AgentCoreResult<InvocationResponse> {
            let url = format!(
                "{}/runtimes/{}/invocations?qualifier={}",
                self.base_url,
                urlencoding::encode(&request.runtime_arn),
                urlencoding::encode(&request.qualifier),
            );
            debug!(runtime_arn = %request.runtime_arn, "invoking agent runtime");

            let response = self
                .request(reqwest::Method::POST, url)
                .header("Content-Type", "application/json")
                .header("Accept", "text/event-stream, application/json")
                .body(request.payload.clone())
                .send()
                .await
                .map_err(map_request_error)?;
            let response = check_status(response).await?;

            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();

            let body = response
                .bytes_stream()
                .map_err(|e| AgentCoreError::Transport(format!("error reading body: {e}")));

            Ok(InvocationResponse::new(
                content_type,
                Box::pin(body),
            ))
        }

        async fn runtime_status(&self, runtime_id: &str) -> AgentCoreResult<DeploymentStatus> {
            let url = format!(
                "{}/runtimes/{}",
                self.base_url,
                urlencoding::encode(runtime_id)
            );

            let response = self
                .control_request(reqwest::Method::GET, url)
                .send()
                .await
                .map_err(map_request_error)?;
            let response = check_status(response).await?;

            let status: RuntimeStatusResponse = response.json().await.map_err(|e| {
                AgentCoreError::Decode(format!("failed to parse runtime status: {e}"))
            })?;

            Ok(status.status)
        }

        async fn delete_runtime(&self, runtime_id: &str) -> AgentCoreResult<()> {
            let url = format!(
                "{}/runtimes/{}",
                self.base_url,
                urlencoding::encode(runtime_id)
            );
            debug!(%runtime_id, "deleting agent runtime");

            let response = self
                .control_request(reqwest::Method::DELETE, url)
                .send()
                .await
                .map_err(map_request_error)?;
            check_status(response).await?;

            Ok(())
        }
    }
}
