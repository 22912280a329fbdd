//! Deployment status polling.
//!
//! Blocks the caller (cooperatively) until an external resource settles into
//! a terminal state, using fixed-interval polling with a bounded attempt
//! count and token-based cancellation.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{AgentCoreError, AgentCoreResult};
use crate::types::DeploymentStatus;

/// A status-fetch capability: one no-argument operation returning the
/// resource's current deployment status.
///
/// The status source is treated as opaque; it is re-fetched on every attempt
/// and never mutated locally.
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    /// Fetch the current status.
    async fn fetch_status(&self) -> AgentCoreResult<DeploymentStatus>;
}

/// Configuration for [`poll_until_terminal`].
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Wait between non-terminal fetches. Defaults to 10 seconds.
    pub interval: Duration,
    /// Maximum number of fetches before giving up with
    /// [`AgentCoreError::Timeout`]. `None` polls forever; the default is 60
    /// attempts, ten minutes at the default interval.
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: Some(60),
        }
    }
}

impl PollConfig {
    /// Override the fetch interval (builder-style).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Override or remove the attempt bound (builder-style).
    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

/// Poll `fetcher` until the status reaches a terminal state.
///
/// The first fetch happens immediately; if it already returns a terminal
/// status there is no wait at all. Otherwise the poller sleeps
/// `config.interval` between fetches. A status sequence
/// `[CREATING, CREATING, READY]` costs exactly three fetches.
///
/// Returns the terminal [`DeploymentStatus`]. `*_FAILED` states are returned,
/// not raised — interpreting them as deployment failure is the caller's
/// decision.
///
/// # Errors
///
/// - [`AgentCoreError::Timeout`] once `max_attempts` fetches have all come
///   back non-terminal.
/// - [`AgentCoreError::Canceled`] if `cancel` fires while waiting.
/// - Any error from the fetcher itself, propagated on the attempt it occurs.
pub async fn poll_until_terminal(
    fetcher: &dyn StatusFetcher,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> AgentCoreResult<DeploymentStatus> {
    let mut attempts: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(AgentCoreError::Canceled);
        }

        let status = fetcher.fetch_status().await?;
        attempts += 1;
        debug!(%status, attempts, "polled deployment status");

        if status.is_terminal() {
            return Ok(status);
        }

        if let Some(max) = config.max_attempts {
            if attempts >= max {
                return Err(AgentCoreError::Timeout(format!(
                    "status still {status} after {attempts} attempts"
                )));
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(AgentCoreError::Canceled),
            _ = tokio::time::sleep(config.interval) => {}
        }
    }
}
