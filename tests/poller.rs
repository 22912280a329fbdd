//! Status poller semantics: fetch counts, interval waits, the attempt bound,
//! and cancellation. Uses a scripted fetcher and tokio's paused clock so no
//! test actually sleeps.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use agentcore_rs::client::{poll_until_terminal, PollConfig, StatusFetcher};
use agentcore_rs::error::{AgentCoreError, AgentCoreResult};
use agentcore_rs::types::DeploymentStatus;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Returns a scripted status sequence, repeating the last entry forever.
struct ScriptedFetcher {
    script: Mutex<Vec<DeploymentStatus>>,
    fetches: AtomicU32,
}

impl ScriptedFetcher {
    fn new(script: Vec<DeploymentStatus>) -> Self {
        Self {
            script: Mutex::new(script),
            fetches: AtomicU32::new(0),
        }
    }

    fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusFetcher for ScriptedFetcher {
    async fn fetch_status(&self) -> AgentCoreResult<DeploymentStatus> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            Ok(script.remove(0))
        } else {
            Ok(script[0].clone())
        }
    }
}

fn fast_config() -> PollConfig {
    PollConfig::default().with_interval(Duration::from_millis(10))
}

#[tokio::test(start_paused = true)]
async fn terminal_on_first_fetch_returns_immediately() {
    let fetcher = ScriptedFetcher::new(vec![DeploymentStatus::Ready]);
    let cancel = CancellationToken::new();

    let start = tokio::time::Instant::now();
    let status = poll_until_terminal(&fetcher, &PollConfig::default(), &cancel)
        .await
        .unwrap();

    assert_eq!(status, DeploymentStatus::Ready);
    assert_eq!(fetcher.fetch_count(), 1);
    // No wait at all when the first fetch is already terminal.
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn creating_creating_ready_costs_exactly_three_fetches() {
    let fetcher = ScriptedFetcher::new(vec![
        DeploymentStatus::Creating,
        DeploymentStatus::Creating,
        DeploymentStatus::Ready,
    ]);
    let cancel = CancellationToken::new();
    let config = PollConfig::default();

    let start = tokio::time::Instant::now();
    let status = poll_until_terminal(&fetcher, &config, &cancel).await.unwrap();

    assert_eq!(status, DeploymentStatus::Ready);
    assert_eq!(fetcher.fetch_count(), 3);
    // Exactly one interval between each non-terminal fetch and the next.
    assert_eq!(start.elapsed(), config.interval * 2);
}

#[tokio::test(start_paused = true)]
async fn failed_terminal_states_are_returned_not_raised() {
    for failed in [
        DeploymentStatus::CreateFailed,
        DeploymentStatus::UpdateFailed,
        DeploymentStatus::DeleteFailed,
    ] {
        let fetcher = ScriptedFetcher::new(vec![DeploymentStatus::Creating, failed.clone()]);
        let cancel = CancellationToken::new();
        let status = poll_until_terminal(&fetcher, &fast_config(), &cancel)
            .await
            .unwrap();
        assert_eq!(status, failed);
        assert!(status.is_failed());
    }
}

#[tokio::test(start_paused = true)]
async fn unknown_statuses_are_non_terminal() {
    let fetcher = ScriptedFetcher::new(vec![
        DeploymentStatus::Other("PENDING_NETWORK".to_string()),
        DeploymentStatus::Ready,
    ]);
    let cancel = CancellationToken::new();
    let status = poll_until_terminal(&fetcher, &fast_config(), &cancel)
        .await
        .unwrap();
    assert_eq!(status, DeploymentStatus::Ready);
    assert_eq!(fetcher.fetch_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn attempt_bound_yields_timeout() {
    let fetcher = ScriptedFetcher::new(vec![DeploymentStatus::Creating]);
    let cancel = CancellationToken::new();
    let config = fast_config().with_max_attempts(Some(5));

    let err = poll_until_terminal(&fetcher, &config, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, AgentCoreError::Timeout(_)), "got {err:?}");
    assert_eq!(fetcher.fetch_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_the_wait() {
    let fetcher = ScriptedFetcher::new(vec![DeploymentStatus::Creating]);
    let cancel = CancellationToken::new();
    let config = PollConfig::default().with_max_attempts(None);

    let child = cancel.child_token();
    let poll = tokio::spawn(async move {
        poll_until_terminal(&fetcher, &config, &child).await
    });

    // Let the first fetch land, then cancel during the sleep.
    tokio::time::sleep(Duration::from_secs(1)).await;
    cancel.cancel();

    let err = poll.await.unwrap().unwrap_err();
    assert!(matches!(err, AgentCoreError::Canceled));
}

#[tokio::test(start_paused = true)]
async fn already_canceled_token_short_circuits() {
    let fetcher = ScriptedFetcher::new(vec![DeploymentStatus::Ready]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = poll_until_terminal(&fetcher, &PollConfig::default(), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, AgentCoreError::Canceled));
    assert_eq!(fetcher.fetch_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn fetcher_errors_propagate() {
    struct FailingFetcher;

    #[async_trait]
    impl StatusFetcher for FailingFetcher {
        async fn fetch_status(&self) -> AgentCoreResult<DeploymentStatus> {
            Err(AgentCoreError::Transport("control plane unreachable".to_string()))
        }
    }

    let cancel = CancellationToken::new();
    let err = poll_until_terminal(&FailingFetcher, &PollConfig::default(), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, AgentCoreError::Transport(_)));
}
