//! Deployment wait demo — polls a runtime's status until it settles into a
//! terminal state, with Ctrl-C cancellation.
//!
//! ```sh
//! export RUNTIME_ENDPOINT=https://runtime.example.com
//! cargo run --example wait_for_deployment -- support_agent-x1
//! ```

use agentcore_rs::client::{PollConfig, RuntimeClient};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let endpoint = std::env::var("RUNTIME_ENDPOINT")?;
    let runtime_id = std::env::args()
        .nth(1)
        .ok_or("usage: wait_for_deployment <runtime-id>")?;

    let client = RuntimeClient::from_endpoint(&endpoint);

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_cancel.cancel();
        }
    });

    println!("Waiting for {runtime_id} to reach a terminal state...");
    let status = client
        .wait_until_terminal(&runtime_id, &PollConfig::default(), &cancel)
        .await?;

    if status.is_failed() {
        eprintln!("Deployment failed: {status}");
        std::process::exit(1);
    }
    println!("Deployment status: {status}");
    Ok(())
}
