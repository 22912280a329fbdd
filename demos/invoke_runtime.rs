//! Interactive invocation demo — lists registered runtimes, invokes the
//! first one with a prompt, and streams the reply to the console.
//!
//! ```sh
//! export RUNTIME_ENDPOINT=https://runtime.example.com
//! export RUNTIME_TOKEN=eyJraWQi...
//! cargo run --example invoke_runtime -- "What is the weather like in Seattle?"
//! ```

use agentcore_rs::client::{ConsoleSink, HttpTransport, InvocationOutcome, RuntimeClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let endpoint = std::env::var("RUNTIME_ENDPOINT")?;
    let token = std::env::var("RUNTIME_TOKEN")?;
    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "What is the weather like in Seattle?".to_string());

    let transport = HttpTransport::new(&endpoint).with_bearer_token(token);
    let client = RuntimeClient::with_transport(Box::new(transport));

    println!("{}", "-".repeat(80));
    for runtime in client.list_runtimes().await? {
        println!("Agent Name: {}", runtime.name);
        println!("ARN: {}", runtime.arn);
        println!("{}", "-".repeat(80));
    }

    println!("Invoking with prompt: {prompt}\n");
    let mut sink = ConsoleSink;
    match client.invoke_text(&prompt, &mut sink).await? {
        InvocationOutcome::Stream { transcript } => {
            println!("\n\n{} raw frames received", transcript.len());
        }
        InvocationOutcome::Json(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        InvocationOutcome::Opaque(raw) => {
            println!("unhandled content-type: {}", raw.content_type());
        }
    }

    Ok(())
}
