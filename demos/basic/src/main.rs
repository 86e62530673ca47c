/**
 * Minimal harness for the Langfuse Rust client.
 *
 * Export your project keys, then run:
 *
 *   LANGFUSE_PUBLIC_KEY=pk-lf-... LANGFUSE_SECRET_KEY=sk-lf-... cargo run -p langfuse_example
 *   cargo run -p langfuse_example -- --timeout-ms 50   # watch a deadline fire
 *
 * Set `RUST_LOG=langfuse_core=debug` to see request/response logging.
 */
use std::time::Duration;

use langfuse::{event_types, IngestionBatch, IngestionEvent, RequestContext};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), langfuse::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let timeout = args
        .iter()
        .position(|a| a == "--timeout-ms")
        .and_then(|i| args.get(i + 1))
        .and_then(|ms| ms.parse().ok())
        .map_or(Duration::from_secs(10), Duration::from_millis);

    /*
     * The environment is read here, once, on first access.
     */
    let client = langfuse::instance()?;
    println!("[example] Posting to {}", client.ingestion_url());

    let trace = IngestionEvent::new(
        event_types::TRACE_CREATE,
        json!({ "name": "langfuse-rust-example", "input": { "args": &args[1..] } }),
    );
    let trace_id = trace.id.clone();
    let log = IngestionEvent::new(
        event_types::EVENT_CREATE,
        json!({ "traceId": trace_id, "name": "hello", "level": "DEFAULT" }),
    );
    let batch = IngestionBatch::new(vec![trace, log]);

    let ctx = RequestContext::with_timeout(timeout);
    match client.ingest_batch(&ctx, &batch).await {
        Ok(reply) => {
            println!(
                "[example] HTTP {}: {} accepted, {} rejected",
                reply.status_code,
                reply.body.successes.len(),
                reply.body.errors.len()
            );
            for failure in &reply.body.errors {
                println!("[example]   {} -> {:?}", failure.id, failure.message);
            }
        }
        Err(err) => {
            if let Some(raw) = err.raw_body() {
                println!("[example] Raw response: {raw}");
            }
            return Err(err);
        }
    }

    Ok(())
}
