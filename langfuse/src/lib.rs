/*!
 * Langfuse ingestion client for Rust.
 *
 * Facade over `langfuse_core`: re-exports the client API and adds the
 * environment-driven global accessor.
 *
 * # Quick start
 *
 * ```ignore
 * use std::time::Duration;
 *
 * #[tokio::main]
 * async fn main() -> Result<(), langfuse::Error> {
 *     // LANGFUSE_HOST / LANGFUSE_PUBLIC_KEY / LANGFUSE_SECRET_KEY are read once, here.
 *     let client = langfuse::instance()?;
 *
 *     let batch = langfuse::IngestionBatch::new(vec![langfuse::IngestionEvent::new(
 *         langfuse::event_types::TRACE_CREATE,
 *         serde_json::json!({ "name": "startup" }),
 *     )]);
 *     let ctx = langfuse::RequestContext::with_timeout(Duration::from_secs(10));
 *     let reply = client.ingest_batch(&ctx, &batch).await?;
 *     println!("HTTP {}: {}", reply.status_code, reply.raw_body);
 *     Ok(())
 * }
 * ```
 */

pub mod env;

pub use langfuse_core::*;

/**
 * Returns the process-wide client, building it from the `LANGFUSE_*`
 * environment variables on first use.
 *
 * The environment is read only by the call that constructs the client.
 * All callers, on any thread, receive the same instance; callers racing the
 * first construction wait for it to finish.
 *
 * If a client was already installed with `langfuse::init(config)`, that
 * client is returned and the environment is ignored.
 */
pub fn instance() -> Result<&'static Client> {
    get_or_init_with(env::config_from_env)
}
