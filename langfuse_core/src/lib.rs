/*!
 * Langfuse Core: the client engine.
 *
 * This crate owns the HTTP transport, the process-wide client, and the
 * ingestion wire types. It never reads the environment; the `langfuse`
 * facade crate does that and re-exports everything here.
 *
 * # Module structure
 *
 * - `protocol/`: wire types, constants, Basic auth
 * - `transport/`: pooled reqwest client, cancellation
 * - `client`: the `Client`, its global instance, `ingest`
 * - `config`: explicit configuration and transport tuning
 * - `context`: per-call cancellation and deadlines
 * - `error`: typed errors
 *
 * # Quick start
 *
 * ```ignore
 * use langfuse_core::{Config, IngestionBatch, IngestionEvent, RequestContext};
 *
 * let client = langfuse_core::init(Config::new("pk-lf-...", "sk-lf-..."))?;
 *
 * let batch = IngestionBatch::new(vec![IngestionEvent::new(
 *     langfuse_core::event_types::TRACE_CREATE,
 *     serde_json::json!({ "name": "checkout" }),
 * )]);
 * let reply = client.ingest_batch(&RequestContext::with_timeout(Duration::from_secs(5)), &batch).await?;
 * ```
 */

mod client;
mod config;
mod context;
mod error;
mod protocol;
mod transport;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use client::{get_client, get_or_init_with, init, Client, Ingested};
pub use config::{Config, TransportConfig};
pub use context::RequestContext;
pub use error::{Error, Result, TransportError};
pub use protocol::auth::basic_auth;
pub use protocol::constants::{DEFAULT_BASE_URL, INGESTION_PATH, USER_AGENT};
pub use protocol::types::{
    event_types, IngestionBatch, IngestionEvent, IngestionFailure, IngestionResponse,
    IngestionSuccess,
};
pub use tokio_util::sync::CancellationToken;
