/**
 * The Langfuse client and its process-wide singleton.
 *
 * Lifecycle:
 * 1. The first caller of `get_or_init_with()` (or `init()`) builds a
 *    `Client` from a `Config` and stores it in a global `OnceCell`.
 * 2. Concurrent first-time callers block until that construction finishes;
 *    everyone afterwards gets the same `&'static Client`.
 * 3. `Client::ingest()` performs one POST per call over the shared pool.
 *
 * Nothing in the client is mutable after construction, so no locks are
 * taken on the request path.
 */
use std::fmt;

use once_cell::sync::OnceCell;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::protocol::auth::basic_auth;
use crate::protocol::constants::INGESTION_PATH;
use crate::protocol::types::{IngestionBatch, IngestionResponse};
use crate::transport::HttpTransport;

// ---------------------------------------------------------------------------
// Global singleton
// ---------------------------------------------------------------------------

/**
 * Process-wide client instance.
 *
 * `OnceCell::get_or_try_init` runs the initializer at most once to
 * success, blocks racing callers meanwhile, and publishes the finished value
 * with acquire/release ordering. A failed initializer leaves the cell empty.
 */
static GLOBAL_CLIENT: OnceCell<Client> = OnceCell::new();

/**
 * Returns the global client, or `None` if it has not been created yet.
 */
pub fn get_client() -> Option<&'static Client> {
    GLOBAL_CLIENT.get()
}

/**
 * Returns the global client, building it from `config()` on first use.
 *
 * `config` is only invoked by the caller that performs construction; every
 * other caller gets the cached instance without touching it.
 *
 * # Errors
 * Propagates `Build` if the HTTP client cannot be constructed. Nothing is
 * cached in that case, so a later call tries again.
 */
pub fn get_or_init_with<F>(config: F) -> Result<&'static Client>
where
    F: FnOnce() -> Config,
{
    GLOBAL_CLIENT.get_or_try_init(|| Client::new(config()))
}

/**
 * Installs a client built from an explicit `config` as the global instance.
 *
 * # Errors
 * `AlreadyInitialized` if a global client exists (whoever created it), or
 * the construction error.
 */
pub fn init(config: Config) -> Result<&'static Client> {
    /*
     * Early guard: skip building a connection pool that would be thrown away.
     */
    if GLOBAL_CLIENT.get().is_some() {
        return Err(Error::AlreadyInitialized);
    }

    let client = Client::new(config)?;
    GLOBAL_CLIENT
        .set(client)
        .map_err(|_| Error::AlreadyInitialized)?;

    GLOBAL_CLIENT.get().ok_or(Error::AlreadyInitialized)
}

// ---------------------------------------------------------------------------
// Ingested
// ---------------------------------------------------------------------------

/**
 * A successfully decoded ingestion reply.
 *
 * `status_code` and `raw_body` are recorded for every response, 2xx or not.
 * A non-2xx status whose body still decodes into `R` is returned here as
 * success; inspect `status_code` (or `is_success()`) to tell them apart.
 */
#[derive(Clone, Debug)]
pub struct Ingested<R> {
    pub status_code: u16,
    pub raw_body: String,
    pub body: R,
}

impl<R> Ingested<R> {
    /// `true` for any 2xx status, including Langfuse's 207 multi-status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/**
 * Posts ingestion payloads to one Langfuse host.
 *
 * Owns:
 * - the base URL and the precomputed ingestion URL,
 * - the derived `Authorization` header,
 * - the pooled HTTP transport.
 *
 * Usually reached through the global accessor, but standalone instances
 * (e.g. one per test server) work the same way.
 */
pub struct Client {
    base_url: String,
    ingestion_url: String,
    auth_header: HeaderValue,
    transport: HttpTransport,
}

impl Client {
    /**
     * Builds a client from `config`.
     *
     * # Steps
     * 1. Build the pooled transport from `config.transport`.
     * 2. Derive the Basic `Authorization` value from the key pair.
     * 3. Precompute `{base_url}/api/public/ingestion`.
     */
    pub fn new(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.transport, config.request_timeout)?;

        let credentials = basic_auth(&config.public_key, &config.secret_key);
        let mut auth_header =
            HeaderValue::from_str(&credentials).map_err(Error::InvalidCredentials)?;
        auth_header.set_sensitive(true);

        /* Plain concatenation: the base URL is used exactly as configured. */
        let ingestion_url = format!("{}{INGESTION_PATH}", config.base_url);

        debug!(
            base_url = %config.base_url,
            public_key = %config.public_key,
            http2 = config.transport.http2,
            "Langfuse client initialized"
        );

        Ok(Self {
            base_url: config.base_url,
            ingestion_url,
            auth_header,
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn ingestion_url(&self) -> &str {
        &self.ingestion_url
    }

    /// The derived header value, e.g. `"Basic cGs6c2s="`.
    pub fn auth_header(&self) -> &str {
        /* Built from base64 output, so always visible ASCII. */
        self.auth_header.to_str().unwrap_or_default()
    }

    /**
     * POSTs `request` as JSON to the ingestion endpoint and decodes the reply.
     *
     * Exactly one request goes out per call (none if `request` fails to
     * serialize or `ctx` is already done). No retries.
     *
     * # Errors
     * - `Serialization`: `request` is not JSON-encodable.
     * - `Transport`: network failure, timeout, or `ctx` fired.
     * - `Io`: the body could not be read.
     * - `Deserialization`: the body is not a valid `R`; the error carries
     *   the status code and raw body.
     */
    pub async fn ingest<Req, Res>(
        &self,
        ctx: &RequestContext,
        request: &Req,
    ) -> Result<Ingested<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let payload = serde_json::to_vec(request).map_err(Error::Serialization)?;
        debug!(url = %self.ingestion_url, bytes = payload.len(), "sending ingestion request");

        let response = match self
            .transport
            .post_json(ctx, &self.ingestion_url, &self.auth_header, payload)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(url = %self.ingestion_url, error = %err, "ingestion request failed");
                return Err(err);
            }
        };

        let status_code = response.status_code;
        debug!(status_code, bytes = response.body.len(), "received ingestion response");

        match serde_json::from_str(&response.body) {
            Ok(body) => Ok(Ingested {
                status_code,
                raw_body: response.body,
                body,
            }),
            Err(source) => Err(Error::Deserialization {
                status_code,
                raw_body: response.body,
                source,
            }),
        }
    }

    /**
     * Sends a batch envelope and decodes Langfuse's multi-status reply.
     */
    pub async fn ingest_batch<B>(
        &self,
        ctx: &RequestContext,
        batch: &IngestionBatch<B>,
    ) -> Result<Ingested<IngestionResponse>>
    where
        B: Serialize,
    {
        let ingested: Ingested<IngestionResponse> = self.ingest(ctx, batch).await?;

        if ingested.body.is_partial_failure() {
            warn!(
                status_code = ingested.status_code,
                rejected = ingested.body.errors.len(),
                accepted = ingested.body.successes.len(),
                "Langfuse rejected part of the batch"
            );
        }

        Ok(ingested)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("ingestion_url", &self.ingestion_url)
            .finish_non_exhaustive()
    }
}
