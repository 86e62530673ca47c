/*!
 * HTTP transport for posting JSON to the Langfuse API.
 *
 * Wraps an async `reqwest::Client` whose connection pool is shared by every
 * caller of the owning `Client`. No lock is held across a network call; the
 * pool itself serializes access to individual connections.
 *
 * Design decisions:
 * - **Single attempt**: no retries. Callers own retry policy.
 * - **Context-aware**: the whole exchange, body read included, races the
 *   caller's `RequestContext`; losing the race drops the request future,
 *   which aborts the connection's in-flight exchange.
 * - **Raw capture**: the body is returned as text regardless of status;
 *   decoding is the caller's business.
 */

use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tokio::sync::Semaphore;

use crate::config::TransportConfig;
use crate::context::RequestContext;
use crate::error::{Error, Result, TransportError};
use crate::protocol::constants::USER_AGENT;

/**
 * Status and body of a completed exchange.
 */
#[derive(Clone, Debug)]
pub struct RawResponse {
    pub status_code: u16,

    /// Body decoded as UTF-8; invalid sequences are replaced, never rejected.
    pub body: String,
}

/**
 * Pooled HTTP client tuned from a [`TransportConfig`].
 */
pub struct HttpTransport {
    http: reqwest::Client,

    /// Applied to `send()`, which resolves once headers are in.
    response_header_timeout: Duration,

    /// Present only when `max_conns_per_host` is set.
    in_flight: Option<Semaphore>,
}

impl HttpTransport {
    /**
     * Builds the pooled client.
     *
     * Mapping onto reqwest:
     * - connect + TLS handshake share one budget (`connection_setup_timeout`),
     *   since reqwest times the whole connector as a unit.
     * - global and per-host idle caps collapse into `pool_max_idle_per_host`
     *   because every request goes to the same host.
     * - `max_conns_per_host` is enforced with a semaphore around each exchange.
     * - `request_timeout` bounds the entire exchange.
     */
    pub fn new(config: &TransportConfig, request_timeout: Duration) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.connection_setup_timeout())
            .tcp_keepalive(config.keep_alive)
            .pool_max_idle_per_host(config.effective_idle_per_host())
            .pool_idle_timeout(config.idle_conn_timeout)
            .gzip(config.compression)
            .timeout(request_timeout);

        if !config.http2 {
            builder = builder.http1_only();
        }
        if !config.use_env_proxy {
            builder = builder.no_proxy();
        }

        let http = builder.build().map_err(Error::Build)?;

        Ok(Self {
            http,
            response_header_timeout: config.response_header_timeout,
            in_flight: in_flight_limit(config.max_conns_per_host).map(Semaphore::new),
        })
    }

    /**
     * POSTs `body` as JSON and reads the full response.
     *
     * An already-finished context fails immediately, before a connection is
     * touched. Otherwise the exchange runs until it completes or the context
     * fires, whichever happens first.
     *
     * # Errors
     * - `Error::Transport`: connect/TLS/DNS failure, timeouts, cancellation.
     * - `Error::Io`: headers arrived but the body stream broke.
     */
    pub async fn post_json(
        &self,
        ctx: &RequestContext,
        url: &str,
        authorization: &HeaderValue,
        body: Vec<u8>,
    ) -> Result<RawResponse> {
        if let Some(reason) = ctx.err() {
            return Err(reason.into());
        }

        tokio::select! {
            biased;
            reason = ctx.done() => Err(Error::Transport(reason)),
            result = self.exchange(url, authorization, body) => result,
        }
    }

    async fn exchange(
        &self,
        url: &str,
        authorization: &HeaderValue,
        body: Vec<u8>,
    ) -> Result<RawResponse> {
        /* Held until the body is fully read. */
        let _permit = match &self.in_flight {
            // The semaphore is never closed, so acquire cannot fail.
            Some(limit) => Some(limit.acquire().await.map_err(|_| TransportError::Cancelled)?),
            None => None,
        };

        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(AUTHORIZATION, authorization.clone())
            .body(body);

        /* Covers connection setup and the request write as well as the wait for headers. */
        let response = tokio::time::timeout(self.response_header_timeout, request.send())
            .await
            .map_err(|_| TransportError::ResponseHeaderTimeout(self.response_header_timeout))?
            .map_err(TransportError::Request)?;

        let status_code = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| read_error(status_code, source))?;

        Ok(RawResponse {
            status_code,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/**
 * Permits for the in-flight limiter, or `None` for no cap.
 *
 * Zero means unbounded.
 */
fn in_flight_limit(max_conns_per_host: Option<usize>) -> Option<usize> {
    match max_conns_per_host {
        None | Some(0) => None,
        Some(limit) => Some(limit.min(Semaphore::MAX_PERMITS)),
    }
}

/**
 * Classifies a failure while streaming the body.
 *
 * The overall request timeout can fire mid-body; that is still a timeout of
 * the exchange, not a broken stream.
 */
fn read_error(status_code: u16, source: reqwest::Error) -> Error {
    if source.is_timeout() {
        Error::Transport(TransportError::Request(source))
    } else {
        Error::Io {
            status_code,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_defaults() {
        let transport = HttpTransport::new(&TransportConfig::default(), Duration::from_secs(30))
            .expect("client builds");

        assert!(transport.in_flight.is_none());
        assert_eq!(transport.response_header_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_connection_cap_creates_limiter() {
        let config = TransportConfig {
            max_conns_per_host: Some(4),
            http2: false,
            keep_alives: false,
            ..Default::default()
        };
        let transport = HttpTransport::new(&config, Duration::from_secs(5)).expect("client builds");

        let permits = transport.in_flight.as_ref().map(Semaphore::available_permits);
        assert_eq!(permits, Some(4));
    }

    #[test]
    fn test_zero_connection_cap_is_unbounded() {
        let config = TransportConfig {
            max_conns_per_host: Some(0),
            ..Default::default()
        };
        let transport = HttpTransport::new(&config, Duration::from_secs(5)).expect("client builds");

        assert!(transport.in_flight.is_none());
    }

    /**
     * Caps beyond the semaphore's capacity are clamped instead of panicking.
     */
    #[test]
    fn test_oversized_connection_cap_is_clamped() {
        let config = TransportConfig {
            max_conns_per_host: Some(usize::MAX),
            ..Default::default()
        };
        let transport = HttpTransport::new(&config, Duration::from_secs(5)).expect("client builds");

        let permits = transport.in_flight.as_ref().map(Semaphore::available_permits);
        assert_eq!(permits, Some(Semaphore::MAX_PERMITS));
    }

    #[tokio::test]
    async fn test_cancelled_context_short_circuits() {
        let transport = HttpTransport::new(&TransportConfig::default(), Duration::from_secs(5))
            .expect("client builds");
        let ctx = RequestContext::background();
        ctx.cancel();

        /* Unroutable address: reaching the network would hang, not fail fast. */
        let result = transport
            .post_json(
                &ctx,
                "http://10.255.255.1/api/public/ingestion",
                &HeaderValue::from_static("Basic Og=="),
                b"{}".to_vec(),
            )
            .await;

        assert!(matches!(
            result,
            Err(Error::Transport(TransportError::Cancelled))
        ));
    }
}
