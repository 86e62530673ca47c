/**
 * Client configuration.
 *
 * The core never reads the process environment: callers build a `Config`
 * explicitly (the `langfuse` facade does it from `LANGFUSE_*` variables)
 * and hand it to `Client::new` / `init`.
 */
use std::fmt;
use std::time::Duration;

use crate::protocol::constants::DEFAULT_BASE_URL;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/**
 * Everything needed to construct a `Client`.
 *
 * # Example
 * ```ignore
 * let config = langfuse_core::Config::new("pk-lf-...", "sk-lf-...")
 *     .with_base_url("https://us.cloud.langfuse.com")
 *     .with_request_timeout(Duration::from_secs(10));
 * ```
 */
#[derive(Clone)]
pub struct Config {
    /// Scheme + host (+ optional prefix). Used verbatim: a trailing slash is
    /// kept and ends up in the request URL.
    pub base_url: String,

    /// Project public key, the Basic auth user name.
    pub public_key: String,

    /// Project secret key, the Basic auth password.
    pub secret_key: String,

    /// Upper bound on a whole request, from connect to last body byte.
    pub request_timeout: Duration,

    /// Connection-level tuning.
    pub transport: TransportConfig,
}

impl Config {
    /// Config for Langfuse Cloud with default transport tuning.
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            public_key: public_key.into(),
            secret_key: secret_key.into(),
            request_timeout: Duration::from_secs(30),
            transport: TransportConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl fmt::Debug for Config {
    /* The secret key never reaches logs. */
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("transport", &self.transport)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// TransportConfig
// ---------------------------------------------------------------------------

/**
 * Connection pool and timeout tuning for sustained ingestion load.
 *
 * Defaults keep connections alive and reuse them aggressively:
 *
 * | knob                        | default   |
 * |-----------------------------|-----------|
 * | `connect_timeout`           | 30 s      |
 * | `keep_alive`                | 30 s      |
 * | `http2`                     | on (ALPN) |
 * | `max_idle_conns`            | 100       |
 * | `max_idle_conns_per_host`   | 100       |
 * | `max_conns_per_host`        | unbounded |
 * | `idle_conn_timeout`         | 90 s      |
 * | `tls_handshake_timeout`     | 10 s      |
 * | `response_header_timeout`   | 30 s      |
 * | `compression`               | on        |
 * | `keep_alives`               | on        |
 * | `use_env_proxy`             | on        |
 */
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// TCP connect budget.
    pub connect_timeout: Duration,

    /// TCP keep-alive interval. `None` disables TCP keep-alive.
    pub keep_alive: Option<Duration>,

    /// Offer HTTP/2 during TLS negotiation. When `false` only HTTP/1.1 is used.
    pub http2: bool,

    /// Idle connections kept across all hosts.
    pub max_idle_conns: usize,

    /// Idle connections kept per destination host.
    pub max_idle_conns_per_host: usize,

    /// Requests in flight at once. `None` or `Some(0)` means no cap; values
    /// above what the limiter can hold are clamped.
    pub max_conns_per_host: Option<usize>,

    /// Idle pooled connections are closed after this long.
    pub idle_conn_timeout: Duration,

    /// TLS handshake budget, on top of `connect_timeout`.
    pub tls_handshake_timeout: Duration,

    /// Wait for response headers after the request is written.
    pub response_header_timeout: Duration,

    /// Advertise and transparently decode gzip responses.
    pub compression: bool,

    /// Reuse connections between requests.
    pub keep_alives: bool,

    /// Honour `HTTP_PROXY` / `HTTPS_PROXY` / `NO_PROXY`.
    pub use_env_proxy: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            keep_alive: Some(Duration::from_secs(30)),
            http2: true,
            max_idle_conns: 100,
            max_idle_conns_per_host: 100,
            max_conns_per_host: None,
            idle_conn_timeout: Duration::from_secs(90),
            tls_handshake_timeout: Duration::from_secs(10),
            response_header_timeout: Duration::from_secs(30),
            compression: true,
            keep_alives: true,
            use_env_proxy: true,
        }
    }
}

impl TransportConfig {
    /**
     * Idle slots the pool may keep for the single host this client talks to.
     *
     * The global cap and the per-host cap collapse into one number, and
     * disabling keep-alives means nothing is kept.
     */
    pub fn effective_idle_per_host(&self) -> usize {
        if self.keep_alives {
            self.max_idle_conns.min(self.max_idle_conns_per_host)
        } else {
            0
        }
    }

    /// Time allowed to establish a ready-to-use connection (TCP + TLS).
    pub fn connection_setup_timeout(&self) -> Duration {
        self.connect_timeout.saturating_add(self.tls_handshake_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new("pk", "sk");

        assert_eq!(config.base_url, "https://cloud.langfuse.com");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.transport.max_conns_per_host, None);
        assert!(config.transport.http2);
        assert!(config.transport.compression);
    }

    #[test]
    fn test_base_url_is_kept_verbatim() {
        let config = Config::new("pk", "sk").with_base_url("http://localhost:3000/");
        assert_eq!(config.base_url, "http://localhost:3000/");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", Config::new("pk-lf-1", "sk-lf-very-secret"));

        assert!(rendered.contains("pk-lf-1"));
        assert!(!rendered.contains("sk-lf-very-secret"));
    }

    #[test]
    fn test_effective_idle_per_host() {
        let mut transport = TransportConfig {
            max_idle_conns: 10,
            ..Default::default()
        };
        assert_eq!(transport.effective_idle_per_host(), 10);

        transport.keep_alives = false;
        assert_eq!(transport.effective_idle_per_host(), 0);
    }

    #[test]
    fn test_connection_setup_timeout() {
        assert_eq!(
            TransportConfig::default().connection_setup_timeout(),
            Duration::from_secs(40)
        );

        let transport = TransportConfig {
            connect_timeout: Duration::MAX,
            ..Default::default()
        };
        assert_eq!(transport.connection_setup_timeout(), Duration::MAX);
    }
}
