/*!
 * Error types returned by the client.
 *
 * Every failure is surfaced to the immediate caller; nothing is retried or
 * swallowed inside the SDK. The variant tells the caller which remediation
 * applies (backoff on `Transport`, fix the payload on `Serialization`, ...).
 */

use std::time::Duration;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/**
 * All errors produced by `langfuse_core`.
 */
#[derive(Debug, Error)]
pub enum Error {
    /// The request payload could not be encoded as JSON. Nothing was sent.
    #[error("failed to serialize ingestion request: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The round trip failed before a complete response arrived.
    #[error("ingestion request failed: {0}")]
    Transport(#[from] TransportError),

    /// Response headers arrived but the body could not be read in full.
    #[error("failed to read ingestion response body (HTTP {status_code}): {source}")]
    Io {
        status_code: u16,
        #[source]
        source: reqwest::Error,
    },

    /**
     * The body was read but did not decode into the expected type.
     *
     * Status and raw body are kept here so the caller still sees what the
     * server said.
     */
    #[error("failed to decode ingestion response (HTTP {status_code}): {source}")]
    Deserialization {
        status_code: u16,
        raw_body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The derived `Authorization` value is not a legal header value.
    /// Base64 output is always legal, so `Client::new` does not produce this
    /// in practice.
    #[error("credentials cannot be sent as an HTTP header: {0}")]
    InvalidCredentials(#[source] reqwest::header::InvalidHeaderValue),

    /// `init` was called after the global client had been installed.
    #[error("Langfuse client is already initialized")]
    AlreadyInitialized,
}

impl Error {
    /// `true` for network, timeout, and cancellation failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status, when the failure happened after headers were received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Io { status_code, .. } | Self::Deserialization { status_code, .. } => {
                Some(*status_code)
            }
            _ => None,
        }
    }

    /// Undecodable response text, for `Deserialization` failures.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Deserialization { raw_body, .. } => Some(raw_body),
            _ => None,
        }
    }
}

/**
 * Why a round trip did not produce a response.
 */
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, DNS, TLS, overall timeout, protocol errors.
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// The caller's context was cancelled.
    #[error("request was cancelled")]
    Cancelled,

    /// The caller's context deadline passed.
    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// The server accepted the request but sent no headers in time.
    #[error("no response headers received within {0:?}")]
    ResponseHeaderTimeout(Duration),
}

impl TransportError {
    /// `true` when the caller's context ended the request.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// `true` for any of the timeout flavours, including reqwest's own.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Request(err) => err.is_timeout(),
            Self::DeadlineExceeded | Self::ResponseHeaderTimeout(_) => true,
            Self::Cancelled => false,
        }
    }
}
