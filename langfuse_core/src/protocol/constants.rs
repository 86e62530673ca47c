/**
 * SDK-wide constants.
 *
 * Endpoint locations and the identification string sent with every request.
 */

/// Langfuse Cloud, used when no host override is configured.
pub const DEFAULT_BASE_URL: &str = "https://cloud.langfuse.com";

/// Path of the public batch ingestion endpoint, appended verbatim to the base URL.
pub const INGESTION_PATH: &str = "/api/public/ingestion";

/// `User-Agent` sent on every request.
/// Derived at compile time from the `langfuse_core` package version in `Cargo.toml`.
pub const USER_AGENT: &str = concat!("langfuse-rust/", env!("CARGO_PKG_VERSION"));
