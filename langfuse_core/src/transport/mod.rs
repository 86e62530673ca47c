/**
 * Transport layer: how bytes reach the Langfuse API.
 *
 * - `http`: pooled reqwest client, cancellation, response capture
 */

pub mod http;

pub use http::HttpTransport;
