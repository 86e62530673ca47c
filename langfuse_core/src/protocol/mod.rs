/*!
 * Protocol layer: data structures, constants, and credential handling.
 *
 * Everything related to *what* we send to the Langfuse API:
 * - `types`: ingestion batch envelope, events, and the multi-status reply
 * - `constants`: default host, ingestion path, user agent
 * - `auth`: Basic `Authorization` header derivation
 */

pub mod auth;
pub mod constants;
pub mod types;
