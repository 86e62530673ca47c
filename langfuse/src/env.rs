/**
 * Configuration from the process environment.
 *
 * | variable              | meaning                     | when unset or empty          |
 * |-----------------------|-----------------------------|------------------------------|
 * | `LANGFUSE_HOST`       | base URL of the Langfuse API | `https://cloud.langfuse.com` |
 * | `LANGFUSE_PUBLIC_KEY` | project public key          | empty string                 |
 * | `LANGFUSE_SECRET_KEY` | project secret key          | empty string                 |
 *
 * Values are taken verbatim; in particular a trailing slash on the host is
 * not stripped. A value that is not valid UTF-8 is kept, with the bad bytes
 * replaced by U+FFFD, rather than treated as unset: a malformed
 * `LANGFUSE_HOST` then fails at request time instead of silently selecting
 * the default host.
 */
use langfuse_core::{Config, DEFAULT_BASE_URL};

pub const HOST_VAR: &str = "LANGFUSE_HOST";
pub const PUBLIC_KEY_VAR: &str = "LANGFUSE_PUBLIC_KEY";
pub const SECRET_KEY_VAR: &str = "LANGFUSE_SECRET_KEY";

/**
 * Reads the `LANGFUSE_*` variables into a [`Config`] with default transport
 * tuning.
 */
pub fn config_from_env() -> Config {
    config_from_lookup(read_var)
}

fn read_var(name: &str) -> Option<String> {
    std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
}

/**
 * Same as [`config_from_env`], with variable lookup supplied by the caller.
 */
pub fn config_from_lookup<F>(lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let base_url = lookup(HOST_VAR)
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let public_key = lookup(PUBLIC_KEY_VAR).unwrap_or_default();
    let secret_key = lookup(SECRET_KEY_VAR).unwrap_or_default();

    Config::new(public_key, secret_key).with_base_url(base_url)
}
