/**
 * Credential handling for the Langfuse public API.
 *
 * Langfuse authenticates ingestion with HTTP Basic auth: the project's
 * public key is the user name and the secret key is the password.
 * The header value is `Basic base64("{public}:{secret}")`, encoded with the
 * standard alphabet and `=` padding.
 */
use base64::Engine as _;

/// Scheme prefix of the derived header value, including the separating space.
const SCHEME: &str = "Basic ";

/**
 * Builds the `Authorization` header value for a key pair.
 *
 * No validation is performed: empty keys still produce a well-formed value
 * (`"Basic Og=="` for two empty strings) and the server decides whether
 * they are acceptable.
 *
 * # Example
 * ```
 * use langfuse_core::basic_auth;
 *
 * assert_eq!(basic_auth("user", "pass"), "Basic dXNlcjpwYXNz");
 * ```
 */
pub fn basic_auth(public_key: &str, secret_key: &str) -> String {
    let credentials = format!("{public_key}:{secret_key}");
    let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);

    let mut header = String::with_capacity(SCHEME.len() + encoded.len());
    header.push_str(SCHEME);
    header.push_str(&encoded);
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_known_pair() {
        assert_eq!(
            basic_auth("pk-lf-123", "sk-lf-456"),
            "Basic cGstbGYtMTIzOnNrLWxmLTQ1Ng=="
        );
    }

    /**
     * Empty keys are encoded as-is; only the colon survives.
     */
    #[test]
    fn test_basic_auth_empty_keys() {
        assert_eq!(basic_auth("", ""), "Basic Og==");
        assert_eq!(basic_auth("pk", ""), "Basic cGs6");
        assert_eq!(basic_auth("", "sk"), "Basic OnNr");
    }

    /**
     * Decoding the payload must give back exactly `public:secret`.
     */
    #[test]
    fn test_basic_auth_decodes_back() {
        let header = basic_auth("public key", "s3cr3t:with:colons");
        let payload = header.strip_prefix("Basic ").expect("scheme prefix");
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .expect("valid base64");

        assert_eq!(decoded, b"public key:s3cr3t:with:colons");
    }
}
