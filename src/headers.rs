//! Per-call header construction with credential gating.

use crate::{origin::same_origin, Error, Result};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

/// Header carrying the caller's idempotency key.
pub const IDEMPOTENCY_KEY: HeaderName = HeaderName::from_static("x-idempotency-key");

/// Builds a fresh header map for one request.
///
/// The map always carries `Content-Type: application/json`. The
/// `Authorization: Bearer <credential>` header is added only when the
/// credential is non-blank and `endpoint` targets the base URL's host. The
/// idempotency key, when given, is added regardless of origin.
///
/// # Errors
///
/// Returns [`Error::ConfigurationError`] if the credential or idempotency key
/// cannot be represented as a header value.
///
/// # Examples
///
/// ```
/// use homebound::headers::build_headers;
/// use url::Url;
///
/// let base = Url::parse("https://api.example.com").unwrap();
///
/// let headers = build_headers(Some("key"), &base, "/v2/scrape", None).unwrap();
/// assert_eq!(headers["authorization"], "Bearer key");
///
/// let headers = build_headers(Some("key"), &base, "https://evil.com/x", Some("k-1")).unwrap();
/// assert!(headers.get("authorization").is_none());
/// assert_eq!(headers["x-idempotency-key"], "k-1");
/// ```
pub fn build_headers(
    credential: Option<&str>,
    base_url: &Url,
    endpoint: &str,
    idempotency_key: Option<&str>,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(credential) = credential.map(str::trim).filter(|c| !c.is_empty()) {
        if same_origin(base_url, endpoint) {
            headers.insert(AUTHORIZATION, bearer(credential)?);
        } else {
            tracing::debug!(
                endpoint = %endpoint,
                "Withholding credential for cross-origin endpoint"
            );
        }
    }

    if let Some(key) = idempotency_key {
        let value = HeaderValue::from_str(key).map_err(|e| {
            Error::ConfigurationError(format!("Invalid idempotency key: {}", e))
        })?;
        headers.insert(IDEMPOTENCY_KEY, value);
    }

    Ok(headers)
}

/// Formats a trimmed credential as a sensitive bearer header value.
pub(crate) fn bearer(credential: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", credential.trim()))
        .map_err(|_| {
            Error::ConfigurationError("Credential is not a valid header value".to_string())
        })?;
    value.set_sensitive(true);
    Ok(value)
}
