//! Per-call request options.

use http::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// Options for an individual request.
///
/// All fields are optional; unset fields fall back to the client's defaults.
///
/// # Examples
///
/// ```
/// use homebound::RequestOptions;
/// use std::time::Duration;
///
/// let options = RequestOptions::new()
///     .with_idempotency_key("job-42")
///     .with_timeout(Duration::from_secs(30))
///     .with_max_attempts(5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Explicit headers for this request.
    ///
    /// When set, these replace the built headers entirely: no credential,
    /// content type or idempotency header is added on top of them.
    pub headers: Option<HeaderMap>,

    /// Idempotency key sent as `x-idempotency-key`.
    pub idempotency_key: Option<String>,

    /// Per-request timeout handed to the transport.
    pub timeout: Option<Duration>,

    /// Total number of attempts, blocking client only.
    pub max_attempts: Option<usize>,

    /// Base delay for exponential backoff, blocking client only.
    pub backoff_base: Option<Duration>,
}

impl RequestOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an explicit header, switching this request to explicit headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| crate::Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| crate::Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.headers
            .get_or_insert_with(HeaderMap::new)
            .insert(name, value);
        Ok(self)
    }

    /// Uses `headers` as the complete header set for this request.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Sets the idempotency key.
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the total number of attempts.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Sets the backoff base delay.
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = Some(base);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_header_switches_to_explicit_headers() {
        let options = RequestOptions::new()
            .with_header("x-custom", "1")
            .unwrap()
            .with_header("x-other", "2")
            .unwrap();
        let headers = options.headers.unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["x-custom"], "1");
    }

    #[test]
    fn test_with_header_rejects_invalid_name() {
        assert!(RequestOptions::new().with_header("bad header", "1").is_err());
    }
}
