//! Error types for the transport layer.
//!
//! HTTP status codes are never turned into errors here: a 4xx or 5xx response
//! is returned to the caller as an ordinary [`Response`](crate::Response).
//! Errors are reserved for transport faults, invalid configuration, and body
//! (de)serialization problems.

use http::StatusCode;

/// Boxed source error carried by [`Error::Network`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for the transport layer.
///
/// # Examples
///
/// ```no_run
/// use homebound::{Client, Error};
///
/// # fn example() -> Result<(), Error> {
/// let client = Client::new(Some("my-api-key"), "https://api.example.com")?;
///
/// match client.get("/v2/status") {
///     Ok(response) => println!("Status: {}", response.status),
///     Err(Error::Timeout) => eprintln!("Gave up after timing out"),
///     Err(e) if e.is_transport_fault() => eprintln!("Network trouble: {}", e),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection failed, DNS lookup failed, etc.).
    ///
    /// This wraps the underlying transport error and indicates problems at the
    /// network layer rather than the HTTP protocol layer.
    #[error("Network error: {0}")]
    Network(#[source] BoxError),

    /// The request timed out.
    ///
    /// This occurs when the request takes longer than the per-call timeout.
    #[error("Request timed out")]
    Timeout,

    /// Failed to deserialize the response body into the expected type.
    ///
    /// Only produced by [`Response::json`](crate::Response::json).
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// Invalid configuration was provided.
    ///
    /// This covers an unusable base URL, a credential or idempotency key that
    /// cannot be carried in a header, and transport construction failures.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Failed to serialize the request body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Wraps any transport-level error as [`Error::Network`].
    pub fn network(source: impl Into<BoxError>) -> Self {
        Error::Network(source.into())
    }

    /// Returns `true` if this error is a transport fault.
    ///
    /// Transport faults are the only errors the blocking client retries.
    ///
    /// # Examples
    ///
    /// ```
    /// use homebound::Error;
    ///
    /// assert!(Error::Timeout.is_transport_fault());
    /// assert!(!Error::ConfigurationError("bad header".into()).is_transport_fault());
    /// ```
    pub fn is_transport_fault(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Timeout => true,
            Error::DeserializationFailed { .. } => false,
            Error::ConfigurationError(_) => false,
            Error::SerializationFailed(_) => false,
            Error::InvalidUrl(_) => false,
        }
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::DeserializationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_builder() {
            Error::ConfigurationError(err.to_string())
        } else {
            Error::Network(Box::new(err))
        }
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_wraps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::network(io);
        assert!(err.is_transport_fault());
        assert!(err.to_string().contains("refused"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_non_transport_errors_are_not_faults() {
        assert!(!Error::SerializationFailed("x".into()).is_transport_fault());
        assert!(!Error::InvalidUrl(url::ParseError::EmptyHost).is_transport_fault());
        let err = Error::DeserializationFailed {
            raw_response: "oops".into(),
            serde_error: "expected value".into(),
            status: StatusCode::OK,
        };
        assert!(!err.is_transport_fault());
        assert_eq!(err.status(), Some(StatusCode::OK));
        assert_eq!(err.raw_response(), Some("oops"));
    }
}
