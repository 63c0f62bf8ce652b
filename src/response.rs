//! Response wrapper returned by both clients.
//!
//! The [`Response`] type carries the status, headers and raw body exactly as
//! the transport produced them, along with timing and attempt information.
//! Status codes are not interpreted: a 404 or a final 502 arrives here like
//! any other response.

use crate::transport::TransportResponse;
use crate::{Error, Result};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// A response returned by a client.
///
/// # Examples
///
/// ```no_run
/// use homebound::Client;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Status {
///     success: bool,
/// }
///
/// # fn example() -> Result<(), homebound::Error> {
/// let client = Client::new(Some("my-api-key"), "https://api.example.com")?;
///
/// let response = client.get("/v2/status")?;
/// println!("Status: {}", response.status);
/// println!("Request took {:?}", response.latency);
/// println!("Attempts: {}", response.attempts);
///
/// if response.is_success() {
///     let status: Status = response.json()?;
///     println!("Success: {}", status.success);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The raw response body as a string.
    pub raw_body: String,

    /// The total latency of the request, including all retry attempts and
    /// backoff sleeps.
    pub latency: Duration,

    /// The number of attempts made to produce this response.
    ///
    /// This will be `1` for requests that completed on the first try.
    pub attempts: usize,
}

impl Response {
    /// Creates a new `Response`.
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        raw_body: String,
        latency: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            status,
            headers,
            raw_body,
            latency,
            attempts,
        }
    }

    pub(crate) fn from_transport(
        response: TransportResponse,
        latency: Duration,
        attempts: usize,
    ) -> Self {
        Self::new(
            response.status,
            response.headers,
            response.body,
            latency,
            attempts,
        )
    }

    /// Returns `true` for 2xx responses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns `true` if the request required retries.
    ///
    /// # Examples
    ///
    /// ```
    /// # use homebound::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     String::new(),
    ///     Duration::from_millis(100),
    ///     3,
    /// );
    ///
    /// assert!(response.was_retried());
    /// ```
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a reference to a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Deserializes the raw body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeserializationFailed`] with the raw body attached if
    /// the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.raw_body).map_err(|e| {
            tracing::error!(
                error = %e,
                status = self.status.as_u16(),
                "Failed to deserialize response"
            );
            Error::DeserializationFailed {
                raw_response: self.raw_body.clone(),
                serde_error: e.to_string(),
                status: self.status,
            }
        })
    }
}
