//! Blocking HTTP client with retry logic.
//!
//! The [`Client`] type occupies the calling thread for the full sequence of
//! attempts and backoff sleeps. All retry state lives on the stack of the
//! call, so one client can be shared freely between threads.

use crate::{
    config::{to_body, ClientBuilder, ClientConfig},
    metadata::RequestOptions,
    retry::{AttemptOutcome, RetryPolicy, Sleeper},
    transport::{BlockingTransport, Transport, TransportResponse},
    Response, Result,
};
use http::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// A blocking client that retries transport faults and 502 responses.
///
/// Attempt `n` (0-indexed) that fails transiently is followed by a sleep of
/// `backoff_base * 2^n` if another attempt remains. A transport fault on the
/// final attempt is returned as an error; a 502 on the final attempt is
/// returned as an ordinary response. Every other status is returned at once.
///
/// # Examples
///
/// ```no_run
/// use homebound::{Client, RequestOptions};
/// use serde_json::json;
///
/// # fn example() -> Result<(), homebound::Error> {
/// let client = Client::new(Some("my-api-key"), "https://api.example.com")?;
///
/// let response = client.post("/v2/scrape", &json!({"url": "https://example.com"}))?;
/// println!("Scrape status: {}", response.status);
///
/// let options = RequestOptions::new().with_max_attempts(5);
/// let status = client.get_with("/v2/crawl/123", &options)?;
/// println!("Crawl took {} attempts", status.attempts);
/// # Ok(())
/// # }
/// ```
pub struct Client<T: Transport = BlockingTransport> {
    inner: Arc<ClientInner<T>>,
}

struct ClientInner<T> {
    config: ClientConfig,
    transport: T,
    retry_policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl<T: Transport> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Client {
    /// Creates a client with default retry settings on the `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or credential is unusable.
    pub fn new(credential: Option<&str>, base_url: &str) -> Result<Self> {
        let mut builder = ClientBuilder::new().base_url(base_url)?;
        if let Some(credential) = credential {
            builder = builder.credential(credential);
        }
        builder.build()
    }

    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl<T: Transport> Client<T> {
    pub(crate) fn from_parts(
        config: ClientConfig,
        transport: T,
        retry_policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                config,
                transport,
                retry_policy,
                sleeper,
            }),
        }
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The transport requests are issued on.
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// The default retry policy.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.inner.retry_policy
    }

    /// Makes a request with retries.
    ///
    /// This is the method behind all the verb helpers. Only POST bodies are
    /// stamped with the SDK identity.
    pub fn call(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        options: &RequestOptions,
    ) -> Result<Response> {
        let request = self.inner.config.prepare(method, endpoint, body, options)?;
        let policy = self
            .inner
            .retry_policy
            .with_overrides(options.max_attempts, options.backoff_base);

        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            tracing::debug!(
                method = %request.method,
                url = %request.url,
                attempt = attempt + 1,
                "Executing HTTP request"
            );

            let result = self.inner.transport.issue(request.clone());

            let outcome = match AttemptOutcome::classify(result) {
                AttemptOutcome::Complete(response) => {
                    return Ok(self.finish(response, start_time, attempt + 1));
                }
                AttemptOutcome::Terminal(e) => {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        method = %request.method,
                        "Request failed"
                    );
                    return Err(e);
                }
                AttemptOutcome::Transient(outcome) => outcome,
            };

            match &outcome {
                Ok(response) => tracing::warn!(
                    status = response.status.as_u16(),
                    attempt = attempt + 1,
                    url = %request.url,
                    "Upstream gateway error"
                ),
                Err(e) => tracing::warn!(
                    error = %e,
                    attempt = attempt + 1,
                    method = %request.method,
                    url = %request.url,
                    "Request failed"
                ),
            }

            if policy.is_last_attempt(attempt) {
                return outcome.map(|response| self.finish(response, start_time, attempt + 1));
            }

            let delay = policy.delay_for_attempt(attempt);
            tracing::info!(
                delay_ms = delay.as_millis(),
                attempt = attempt + 1,
                "Retrying request after delay"
            );
            self.inner.sleeper.sleep(delay);
            attempt += 1;
        }
    }

    fn finish(&self, response: TransportResponse, start_time: Instant, attempts: usize) -> Response {
        let latency = start_time.elapsed();
        tracing::info!(
            status = response.status.as_u16(),
            latency_ms = latency.as_millis(),
            attempts = attempts,
            "Received HTTP response"
        );
        Response::from_transport(response, latency, attempts)
    }

    /// Makes a GET request with default options.
    pub fn get(&self, endpoint: &str) -> Result<Response> {
        self.get_with(endpoint, &RequestOptions::default())
    }

    /// Makes a GET request.
    pub fn get_with(&self, endpoint: &str, options: &RequestOptions) -> Result<Response> {
        self.call(Method::GET, endpoint, None, options)
    }

    /// Makes a POST request with a JSON object body and default options.
    ///
    /// The body is stamped with `"origin": "<name>@<version>"`.
    pub fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Response> {
        self.post_with(endpoint, body, &RequestOptions::default())
    }

    /// Makes a POST request with a JSON object body.
    pub fn post_with<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<Response> {
        let body = to_body(body)?;
        self.call(Method::POST, endpoint, Some(body), options)
    }

    /// Makes a DELETE request with default options.
    pub fn delete(&self, endpoint: &str) -> Result<Response> {
        self.delete_with(endpoint, &RequestOptions::default())
    }

    /// Makes a DELETE request.
    pub fn delete_with(&self, endpoint: &str, options: &RequestOptions) -> Result<Response> {
        self.call(Method::DELETE, endpoint, None, options)
    }
}
