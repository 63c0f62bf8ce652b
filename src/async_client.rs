//! Async HTTP client for cooperative scheduling.
//!
//! [`AsyncClient`] applies the same URL, header and body rules as the
//! blocking [`Client`](crate::Client) but makes exactly one attempt per call.
//! It owns its transport and must be torn down with [`AsyncClient::close`].

use crate::{
    config::{to_body, ClientBuilder, ClientConfig},
    metadata::RequestOptions,
    transport::{AsyncTransport, ReqwestTransport},
    Response, Result,
};
use http::Method;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

/// A single-attempt async client.
///
/// There is no retry loop: a transport fault is returned as an error and a
/// 502 is returned as an ordinary response. Callers that want retries must
/// orchestrate them themselves. `max_attempts` and `backoff_base` in
/// [`RequestOptions`] are ignored here.
///
/// # Examples
///
/// ```no_run
/// use homebound::AsyncClient;
/// use serde_json::json;
///
/// # async fn example() -> Result<(), homebound::Error> {
/// let client = AsyncClient::new(Some("my-api-key"), "https://api.example.com")?;
///
/// let response = client.post("/v2/scrape", &json!({"url": "https://example.com"})).await?;
/// println!("Scrape status: {}", response.status);
///
/// client.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AsyncClient<T: AsyncTransport = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl AsyncClient {
    /// Creates a client on a `reqwest` transport without keep-alive reuse.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or credential is unusable.
    pub fn new(credential: Option<&str>, base_url: &str) -> Result<Self> {
        let mut builder = ClientBuilder::new().base_url(base_url)?;
        if let Some(credential) = credential {
            builder = builder.credential(credential);
        }
        builder.build_async()
    }

    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl<T: AsyncTransport> AsyncClient<T> {
    pub(crate) fn from_parts(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The transport requests are issued on.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Makes a single request.
    pub async fn call(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        options: &RequestOptions,
    ) -> Result<Response> {
        let request = self.config.prepare(method, endpoint, body, options)?;

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            "Executing HTTP request"
        );

        let start_time = Instant::now();
        let method = request.method.clone();
        let response = self.transport.issue(request).await.map_err(|e| {
            tracing::warn!(error = %e, method = %method, "Request failed");
            e
        })?;
        let latency = start_time.elapsed();

        tracing::info!(
            status = response.status.as_u16(),
            latency_ms = latency.as_millis(),
            "Received HTTP response"
        );

        Ok(Response::from_transport(response, latency, 1))
    }

    /// Makes a GET request with default options.
    pub async fn get(&self, endpoint: &str) -> Result<Response> {
        self.get_with(endpoint, &RequestOptions::default()).await
    }

    /// Makes a GET request.
    pub async fn get_with(&self, endpoint: &str, options: &RequestOptions) -> Result<Response> {
        self.call(Method::GET, endpoint, None, options).await
    }

    /// Makes a POST request with a JSON object body and default options.
    pub async fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Response> {
        self.post_with(endpoint, body, &RequestOptions::default())
            .await
    }

    /// Makes a POST request with a JSON object body.
    ///
    /// The body is stamped with `"origin": "<name>@<version>"`.
    pub async fn post_with<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<Response> {
        let body = to_body(body)?;
        self.call(Method::POST, endpoint, Some(body), options).await
    }

    /// Makes a DELETE request with default options.
    pub async fn delete(&self, endpoint: &str) -> Result<Response> {
        self.delete_with(endpoint, &RequestOptions::default())
            .await
    }

    /// Makes a DELETE request.
    pub async fn delete_with(&self, endpoint: &str, options: &RequestOptions) -> Result<Response> {
        self.call(Method::DELETE, endpoint, None, options).await
    }

    /// Releases the owned connection resources.
    ///
    /// Consumes the client, so teardown happens at most once and no request
    /// can follow it.
    pub async fn close(self) -> Result<()> {
        tracing::debug!(base_url = %self.config.base_url(), "Closing client");
        self.transport.close().await
    }
}
