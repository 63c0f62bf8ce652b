//! The seam between the executors and the wire.
//!
//! [`Transport`] and [`AsyncTransport`] are the only places a request leaves
//! the process. The default implementations are backed by `reqwest`; tests
//! and embedders can plug in their own.

use crate::{Error, Result};
use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// A fully prepared request, ready to be issued.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// The HTTP method.
    pub method: Method,
    /// The resolved, absolute URL.
    pub url: Url,
    /// The headers to send.
    pub headers: HeaderMap,
    /// JSON body, if any.
    pub body: Option<Value>,
    /// Per-request timeout. `None` leaves the transport's default in place.
    pub timeout: Option<Duration>,
}

/// What came back from a single transport call.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The raw response body.
    pub body: String,
}

impl TransportResponse {
    /// Creates a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// A blocking transport.
///
/// Implementations return [`Error::Network`] or [`Error::Timeout`] for
/// transport faults; those are the errors the blocking client retries.
pub trait Transport: Send + Sync {
    /// Issues one request and waits for the response.
    fn issue(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// A transport for cooperative async scheduling.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    /// Issues one request.
    async fn issue(&self, request: TransportRequest) -> Result<TransportResponse>;

    /// Releases any connection resources held by the transport.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Blocking transport backed by `reqwest::blocking`.
///
/// Must not be created or dropped from within an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingTransport {
    http_client: reqwest::blocking::Client,
}

impl BlockingTransport {
    /// Creates a transport with `reqwest`'s default settings.
    pub fn new() -> Result<Self> {
        let http_client = reqwest::blocking::Client::builder().build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;
        Ok(Self { http_client })
    }

    /// Wraps an existing `reqwest::blocking::Client`.
    pub fn from_client(http_client: reqwest::blocking::Client) -> Self {
        Self { http_client }
    }
}

impl Transport for BlockingTransport {
    fn issue(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut builder = self
            .http_client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send()?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text()?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

/// Async transport backed by `reqwest`.
///
/// Built without an idle connection pool, so no connection is kept alive
/// between calls. Not `Clone`: each async client owns its connection pool.
///
/// ```compile_fail
/// fn shared<T: Clone>() {}
/// shared::<homebound::transport::ReqwestTransport>();
/// ```
#[derive(Debug)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with keep-alive reuse disabled.
    pub fn new() -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| {
                Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;
        Ok(Self { http_client })
    }

    /// Wraps an existing `reqwest::Client`.
    ///
    /// The transport takes over the client's connection pool; do not keep
    /// other handles to it, or connections outlive [`AsyncTransport::close`].
    pub fn from_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl AsyncTransport for ReqwestTransport {
    async fn issue(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut builder = self
            .http_client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }

    /// Connections are released when the owning client drops this transport.
    async fn close(&self) -> Result<()> {
        tracing::debug!("Closing HTTP transport");
        Ok(())
    }
}
