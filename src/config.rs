//! Client configuration shared by the blocking and async clients.
//!
//! [`ClientConfig`] holds everything needed to turn a caller's endpoint into
//! a [`TransportRequest`]: the credential, the base URL and the SDK identity.
//! Use [`ClientBuilder`] to configure and create clients.

use crate::{
    async_client::AsyncClient,
    client::Client,
    headers::{bearer, build_headers},
    identity::SdkIdentity,
    metadata::RequestOptions,
    resolve::resolve,
    retry::{RetryPolicy, Sleeper, ThreadSleeper},
    transport::{AsyncTransport, BlockingTransport, ReqwestTransport, Transport, TransportRequest},
    Error, Result,
};
use http::Method;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Immutable per-client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    credential: Option<String>,
    base_url: Url,
    identity: SdkIdentity,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url.as_str())
            .field("identity", &self.identity)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a configuration with this crate's [`SdkIdentity`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] if `base_url` is not an absolute
    /// `http`/`https` URL with a host, or if the credential cannot be carried
    /// in a header.
    pub fn new(credential: Option<&str>, base_url: &str) -> Result<Self> {
        Self::with_identity(credential, parse_base_url(base_url)?, SdkIdentity::current())
    }

    fn with_identity(
        credential: Option<&str>,
        base_url: Url,
        identity: SdkIdentity,
    ) -> Result<Self> {
        let credential = credential.map(str::to_string);
        if let Some(credential) = credential.as_deref().filter(|c| !c.trim().is_empty()) {
            bearer(credential)?;
        }
        Ok(Self {
            credential,
            base_url,
            identity,
        })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The identity stamped into POST bodies.
    pub fn identity(&self) -> &SdkIdentity {
        &self.identity
    }

    /// Returns `true` if a non-blank credential is configured.
    pub fn has_credential(&self) -> bool {
        self.credential
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }

    /// Turns one call into a request ready for the transport.
    ///
    /// Explicit headers in `options` are used as-is; otherwise headers are
    /// built with credential gating. POST bodies are stamped with the SDK
    /// identity, and other methods pass `body` through untouched.
    pub fn prepare(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        options: &RequestOptions,
    ) -> Result<TransportRequest> {
        let headers = match &options.headers {
            Some(explicit) => explicit.clone(),
            None => build_headers(
                self.credential.as_deref(),
                &self.base_url,
                endpoint,
                options.idempotency_key.as_deref(),
            )?,
        };

        let url = resolve(&self.base_url, endpoint)?;

        let body = if method == Method::POST {
            Some(self.identity.stamp(body.unwrap_or(Value::Null))?)
        } else {
            body
        };

        Ok(TransportRequest {
            method,
            url,
            headers,
            body,
            timeout: options.timeout,
        })
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url)
        .map_err(|e| Error::ConfigurationError(format!("Invalid base URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::ConfigurationError(format!(
            "Base URL must use http or https, got {}",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::ConfigurationError(
            "Base URL must include a host".to_string(),
        ));
    }

    Ok(url)
}

/// Serializes a request body to a JSON value.
pub(crate) fn to_body<B: serde::Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| Error::SerializationFailed(e.to_string()))
}

/// Builder for configuring and creating a [`Client`] or [`AsyncClient`].
///
/// # Examples
///
/// ```no_run
/// use homebound::{ClientBuilder, SdkIdentity};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), homebound::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://api.example.com")?
///     .credential("my-api-key")
///     .identity(SdkIdentity::new("rust-sdk", "2.0.0"))
///     .max_attempts(5)
///     .backoff_base(Duration::from_millis(250))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    credential: Option<String>,
    identity: SdkIdentity,
    retry_policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            credential: None,
            identity: SdkIdentity::current(),
            retry_policy: RetryPolicy::default(),
            sleeper: Arc::new(ThreadSleeper),
        }
    }

    /// Sets the base URL for all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an absolute `http`/`https` URL.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(parse_base_url(url.as_ref())?);
        Ok(self)
    }

    /// Sets the API credential sent as a bearer token to the base host.
    pub fn credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Sets the SDK identity stamped into POST bodies.
    pub fn identity(mut self, identity: SdkIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Sets the default retry policy of the blocking client.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets the default total number of attempts of the blocking client.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.retry_policy = RetryPolicy::new(attempts, self.retry_policy.backoff_base());
        self
    }

    /// Sets the default backoff base delay of the blocking client.
    pub fn backoff_base(mut self, base: Duration) -> Self {
        self.retry_policy = RetryPolicy::new(self.retry_policy.max_attempts(), base);
        self
    }

    /// Sets how the blocking client waits between attempts.
    pub fn sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    fn config(&self) -> Result<ClientConfig> {
        let base_url = self
            .base_url
            .clone()
            .ok_or_else(|| Error::ConfigurationError("Base URL is required".to_string()))?;
        ClientConfig::with_identity(self.credential.as_deref(), base_url, self.identity.clone())
    }

    /// Builds a blocking [`Client`] on the default `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL was provided or if the client
    /// configuration is invalid.
    pub fn build(self) -> Result<Client> {
        let transport = BlockingTransport::new()?;
        self.build_with_transport(transport)
    }

    /// Builds a blocking [`Client`] on a custom transport.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Result<Client<T>> {
        let config = self.config()?;
        Ok(Client::from_parts(
            config,
            transport,
            self.retry_policy,
            self.sleeper,
        ))
    }

    /// Builds an [`AsyncClient`] on the default `reqwest` transport.
    pub fn build_async(self) -> Result<AsyncClient> {
        let transport = ReqwestTransport::new()?;
        self.build_async_with_transport(transport)
    }

    /// Builds an [`AsyncClient`] on a custom transport.
    pub fn build_async_with_transport<T: AsyncTransport>(
        self,
        transport: T,
    ) -> Result<AsyncClient<T>> {
        let config = self.config()?;
        Ok(AsyncClient::from_parts(config, transport))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::AUTHORIZATION;
    use http::HeaderMap;
    use serde_json::json;

    fn config() -> ClientConfig {
        ClientConfig::with_identity(
            Some("test-api-key"),
            parse_base_url("https://api.example.com").unwrap(),
            SdkIdentity::new("rust-sdk", "9.9.9"),
        )
        .unwrap()
    }

    #[test]
    fn test_base_url_validation() {
        assert!(parse_base_url("https://api.example.com").is_ok());
        assert!(parse_base_url("http://localhost:3002/v1").is_ok());
        assert!(matches!(
            parse_base_url("api.example.com"),
            Err(Error::ConfigurationError(_))
        ));
        assert!(matches!(
            parse_base_url("ftp://api.example.com"),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_invalid_credential_rejected_up_front() {
        let err = ClientConfig::new(Some("line\nbreak"), "https://api.example.com").unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }

    #[test]
    fn test_debug_redacts_credential() {
        let debug = format!("{:?}", config());
        assert!(!debug.contains("test-api-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_prepare_post_stamps_body() {
        let request = config()
            .prepare(
                Method::POST,
                "/v2/scrape",
                Some(json!({"url": "https://example.com", "origin": "mine"})),
                &RequestOptions::new(),
            )
            .unwrap();
        assert_eq!(request.url.as_str(), "https://api.example.com/v2/scrape");
        assert_eq!(request.body.unwrap()["origin"], "rust-sdk@9.9.9");
        assert_eq!(request.headers[AUTHORIZATION], "Bearer test-api-key");
    }

    #[test]
    fn test_prepare_get_leaves_body_alone() {
        let request = config()
            .prepare(Method::GET, "v2/status", None, &RequestOptions::new())
            .unwrap();
        assert!(request.body.is_none());
        assert!(request.timeout.is_none());
    }

    #[test]
    fn test_prepare_explicit_headers_replace_built_ones() {
        let mut explicit = HeaderMap::new();
        explicit.insert("x-custom", "1".parse().unwrap());
        let options = RequestOptions::new()
            .with_headers(explicit.clone())
            .with_idempotency_key("ignored");

        let request = config()
            .prepare(Method::GET, "/v2/status", None, &options)
            .unwrap();
        assert_eq!(request.headers, explicit);
        assert!(request.headers.get(AUTHORIZATION).is_none());
        assert_eq!(options.headers.unwrap().len(), 1);
    }

    #[test]
    fn test_prepare_foreign_host() {
        let options = RequestOptions::new()
            .with_idempotency_key("k-1")
            .with_timeout(Duration::from_secs(3));
        let request = config()
            .prepare(Method::DELETE, "https://evil.com/v2/jobs/1", None, &options)
            .unwrap();
        assert_eq!(request.url.as_str(), "https://api.example.com/v2/jobs/1");
        assert!(request.headers.get(AUTHORIZATION).is_none());
        assert_eq!(request.headers["x-idempotency-key"], "k-1");
        assert_eq!(request.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_builder_requires_base_url() {
        let err = ClientBuilder::new().config().unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }
}
