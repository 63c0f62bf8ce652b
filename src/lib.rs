//! # Homebound - origin-pinned HTTP transport for API SDKs
//!
//! Homebound is the request layer underneath an API SDK. It resolves endpoint
//! strings against a configured base URL, attaches the API credential only
//! when the endpoint names the base host, and retries transient failures with
//! exponential backoff.
//!
//! ## Quick Start
//!
//! ```no_run
//! use homebound::{Client, RequestOptions};
//! use serde_json::json;
//!
//! fn main() -> Result<(), homebound::Error> {
//!     let client = Client::new(Some("my-api-key"), "https://api.example.com")?;
//!
//!     // POST bodies carry an `origin` field identifying the SDK.
//!     let response = client.post("/v2/scrape", &json!({"url": "https://example.com"}))?;
//!     println!("Status: {}", response.status);
//!
//!     // Idempotency keys are forwarded so retried requests can be deduplicated.
//!     let options = RequestOptions::new().with_idempotency_key("crawl-7");
//!     let response = client.post_with("/v2/crawl", &json!({"url": "https://example.com"}), &options)?;
//!     println!("Took {} attempts", response.attempts);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Requests stay home** - every request is dispatched to the base URL's
//!   scheme, host and port. An absolute endpoint naming another host only
//!   contributes its path and query.
//! - **Credentials stay home** - `Authorization: Bearer <key>` is attached
//!   only when the endpoint is relative or its hostname equals the base
//!   hostname (case, trailing dot and port are ignored; no suffix matching).
//! - **Idempotency keys always travel** - `x-idempotency-key` is sent whenever
//!   supplied.
//! - **Explicit headers win** - headers passed in [`RequestOptions`] replace
//!   the built headers entirely and are never modified.
//!
//! ## Blocking and async clients
//!
//! [`Client`] blocks the calling thread and retries transport faults and 502
//! responses, sleeping `backoff_base * 2^attempt` between attempts (defaults:
//! 3 attempts, 500ms base). Any other status is returned unchanged.
//!
//! [`AsyncClient`] makes a single attempt per call and owns a connection
//! resource that is released with [`AsyncClient::close`]:
//!
//! ```no_run
//! use homebound::AsyncClient;
//!
//! # async fn example() -> Result<(), homebound::Error> {
//! let client = AsyncClient::new(Some("my-api-key"), "https://api.example.com")?;
//! let response = client.get("/v2/team/credit-usage").await?;
//! println!("Status: {}", response.status);
//! client.close().await?;
//! # Ok(())
//! # }
//! ```

mod async_client;
mod client;
mod config;
mod error;
pub mod headers;
mod identity;
mod metadata;
pub mod origin;
pub mod resolve;
mod response;
pub mod retry;
pub mod transport;

pub use async_client::AsyncClient;
pub use client::Client;
pub use config::{ClientBuilder, ClientConfig};
pub use error::{BoxError, Error, Result};
pub use identity::{SdkIdentity, ORIGIN_FIELD};
pub use metadata::RequestOptions;
pub use response::Response;
pub use retry::{RetryPolicy, Sleeper};
pub use transport::{AsyncTransport, Transport, TransportRequest, TransportResponse};
