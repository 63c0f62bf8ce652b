//! Single-attempt behavior and teardown of the async client.

use async_trait::async_trait;
use homebound::{
    AsyncClient, AsyncTransport, Error, RequestOptions, SdkIdentity, TransportRequest,
    TransportResponse,
};
use http::header::AUTHORIZATION;
use http::StatusCode;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct ScriptedTransport {
    script: Mutex<VecDeque<Result<TransportResponse, Error>>>,
    requests: Mutex<Vec<TransportRequest>>,
    closes: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    fn new(script: Vec<Result<TransportResponse, Error>>, closes: Arc<AtomicUsize>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            closes,
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> TransportRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl AsyncTransport for ScriptedTransport {
    async fn issue(&self, request: TransportRequest) -> Result<TransportResponse, Error> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called more times than scripted")
    }

    async fn close(&self) -> Result<(), Error> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn client(
    script: Vec<Result<TransportResponse, Error>>,
) -> (AsyncClient<ScriptedTransport>, Arc<AtomicUsize>) {
    let closes = Arc::new(AtomicUsize::new(0));
    let client = AsyncClient::builder()
        .base_url("https://api.example.com/v2")
        .unwrap()
        .credential(" test-api-key ")
        .identity(SdkIdentity::new("rust-sdk", "3.1.4"))
        .build_async_with_transport(ScriptedTransport::new(script, closes.clone()))
        .unwrap();
    (client, closes)
}

fn status(code: u16) -> Result<TransportResponse, Error> {
    Ok(TransportResponse::new(StatusCode::from_u16(code).unwrap(), "{}"))
}

#[tokio::test]
async fn test_502_is_not_retried() {
    let (client, _) = client(vec![status(502)]);

    let response = client.get("status").await.unwrap();

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.attempts, 1);
    assert_eq!(client.transport().calls(), 1);
}

#[tokio::test]
async fn test_transport_fault_is_not_retried() {
    let (client, _) = client(vec![Err(Error::Timeout)]);
    let options = RequestOptions::new().with_max_attempts(5);

    let err = client.get_with("status", &options).await.unwrap_err();

    assert!(matches!(err, Error::Timeout));
    assert_eq!(client.transport().calls(), 1);
}

#[tokio::test]
async fn test_post_is_stamped_and_resolved() {
    let (client, _) = client(vec![status(200)]);

    client
        .post("scrape", &json!({"url": "https://example.com", "origin": "x"}))
        .await
        .unwrap();

    let request = client.transport().request(0);
    assert_eq!(request.url.as_str(), "https://api.example.com/v2/scrape");
    assert_eq!(request.body.unwrap()["origin"], "rust-sdk@3.1.4");
    assert_eq!(request.headers[AUTHORIZATION], "Bearer test-api-key");
}

#[tokio::test]
async fn test_credential_withheld_for_other_hosts() {
    let (client, _) = client(vec![status(200), status(200)]);
    let options = RequestOptions::new().with_idempotency_key("idem-9");

    client
        .delete_with("https://api.example.com.evil.com/v2/crawl/1", &options)
        .await
        .unwrap();
    client.get("https://malicious.com/v2/scrape").await.unwrap();

    let delete = client.transport().request(0);
    assert_eq!(delete.url.as_str(), "https://api.example.com/v2/crawl/1");
    assert!(delete.headers.get(AUTHORIZATION).is_none());
    assert_eq!(delete.headers["x-idempotency-key"], "idem-9");

    let get = client.transport().request(1);
    assert_eq!(get.url.host_str(), Some("api.example.com"));
    assert!(get.headers.get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn test_close_tears_down_transport_once() {
    let (client, closes) = client(vec![status(200)]);

    client.get("status").await.unwrap();
    client.close().await.unwrap();

    assert_eq!(closes.load(Ordering::SeqCst), 1);
}
