//! Example demonstrating the blocking client's retry behavior.
//!
//! This example shows how to:
//! - Configure the default attempt count and backoff base
//! - Override them for a single request
//! - Tell a final 502 response apart from a transport fault
//!
//! Run with: `cargo run --example retry_behavior`

use homebound::{Client, Error, RequestOptions};
use std::time::{Duration, Instant};

fn main() -> Result<(), Error> {
    // Initialize tracing to see retry attempts
    tracing_subscriber::fmt()
        .with_env_filter("homebound=info,retry_behavior=info")
        .init();

    println!("=== 502 Responses Are Retried ===");
    println!("Delays: 100ms, 200ms");
    let client = Client::builder()
        .base_url("https://httpbin.org")?
        .max_attempts(3)
        .backoff_base(Duration::from_millis(100))
        .build()?;

    let start = Instant::now();
    let response = client.get("/status/502")?;
    println!(
        "Final status {} after {} attempts in {:?}",
        response.status,
        response.attempts,
        start.elapsed()
    );
    println!();

    println!("=== Other Statuses Are Returned As-Is ===");
    let response = client.get("/status/503")?;
    println!(
        "Status {} after {} attempt(s)",
        response.status, response.attempts
    );
    println!();

    println!("=== Transport Faults Surface After The Last Attempt ===");
    let options = RequestOptions::new()
        .with_max_attempts(2)
        .with_backoff_base(Duration::from_millis(50))
        .with_timeout(Duration::from_millis(500));

    match client.get_with("/delay/3", &options) {
        Ok(response) => println!("Unexpected response: {}", response.status),
        Err(e) if e.is_transport_fault() => println!("Gave up: {}", e),
        Err(e) => return Err(e),
    }

    Ok(())
}
