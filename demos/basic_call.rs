//! Basic example demonstrating GET and POST requests with the async client.
//!
//! This example shows how to:
//! - Create a client with a credential and base URL
//! - Make GET and POST requests
//! - See the credential withheld for a foreign host
//! - Tear the client down with `close`
//!
//! Run with: `cargo run --example basic_call`

use homebound::{AsyncClient, Error};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Post {
    #[serde(rename = "userId")]
    user_id: u32,
    id: u32,
    title: String,
}

#[derive(Debug, Serialize)]
struct NewPost {
    title: String,
    body: String,
    #[serde(rename = "userId")]
    user_id: u32,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("homebound=debug,basic_call=info")
        .init();

    let client = AsyncClient::new(Some("demo-key"), "https://jsonplaceholder.typicode.com")?;

    println!("=== GET Request Example ===");
    let response = client.get("/posts/1").await?;
    let post: Post = response.json()?;

    println!("Post ID: {}", post.id);
    println!("Title: {}", post.title);
    println!("Request latency: {:?}", response.latency);
    println!("Status code: {}", response.status);
    println!();

    println!("=== POST Request Example ===");
    let new_post = NewPost {
        title: "My New Post".to_string(),
        body: "This is the content of my new post!".to_string(),
        user_id: 1,
    };

    // The server echoes the body back, including the stamped `origin` field.
    let response = client.post("/posts", &new_post).await?;
    println!("Echoed body: {}", response.raw_body);
    println!();

    println!("=== Foreign Host Example ===");
    // Dispatched to jsonplaceholder.typicode.com/posts/2, without the credential.
    let response = client.get("https://evil.example.org/posts/2").await?;
    println!("Status code: {}", response.status);

    client.close().await?;
    Ok(())
}
