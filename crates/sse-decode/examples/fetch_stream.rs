/// Example client that prints every event from an SSE endpoint.
///
/// Usage: `cargo run --example fetch_stream -- https://sse.dev/test`
use std::time::Duration;

use sse_decode::{FetchOptions, fetch_event_source};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://sse.dev/test".to_string());

    let options = FetchOptions::new()
        .method(http::Method::GET)
        .connect_timeout(Duration::from_secs(5))
        .on_open(|resp| tracing::info!(status = %resp.status(), "connected"))
        .on_message(|event| {
            println!(
                "[{}] {}",
                event.event_type().unwrap_or("message"),
                event.data()
            );
        })
        .on_close(|| tracing::info!("stream closed"))
        .on_error(|err| tracing::error!(error = %err, "stream failed"));

    if let Err(err) = fetch_event_source(&url, options).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
