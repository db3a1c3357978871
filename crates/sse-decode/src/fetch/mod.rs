//! HTTP orchestration around [`SseDecoder`](crate::SseDecoder).
//!
//! [`fetch_event_source`] issues the request, checks the status, and drives
//! the response body through the decoder, invoking the callbacks registered
//! on [`FetchOptions`]:
//!
//! ```text
//! send ──► check_ok ──► on_open ──► body chunks ──► SseDecoder ──► on_message*
//!   │          │                                         │
//!   └──────────┴──────────► on_error           flush ──► on_close
//! ```
//!
//! ```rust,no_run
//! use sse_decode::fetch::{FetchOptions, fetch_event_source};
//!
//! # async fn example() -> Result<(), sse_decode::FetchError> {
//! let options = FetchOptions::new()
//!     .data(&serde_json::json!({"prompt": "hello"}))?
//!     .on_message(|event| println!("{:?}: {}", event.event, event.data))
//!     .on_close(|| println!("done"));
//!
//! fetch_event_source("https://api.example.com/v1/stream", options).await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod status;

pub use client::{fetch_event_source, fetch_event_source_with};
pub use config::{
    CloseCallback, ErrorCallback, FetchOptions, MessageCallback, OpenCallback, RequestBody,
};
pub use status::check_ok;
