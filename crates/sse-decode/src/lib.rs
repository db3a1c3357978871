//! # sse-decode
//!
//! Incremental decoder for [Server-Sent Events] delivered as a chunked
//! response body.
//!
//! Chunks can split lines, multi-byte characters and even a `\r\n` pair at
//! arbitrary points. The decoder keeps only what it needs between chunks: one
//! unterminated line fragment and the event currently being assembled.
//!
//! ## Pipeline
//!
//! ```text
//! chunk ──► ChunkTextDecoder ──► LineDecoder ──► EventAccumulator ──► ServerSentEvent*
//!           (UTF-8)              (lines)         (event/data fields)
//! ```
//!
//! - [`SseDecoder`] runs the whole pipeline synchronously, one chunk at a time.
//! - [`EventStream`] adapts any `Stream` of byte chunks into a stream of
//!   events.
//! - [`fetch`] (feature `fetch`, on by default) issues the HTTP request and
//!   drives a callback-based consumer.
//!
//! ## Quick Start
//!
//! ```rust
//! use sse_decode::SseDecoder;
//!
//! let mut decoder = SseDecoder::new();
//! let mut events = decoder.decode("event: greeting\ndata: hel");
//! events.extend(decoder.decode("lo\r"));
//! events.extend(decoder.decode("\n\r\n"));
//! events.extend(decoder.flush());
//!
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].event.as_deref(), Some("greeting"));
//! assert_eq!(events[0].data, "hello");
//! ```
//!
//! An event is only dispatched by a blank line. If the stream ends in the
//! middle of an event, that event is dropped.
//!
//! [Server-Sent Events]: https://html.spec.whatwg.org/multipage/server-sent-events.html

pub mod accumulator;
pub mod chunk;
pub(crate) mod constants;
pub mod decoder;
pub mod error;
pub mod event;
pub mod event_stream;
pub mod line;
pub(crate) mod parser;

#[cfg(feature = "fetch")]
pub mod fetch;

// Re-export commonly used types
pub use accumulator::EventAccumulator;
pub use chunk::{Chunk, ChunkTextDecoder};
pub use decoder::SseDecoder;
pub use error::DecodeError;
#[cfg(feature = "fetch")]
pub use error::{FetchError, FetchResult};
pub use event::ServerSentEvent;
pub use event_stream::EventStream;
#[cfg(feature = "fetch")]
pub use fetch::{FetchOptions, fetch_event_source};
pub use line::LineDecoder;
