//! The full chunk → line → event pipeline.

use std::any::Any;

use tracing::trace;

use crate::{
    accumulator::EventAccumulator,
    chunk::{Chunk, ChunkTextDecoder},
    error::DecodeError,
    event::ServerSentEvent,
    line::LineDecoder,
};

/// Incremental SSE decoder for one stream.
///
/// Feed chunks in arrival order with [`decode`](Self::decode) and call
/// [`flush`](Self::flush) once the stream ends. Each stream needs its own
/// instance.
///
/// ```
/// use sse_decode::SseDecoder;
///
/// let mut decoder = SseDecoder::new();
/// assert!(decoder.decode("event: foo\ndata: b").is_empty());
///
/// let events = decoder.decode("ar\n\n");
/// assert_eq!(events[0].event.as_deref(), Some("foo"));
/// assert_eq!(events[0].data, "bar");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SseDecoder {
    lines: LineDecoder,
    events: EventAccumulator,
}

impl SseDecoder {
    /// Create a decoder for a UTF-8 stream.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder around a configured text decoder.
    #[must_use]
    pub fn with_text_decoder(text: ChunkTextDecoder) -> Self {
        Self {
            lines: LineDecoder::with_text_decoder(text),
            events: EventAccumulator::new(),
        }
    }

    /// Create a decoder for a response with the given `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnsupportedEncoding`] if the header declares a
    /// charset other than UTF-8.
    pub fn for_content_type(content_type: &str) -> Result<Self, DecodeError> {
        ChunkTextDecoder::from_content_type(content_type).map(Self::with_text_decoder)
    }

    /// Decode one chunk and return the events it completes.
    pub fn decode<'a>(&mut self, chunk: impl Into<Chunk<'a>>) -> Vec<ServerSentEvent> {
        let lines = self.lines.decode(chunk);
        self.push_lines(lines)
    }

    /// Decode a dynamically typed chunk.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnsupportedChunkType`] if `chunk` is neither
    /// text nor a recognized byte buffer. The decoder state is untouched in
    /// that case.
    pub fn decode_any<T: Any>(&mut self, chunk: &T) -> Result<Vec<ServerSentEvent>, DecodeError> {
        let chunk = Chunk::from_any(chunk)?;
        Ok(self.decode(chunk))
    }

    /// Finish the stream.
    ///
    /// Pushes the last unterminated line through the accumulator. An event
    /// still missing its blank line afterwards is dropped. The decoder is
    /// ready for a new stream when this returns.
    pub fn flush(&mut self) -> Vec<ServerSentEvent> {
        let lines = self.lines.flush();
        let events = self.push_lines(lines);
        self.events.reset();
        events
    }

    /// Discard all buffered lines and the in-progress event.
    pub fn reset(&mut self) {
        self.lines.reset();
        self.events.reset();
    }

    /// Returns `true` if any partial line or event is buffered.
    pub fn has_pending(&self) -> bool {
        self.lines.has_pending() || self.events.is_accumulating()
    }

    fn push_lines(&mut self, lines: Vec<String>) -> Vec<ServerSentEvent> {
        let events: Vec<_> = lines
            .iter()
            .filter_map(|line| self.events.push_line(line))
            .collect();
        if !lines.is_empty() {
            trace!(lines = lines.len(), events = events.len(), "chunk decoded");
        }
        events
    }
}
