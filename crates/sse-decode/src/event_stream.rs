//! [`Stream`] that converts a stream of byte chunks into
//! [`ServerSentEvent`]s.

use std::collections::VecDeque;

use core::{
    pin::Pin,
    task::{Context, Poll, ready},
};

use futures_core::Stream;
use tracing::{debug, warn};

use crate::{decoder::SseDecoder, event::ServerSentEvent};

// ---------------------------------------------------------------------------
// EventStreamState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum EventStreamState {
    Streaming,
    Terminated,
}

impl EventStreamState {
    fn is_terminated(self) -> bool {
        matches!(self, Self::Terminated)
    }
}

// ---------------------------------------------------------------------------
// EventStream
// ---------------------------------------------------------------------------

pin_project_lite::pin_project! {
    /// A [`Stream`] that decodes a stream of byte chunks into
    /// [`ServerSentEvent`]s.
    ///
    /// Transport errors are passed through unchanged and end the stream.
    /// When the inner stream ends the decoder is flushed; an event without
    /// its closing blank line is dropped.
    #[project = EventStreamProjection]
    #[derive(Debug)]
    pub struct EventStream<S> {
        #[pin]
        stream: S,
        decoder: SseDecoder,
        ready: VecDeque<ServerSentEvent>,
        state: EventStreamState,
    }
}

impl<S> EventStream<S> {
    /// Create a new [`EventStream`] decoding UTF-8 chunks.
    pub fn new(stream: S) -> Self {
        Self::with_decoder(stream, SseDecoder::new())
    }

    /// Create a new [`EventStream`] around a configured decoder.
    pub fn with_decoder(stream: S, decoder: SseDecoder) -> Self {
        Self {
            stream,
            decoder,
            ready: VecDeque::new(),
            state: EventStreamState::Streaming,
        }
    }

    /// Returns `true` once the inner stream ended or failed.
    pub fn is_terminated(&self) -> bool {
        self.state.is_terminated()
    }

    /// Take the decoder (useful for checking leftovers).
    pub fn into_decoder(self) -> SseDecoder {
        self.decoder
    }
}

// ---------------------------------------------------------------------------
// Stream implementation
// ---------------------------------------------------------------------------

impl<S, E, B> Stream for EventStream<S>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    type Item = Result<ServerSentEvent, E>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<<Self as Stream>::Item>> {
        let mut this = self.project();

        loop {
            if let Some(event) = this.ready.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }

            if this.state.is_terminated() {
                return Poll::Ready(None);
            }

            match ready!(this.stream.as_mut().poll_next(cx)) {
                Some(Ok(chunk)) => {
                    this.ready.extend(this.decoder.decode(chunk.as_ref()));
                }
                Some(Err(e)) => {
                    warn!("sse transport error, terminating event stream");
                    *this.state = EventStreamState::Terminated;
                    this.ready.clear();
                    this.decoder.reset();
                    return Poll::Ready(Some(Err(e)));
                }
                None => {
                    debug!("sse body ended");
                    *this.state = EventStreamState::Terminated;
                    this.ready.extend(this.decoder.flush());
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state.is_terminated() {
            (self.ready.len(), Some(self.ready.len()))
        } else {
            (self.ready.len(), None)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
