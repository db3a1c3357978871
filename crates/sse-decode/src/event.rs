//! The decoded event type.

use serde::{Deserialize, Serialize};

/// One event dispatched by an SSE stream.
///
/// Produced by [`EventAccumulator`](crate::accumulator::EventAccumulator) on
/// a blank line and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerSentEvent {
    /// The `event:` field, or `None` if the stream never sent one.
    pub event: Option<String>,
    /// Every `data:` value joined with `\n`, in arrival order.
    pub data: String,
    /// The raw lines, comments included, that made up this event.
    pub raw: Vec<String>,
}

impl ServerSentEvent {
    /// Event type, if the stream named one.
    pub fn event_type(&self) -> Option<&str> {
        self.event.as_deref()
    }

    /// The joined data payload.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Iterate over the individual `data:` lines.
    pub fn data_lines(&self) -> std::str::Split<'_, char> {
        self.data.split('\n')
    }

    /// Returns `true` if the event type matches `name`.
    pub fn is(&self, name: &str) -> bool {
        self.event.as_deref() == Some(name)
    }
}
