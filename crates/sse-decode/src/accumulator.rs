//! Groups complete lines into [`ServerSentEvent`]s.

use tracing::{debug, trace};

use crate::{
    constants::CR,
    event::ServerSentEvent,
    parser::{FieldName, RawEventLine, read_line},
};

// ---------------------------------------------------------------------------
// EventBuilder
// ---------------------------------------------------------------------------

/// The in-progress event. Replaced as a whole on dispatch or reset.
#[derive(Debug, Clone, Default)]
struct EventBuilder {
    event: Option<String>,
    data: DataBuffer,
    raw: Vec<String>,
}

/// Joined `data:` values.
///
/// Distinguishes "no data line yet" from "one empty data line", which matters
/// for deciding whether a blank line dispatches.
#[derive(Debug, Clone, Default)]
enum DataBuffer {
    #[default]
    Uninit,
    Joined(String),
}

impl DataBuffer {
    fn push_str(&mut self, s: &str) {
        match self {
            Self::Uninit => *self = Self::Joined(s.to_owned()),
            Self::Joined(buf) => {
                buf.push('\n');
                buf.push_str(s);
            }
        }
    }

    fn freeze(self) -> String {
        match self {
            Self::Uninit => String::new(),
            Self::Joined(s) => s,
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Self::Uninit)
    }
}

impl EventBuilder {
    fn add(&mut self, line: &str) {
        self.raw.push(line.to_owned());

        match read_line(line) {
            RawEventLine::Field {
                field_name,
                field_value,
            } => match FieldName::parse(field_name) {
                FieldName::Event => self.event = Some(field_value.to_owned()),
                FieldName::Data => self.data.push_str(field_value),
                FieldName::Ignored => (),
            },
            // Comments only contribute to `raw`.
            RawEventLine::Comment | RawEventLine::Empty => (),
        }
    }

    /// An empty `event:` value counts as absent.
    fn has_fields(&self) -> bool {
        self.event.as_deref().is_some_and(|e| !e.is_empty()) || !self.data.is_empty()
    }

    fn build(self) -> ServerSentEvent {
        ServerSentEvent {
            event: self.event,
            data: self.data.freeze(),
            raw: self.raw,
        }
    }
}

// ---------------------------------------------------------------------------
// EventAccumulator
// ---------------------------------------------------------------------------

/// Stateful consumer of complete lines.
///
/// Idle until the first non-blank line, then accumulating until a blank line
/// dispatches the event. An event that never sees its blank line is dropped
/// by [`reset`](Self::reset) or simply abandoned with the accumulator.
#[derive(Debug, Clone, Default)]
pub struct EventAccumulator {
    builder: EventBuilder,
}

impl EventAccumulator {
    /// Create an idle accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one terminator-stripped line.
    ///
    /// Returns the completed event when `line` is blank and an event type or
    /// at least one data line has been recorded.
    pub fn push_line(&mut self, line: &str) -> Option<ServerSentEvent> {
        let line = line.strip_suffix(CR).unwrap_or(line);

        if !line.is_empty() {
            trace!(line, "sse line");
            self.builder.add(line);
            return None;
        }

        let builder = std::mem::take(&mut self.builder);
        if !builder.has_fields() {
            // Comment-only blocks end here too.
            if !builder.raw.is_empty() {
                trace!(lines = builder.raw.len(), "discarding block without fields");
            }
            return None;
        }

        let event = builder.build();
        debug!(
            event = event.event.as_deref().unwrap_or_default(),
            data_len = event.data.len(),
            raw_lines = event.raw.len(),
            "sse event dispatched"
        );
        Some(event)
    }

    /// Returns `true` while lines are recorded for an undispatched event.
    pub fn is_accumulating(&self) -> bool {
        !self.builder.raw.is_empty()
    }

    /// Discard the in-progress event.
    ///
    /// Returns `true` if an event with fields was dropped.
    pub fn reset(&mut self) -> bool {
        let dropped = std::mem::take(&mut self.builder);
        if dropped.has_fields() {
            debug!(
                raw_lines = dropped.raw.len(),
                "dropping sse event without terminating blank line"
            );
            return true;
        }
        false
    }
}
