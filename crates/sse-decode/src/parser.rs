//! Field grammar for a single, already split SSE line.

use crate::constants::COLON;

/// A full line from an SSE stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawEventLine<'a> {
    /// Comment line (starts with `:`)
    Comment,
    /// A field line; `field_value` is empty when the line has no colon.
    Field {
        field_name: &'a str,
        field_value: &'a str,
    },
    /// An empty line (event delimiter).
    Empty,
}

/// Field names the accumulator acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldName {
    Event,
    Data,
    Ignored,
}

impl FieldName {
    pub(crate) fn parse(name: &str) -> Self {
        match name {
            "event" => Self::Event,
            "data" => Self::Data,
            _ => Self::Ignored,
        }
    }
}

/// Splits `line` into its SSE parts.
///
/// The line must already be stripped of its terminator.
pub(crate) fn read_line(line: &str) -> RawEventLine<'_> {
    match memchr::memchr(COLON, line.as_bytes()) {
        Some(0) => RawEventLine::Comment,
        Some(colon_pos) => {
            // `:` is ASCII so both offsets are char boundaries.
            let value = &line[colon_pos + 1..];
            // Strip single leading space if present.
            let value = value.strip_prefix(' ').unwrap_or(value);
            RawEventLine::Field {
                field_name: &line[..colon_pos],
                field_value: value,
            }
        }
        None if line.is_empty() => RawEventLine::Empty,
        None => RawEventLine::Field {
            field_name: line,
            field_value: "",
        },
    }
}
