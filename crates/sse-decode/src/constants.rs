//! Common constants used across the decoder.

/// Newline
pub(crate) const LF: char = '\n';
/// Carriage return
pub(crate) const CR: char = '\r';
/// Field separator inside an SSE line
pub(crate) const COLON: u8 = b':';

/// Emitted in place of bytes that are not valid UTF-8.
pub(crate) const REPLACEMENT: char = char::REPLACEMENT_CHARACTER;

/// Every character that ends a line on its own.
///
/// `\r\n` is handled separately as a single two-character terminator.
pub(crate) const LINE_TERMINATORS: [char; 10] = [
    LF, CR, '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Returns `true` if `c` terminates a line.
#[inline]
pub(crate) fn is_line_terminator(c: char) -> bool {
    LINE_TERMINATORS.contains(&c)
}

/// Charset labels decoded by [`ChunkTextDecoder`](crate::chunk::ChunkTextDecoder).
///
/// `us-ascii` is accepted because it is a strict subset of UTF-8.
pub(crate) const UTF8_LABELS: [&str; 5] = ["utf-8", "utf8", "unicode-1-1-utf-8", "us-ascii", "ascii"];
