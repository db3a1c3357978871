//! Incremental line splitting across chunk boundaries.
//!
//! [`LineDecoder`] receives arbitrary text chunks and hands back complete
//! lines with their terminators removed. At most one unterminated fragment is
//! buffered between calls, plus a flag for a trailing `\r` that may turn out
//! to be the first half of a `\r\n` pair.

use tracing::trace;

use crate::{
    chunk::{Chunk, ChunkTextDecoder},
    constants::{CR, LF, is_line_terminator},
};

/// Stateful chunk-to-line splitter.
///
/// Recognized terminators are `\n`, `\r`, `\r\n`, vertical tab, form feed,
/// the file/group/record separators, NEL, LINE SEPARATOR and PARAGRAPH
/// SEPARATOR.
#[derive(Debug, Clone, Default)]
pub struct LineDecoder {
    text: ChunkTextDecoder,
    /// Unterminated tail of the previous chunk. Never contains a terminator.
    fragment: String,
    /// The previous chunk ended in a bare `\r`.
    trailing_cr: bool,
}

impl LineDecoder {
    /// Create a splitter that decodes binary chunks as UTF-8.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a splitter around an existing text decoder.
    #[must_use]
    pub fn with_text_decoder(text: ChunkTextDecoder) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }

    /// Decode a chunk and return every line it completes.
    pub fn decode<'a>(&mut self, chunk: impl Into<Chunk<'a>>) -> Vec<String> {
        let text = self.text.decode(chunk.into());
        self.decode_text(&text)
    }

    /// Split already-decoded text and return every line it completes.
    pub fn decode_text(&mut self, chunk: &str) -> Vec<String> {
        let mut text = String::with_capacity(chunk.len() + 1);
        if std::mem::take(&mut self.trailing_cr) {
            text.push(CR);
        }
        text.push_str(chunk);

        if text.ends_with(CR) {
            text.pop();
            self.trailing_cr = true;
        }

        if text.is_empty() {
            return Vec::new();
        }

        let trailing_terminator = text.chars().next_back().is_some_and(is_line_terminator);
        let mut segments = split_segments(&text);
        if trailing_terminator {
            // The split leaves an empty segment after the last terminator.
            segments.pop();
        }

        if segments.len() == 1 && !trailing_terminator {
            self.fragment.push_str(segments[0]);
            trace!(buffered = self.fragment.len(), "line fragment buffered");
            return Vec::new();
        }

        let mut lines: Vec<String> = segments.into_iter().map(str::to_owned).collect();

        if !self.fragment.is_empty() {
            let mut first = std::mem::take(&mut self.fragment);
            first.push_str(&lines[0]);
            lines[0] = first;
        }

        if !trailing_terminator {
            self.fragment = lines.pop().unwrap_or_default();
        }

        trace!(
            lines = lines.len(),
            buffered = self.fragment.len(),
            "chunk split into lines"
        );
        lines
    }

    /// Return the buffered partial line at end of stream.
    ///
    /// Yields nothing when no fragment and no `\r` is pending; otherwise
    /// yields the fragment (possibly empty) and clears all state.
    pub fn flush(&mut self) -> Vec<String> {
        let mut lines = match self.text.finish() {
            Some(tail) => self.decode_text(&tail),
            None => Vec::new(),
        };

        if self.fragment.is_empty() && !self.trailing_cr {
            return lines;
        }

        self.trailing_cr = false;
        lines.push(std::mem::take(&mut self.fragment));
        lines
    }

    /// Returns `true` if a partial line or a trailing `\r` is buffered.
    pub fn has_pending(&self) -> bool {
        !self.fragment.is_empty() || self.trailing_cr || self.text.has_pending()
    }

    /// Length in bytes of the buffered partial line.
    pub fn buffered_len(&self) -> usize {
        self.fragment.len()
    }

    /// Discard all buffered state.
    pub fn reset(&mut self) {
        *self = Self::with_text_decoder(ChunkTextDecoder::new());
    }
}

/// Splits `text` on every terminator, treating `\r\n` as one.
///
/// Like a regex split, the result always has one more segment than there
/// are terminators.
fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_line_terminator(c) {
            continue;
        }
        segments.push(&text[start..idx]);
        start = idx + c.len_utf8();
        if c == CR && chars.next_if(|&(_, next)| next == LF).is_some() {
            start += 1;
        }
    }
    segments.push(&text[start..]);
    segments
}
