//! Chunk-to-text conversion.
//!
//! Transport chunks arrive either as text or as raw bytes. Bytes are decoded
//! as UTF-8; a multi-byte sequence cut by a chunk boundary is carried over to
//! the next call instead of being replaced.

use std::any::Any;

use bytes::{Bytes, BytesMut};

use crate::{
    constants::{REPLACEMENT, UTF8_LABELS},
    error::DecodeError,
};

/// One unit of a response body as delivered by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    /// Already-decoded text.
    Text(&'a str),
    /// Raw bytes, decoded as UTF-8.
    Binary(&'a [u8]),
}

impl<'a> Chunk<'a> {
    /// Interpret a dynamically typed value as a chunk.
    ///
    /// Recognizes `String`, `&'static str`, `Box<str>`, `Vec<u8>`,
    /// `Box<[u8]>`, [`Bytes`] and [`BytesMut`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnsupportedChunkType`] for any other type.
    pub fn from_any<T: Any>(value: &'a T) -> Result<Self, DecodeError> {
        let any = value as &dyn Any;

        if let Some(s) = any.downcast_ref::<String>() {
            return Ok(Self::Text(s));
        }
        if let Some(s) = any.downcast_ref::<&'static str>() {
            return Ok(Self::Text(s));
        }
        if let Some(s) = any.downcast_ref::<Box<str>>() {
            return Ok(Self::Text(s));
        }
        if let Some(b) = any.downcast_ref::<Vec<u8>>() {
            return Ok(Self::Binary(b));
        }
        if let Some(b) = any.downcast_ref::<Box<[u8]>>() {
            return Ok(Self::Binary(b));
        }
        if let Some(b) = any.downcast_ref::<Bytes>() {
            return Ok(Self::Binary(b));
        }
        if let Some(b) = any.downcast_ref::<BytesMut>() {
            return Ok(Self::Binary(b));
        }

        Err(DecodeError::unsupported_chunk_type(
            std::any::type_name::<T>(),
        ))
    }

    /// Returns `true` if the chunk carries no data.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Binary(b) => b.is_empty(),
        }
    }
}

impl<'a> From<&'a str> for Chunk<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for Chunk<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a [u8]> for Chunk<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self::Binary(value)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Chunk<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        Self::Binary(value)
    }
}

impl<'a> From<&'a Vec<u8>> for Chunk<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

impl<'a> From<&'a Bytes> for Chunk<'a> {
    fn from(value: &'a Bytes) -> Self {
        Self::Binary(value)
    }
}

impl<'a> From<&'a BytesMut> for Chunk<'a> {
    fn from(value: &'a BytesMut) -> Self {
        Self::Binary(value)
    }
}

/// Converts chunks to text using UTF-8.
///
/// Invalid sequences become U+FFFD. The only state kept between calls is the
/// unfinished tail of a multi-byte character (at most three bytes).
#[derive(Debug, Clone, Default)]
pub struct ChunkTextDecoder {
    incomplete: Vec<u8>,
}

impl ChunkTextDecoder {
    /// Create a UTF-8 decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder for the given charset label.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnsupportedEncoding`] unless the label names
    /// UTF-8 (or ASCII).
    pub fn for_charset(label: &str) -> Result<Self, DecodeError> {
        let label = label.trim().trim_matches('"');
        if UTF8_LABELS.iter().any(|l| l.eq_ignore_ascii_case(label)) {
            Ok(Self::new())
        } else {
            Err(DecodeError::unsupported_encoding(label))
        }
    }

    /// Create a decoder from a `Content-Type` header value.
    ///
    /// A missing `charset` parameter means UTF-8, the only encoding SSE
    /// allows.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnsupportedEncoding`] if the header declares a
    /// charset other than UTF-8.
    pub fn from_content_type(content_type: &str) -> Result<Self, DecodeError> {
        let charset = content_type.split(';').skip(1).find_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("charset")
                .then_some(value)
        });

        match charset {
            Some(label) => Self::for_charset(label),
            None => Ok(Self::new()),
        }
    }

    /// Decode one chunk to text.
    ///
    /// An empty chunk yields an empty string.
    pub fn decode(&mut self, chunk: Chunk<'_>) -> String {
        match chunk {
            Chunk::Text(text) => {
                if self.incomplete.is_empty() {
                    return text.to_owned();
                }
                // A text chunk cannot complete a dangling byte sequence.
                self.incomplete.clear();
                let mut out = String::with_capacity(text.len() + REPLACEMENT.len_utf8());
                out.push(REPLACEMENT);
                out.push_str(text);
                out
            }
            Chunk::Binary(bytes) => self.decode_bytes(bytes),
        }
    }

    /// Flush an unfinished multi-byte sequence at end of stream.
    ///
    /// Returns a single U+FFFD if bytes were left over.
    pub fn finish(&mut self) -> Option<String> {
        if self.incomplete.is_empty() {
            return None;
        }
        self.incomplete.clear();
        Some(REPLACEMENT.to_string())
    }

    /// Returns `true` if part of a multi-byte character is buffered.
    pub fn has_pending(&self) -> bool {
        !self.incomplete.is_empty()
    }

    fn decode_bytes(&mut self, bytes: &[u8]) -> String {
        let joined;
        let mut input = if self.incomplete.is_empty() {
            bytes
        } else {
            self.incomplete.extend_from_slice(bytes);
            joined = std::mem::take(&mut self.incomplete);
            joined.as_slice()
        };

        let mut out = String::with_capacity(input.len());
        loop {
            match std::str::from_utf8(input) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, rest) = input.split_at(e.valid_up_to());
                    // Safety: `valid_up_to` marks the end of the valid prefix.
                    out.push_str(unsafe { std::str::from_utf8_unchecked(valid) });

                    match e.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT);
                            input = &rest[len..];
                        }
                        None => {
                            // Unexpected end of input: wait for the next chunk.
                            self.incomplete.extend_from_slice(rest);
                            break;
                        }
                    }
                }
            }
        }
        out
    }
}
