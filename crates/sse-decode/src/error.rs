//! Error types for the decoder and the fetch layer.

use thiserror::Error;

/// Unrecoverable errors raised while turning chunks into text.
///
/// Both variants describe a misconfigured stream rather than a bad chunk, so
/// callers should abort the stream instead of skipping the chunk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The chunk is neither text nor a recognized binary buffer.
    #[error("Unsupported chunk type: {type_name}")]
    UnsupportedChunkType { type_name: &'static str },

    /// The stream declares a charset this decoder cannot turn into text.
    #[error("Unsupported text encoding: {charset}")]
    UnsupportedEncoding { charset: String },
}

impl DecodeError {
    /// Create an unsupported chunk type error.
    pub fn unsupported_chunk_type(type_name: &'static str) -> Self {
        Self::UnsupportedChunkType { type_name }
    }

    /// Create an unsupported encoding error.
    pub fn unsupported_encoding(charset: impl Into<String>) -> Self {
        Self::UnsupportedEncoding {
            charset: charset.into(),
        }
    }
}

/// Result type used by the fetch layer.
#[cfg(feature = "fetch")]
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors surfaced by [`fetch_event_source`](crate::fetch::fetch_event_source).
#[cfg(feature = "fetch")]
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request or body transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status; `message` is taken from the response body when
    /// possible.
    #[error("{message}")]
    Status {
        status: http::StatusCode,
        message: String,
    },

    /// The error response body could not be read or parsed.
    #[error("{message}")]
    ErrorBody { message: String },

    /// The response body cannot be decoded into text.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Request payload serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid options
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The server did not answer within the connect timeout.
    #[error("Request timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },
}

#[cfg(feature = "fetch")]
impl FetchError {
    /// Create a status error.
    pub fn status(status: http::StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Create an error-body error.
    pub fn error_body(message: impl Into<String>) -> Self {
        Self::ErrorBody {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(duration: std::time::Duration) -> Self {
        Self::Timeout { duration }
    }

    /// HTTP status of the failed response, if the server answered.
    pub fn status_code(&self) -> Option<http::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}
