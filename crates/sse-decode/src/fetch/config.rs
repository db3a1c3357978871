//! Options for [`fetch_event_source`](super::fetch_event_source).

use std::{fmt, time::Duration};

use http::{HeaderMap, HeaderValue, Method, header};
use serde::Serialize;

use crate::{
    error::{FetchError, FetchResult},
    event::ServerSentEvent,
};

/// Called once the response passed the status check.
pub type OpenCallback = Box<dyn FnMut(&reqwest::Response) + Send>;
/// Called for every dispatched event, before the next chunk is read.
pub type MessageCallback = Box<dyn FnMut(ServerSentEvent) + Send>;
/// Called after the body ended and the decoder was flushed.
pub type CloseCallback = Box<dyn FnOnce() + Send>;
/// Called with the error that ended the request.
pub type ErrorCallback = Box<dyn FnOnce(&FetchError) + Send>;

/// Request payload.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// Sent as `text/plain`.
    Text(String),
    /// Sent as `application/octet-stream`.
    Bytes(Vec<u8>),
    /// Serialized and sent as `application/json`.
    Json(serde_json::Value),
}

impl RequestBody {
    /// Default `Content-Type` for this payload kind.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Text(_) => "text/plain",
            Self::Bytes(_) => "application/octet-stream",
            Self::Json(_) => "application/json",
        }
    }

    fn into_bytes(self) -> FetchResult<Vec<u8>> {
        match self {
            Self::Text(s) => Ok(s.into_bytes()),
            Self::Bytes(b) => Ok(b),
            Self::Json(v) => Ok(serde_json::to_vec(&v)?),
        }
    }
}

/// Options for one event-source request.
///
/// All callbacks are optional. Without [`on_message`](Self::on_message) the
/// response body is not consumed.
///
/// Defaults:
/// - method: `GET`, or `POST` when a body or data is set
/// - headers: none beyond [`default_headers`](Self::default_headers)
/// - connect timeout: 10 seconds
pub struct FetchOptions {
    /// Explicit HTTP method.
    pub method: Option<Method>,
    /// Caller headers; these override the defaults.
    pub headers: HeaderMap,
    /// Raw payload. Takes precedence over `data`.
    pub body: Option<RequestBody>,
    /// JSON payload used when no `body` is set.
    pub data: Option<serde_json::Value>,
    /// Time allowed until response headers arrive.
    pub connect_timeout: Duration,
    pub(crate) on_open: Option<OpenCallback>,
    pub(crate) on_message: Option<MessageCallback>,
    pub(crate) on_close: Option<CloseCallback>,
    pub(crate) on_error: Option<ErrorCallback>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            method: None,
            headers: HeaderMap::new(),
            body: None,
            data: None,
            connect_timeout: Duration::from_secs(10),
            on_open: None,
            on_message: None,
            on_close: None,
            on_error: None,
        }
    }
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("data", &self.data)
            .field("connect_timeout", &self.connect_timeout)
            .field("on_open", &self.on_open.is_some())
            .field("on_message", &self.on_message.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl FetchOptions {
    /// Create options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Set caller headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Add one caller header.
    #[must_use]
    pub fn header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the raw request payload.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Set a JSON payload from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Serialization`] if `data` cannot be represented
    /// as JSON.
    pub fn data<T: Serialize + ?Sized>(mut self, data: &T) -> FetchResult<Self> {
        self.data = Some(serde_json::to_value(data)?);
        Ok(self)
    }

    /// Set the connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Register the open callback.
    #[must_use]
    pub fn on_open(mut self, f: impl FnMut(&reqwest::Response) + Send + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    /// Register the message callback.
    #[must_use]
    pub fn on_message(mut self, f: impl FnMut(ServerSentEvent) + Send + 'static) -> Self {
        self.on_message = Some(Box::new(f));
        self
    }

    /// Register the close callback.
    #[must_use]
    pub fn on_close(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    /// Register the error callback.
    #[must_use]
    pub fn on_error(mut self, f: impl FnOnce(&FetchError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// The payload that will be sent, if any.
    pub fn request_body(&self) -> Option<RequestBody> {
        self.body
            .clone()
            .or_else(|| self.data.clone().map(RequestBody::Json))
    }

    /// The method that will be used.
    pub fn request_method(&self) -> Method {
        match &self.method {
            Some(method) => method.clone(),
            None if self.body.is_some() || self.data.is_some() => Method::POST,
            None => Method::GET,
        }
    }

    /// Headers added before the caller's.
    ///
    /// `Accept` is `text/event-stream` when a message callback is registered
    /// and `application/json` otherwise. `Content-Type` follows the payload
    /// kind and is omitted without a payload.
    pub fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let accept = if self.on_message.is_some() {
            "text/event-stream"
        } else {
            "application/json"
        };
        headers.insert(header::ACCEPT, HeaderValue::from_static(accept));

        if let Some(body) = self.request_body() {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(body.content_type()),
            );
        }
        headers
    }

    /// Defaults merged with the caller's headers; caller values replace
    /// defaults of the same name.
    pub fn merged_headers(&self) -> HeaderMap {
        let mut headers = self.default_headers();
        headers.extend(self.headers.clone());
        headers
    }

    pub(crate) fn encoded_body(&self) -> FetchResult<Option<Vec<u8>>> {
        self.request_body().map(RequestBody::into_bytes).transpose()
    }

    /// Validate the options.
    ///
    /// # Errors
    ///
    /// Returns an error message string if any field has an invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.connect_timeout.is_zero() {
            return Err("Connect timeout must be > 0".to_string());
        }
        if self.request_method() == Method::GET && self.request_body().is_some() {
            return Err("GET requests cannot carry a body".to_string());
        }
        Ok(())
    }
}
