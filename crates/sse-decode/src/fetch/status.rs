//! Mapping of non-success responses to [`FetchError`]s.

use http::{StatusCode, header};
use serde_json::Value;

use crate::error::{FetchError, FetchResult};

const JSON_BODY_ERROR: &str = "Failed to parse error response as JSON";
const TEXT_BODY_ERROR: &str = "Failed to parse error response as text";

/// Pass a successful response through; turn anything else into an error.
///
/// The error message is taken from the body: the `message` or `error` field
/// of a JSON body, or the whole body otherwise. An empty or uninformative
/// body falls back to `Error <status>: <reason>`.
///
/// # Errors
///
/// Returns [`FetchError::Status`] for non-success responses, or
/// [`FetchError::ErrorBody`] if the error body cannot be read or parsed.
pub async fn check_ok(response: reqwest::Response) -> FetchResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let fallback = default_message(status);
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    let message = if is_json {
        let body = response
            .text()
            .await
            .map_err(|_| FetchError::error_body(JSON_BODY_ERROR))?;
        let value: Value =
            serde_json::from_str(&body).map_err(|_| FetchError::error_body(JSON_BODY_ERROR))?;
        message_from_json(&value).unwrap_or(fallback)
    } else {
        let body = response
            .text()
            .await
            .map_err(|_| FetchError::error_body(TEXT_BODY_ERROR))?;
        if body.is_empty() { fallback } else { body }
    };

    Err(FetchError::status(status, message))
}

/// `Error <status>: <reason>`
pub(crate) fn default_message(status: StatusCode) -> String {
    format!(
        "Error {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    )
}

/// First truthy value of `message` or `error`.
pub(crate) fn message_from_json(value: &Value) -> Option<String> {
    ["message", "error"]
        .into_iter()
        .find_map(|key| match value.get(key)? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
}
