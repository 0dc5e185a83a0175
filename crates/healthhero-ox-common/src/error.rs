use thiserror::Error;

/// Common errors that can occur while talking to the backend over HTTP
#[derive(Error, Debug)]
pub enum CommonRequestError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8 conversion error
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid event data in a streaming response
    #[error("Invalid event data: {0}")]
    InvalidEventData(String),

    /// Non-success HTTP status, with the message extracted from the body
    #[error("HTTP {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Response decoded but did not match the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Parse an error response from HTTP status and body.
///
/// The backend is FastAPI-shaped: failures carry `{"detail": ...}` where
/// `detail` is usually a string but may be a validation-error array.
pub fn parse_error_response(status: reqwest::StatusCode, body: &bytes::Bytes) -> CommonRequestError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|json| extract_error_message(&json))
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

    CommonRequestError::Status { status, message }
}

/// Extract a human-readable message from the JSON error formats the backend emits
fn extract_error_message(json: &serde_json::Value) -> Option<String> {
    // FastAPI format: {"detail": "..."} or {"detail": [{...validation...}]}
    if let Some(detail) = json.get("detail") {
        if let Some(text) = detail.as_str() {
            return Some(text.to_string());
        }
        if detail.is_array() || detail.is_object() {
            return Some(detail.to_string());
        }
    }

    // Generic message field
    if let Some(text) = json.get("message").and_then(|m| m.as_str()) {
        return Some(text.to_string());
    }

    None
}
