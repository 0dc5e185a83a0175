use healthhero_ox_common::CommonRequestError;
use thiserror::Error;

/// Categorizes errors for callers that branch on failure class
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Authentication/authorization issues
    Auth,
    /// The request itself was rejected
    InvalidRequest,
    /// Network/connection issues
    Network,
    /// Backend-side failure
    Server,
    /// Application-level failure reported inside an assistant stream
    Assistant,
    /// Unknown/other errors
    Other,
}

#[derive(Debug, Error)]
pub enum HealthHeroRequestError {
    /// Errors from the HTTP client
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Non-success response from the API
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Failure reported by the assistant inside a stream, message verbatim
    #[error("Assistant error: {0}")]
    Assistant(String),

    /// Invalid event data in a stream
    #[error("Invalid event data: {0}")]
    InvalidEventData(String),

    /// Unexpected response from the API
    #[error("Unexpected response from API: {0}")]
    UnexpectedResponse(String),
}

impl HealthHeroRequestError {
    /// Returns the error kind for categorizing failures
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication(_) => ErrorKind::Auth,
            Self::NotFound(_) => ErrorKind::InvalidRequest,
            Self::Api { status, .. } if (400..500).contains(status) => ErrorKind::InvalidRequest,
            Self::Api { .. } => ErrorKind::Server,
            Self::Assistant(_) => ErrorKind::Assistant,
            Self::ReqwestError(e) => {
                if e.is_timeout() || e.is_connect() || e.is_request() {
                    ErrorKind::Network
                } else {
                    ErrorKind::Other
                }
            }
            Self::SerdeError(_)
            | Self::InvalidEventData(_)
            | Self::UnexpectedResponse(_) => ErrorKind::Other,
        }
    }

    /// Display wording for the end user.
    ///
    /// Assistant failures pass the server's message through verbatim; the
    /// transport cases pick wording by status heuristics. Nothing here is
    /// retried on the caller's behalf.
    pub fn user_message(&self) -> String {
        match self {
            Self::Assistant(message) => message.clone(),
            Self::Authentication(_) => {
                "Authentication failed. Please sign in again.".to_string()
            }
            Self::Api { status: 500.., .. } => {
                "The server hit an internal error. Please try again later.".to_string()
            }
            Self::ReqwestError(e) if e.is_timeout() => {
                "The assistant took too long to respond. Please try again.".to_string()
            }
            Self::ReqwestError(_) => {
                "Network connection problem. Please check your connection and retry."
                    .to_string()
            }
            _ => "Sorry, I can't answer that right now.".to_string(),
        }
    }
}

impl From<CommonRequestError> for HealthHeroRequestError {
    fn from(error: CommonRequestError) -> Self {
        match error {
            CommonRequestError::Http(e) => Self::ReqwestError(e),
            CommonRequestError::Json(e) => Self::SerdeError(e),
            CommonRequestError::Utf8(e) => Self::InvalidEventData(e.to_string()),
            CommonRequestError::InvalidEventData(message) => Self::InvalidEventData(message),
            CommonRequestError::UnexpectedResponse(message) => Self::UnexpectedResponse(message),
            CommonRequestError::Status { status, message } => match status.as_u16() {
                401 | 403 => Self::Authentication(message),
                404 => Self::NotFound(message),
                status => Self::Api { status, message },
            },
        }
    }
}
