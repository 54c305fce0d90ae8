use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The remote host reported that the path does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// Text failed to parse as JSON. Carries the parser's message.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// The remote host rejected the request. `body` is the response payload verbatim.
    #[error("{}", api_message(.body))]
    ApiError { status: u16, body: Value },

    /// No response reached us.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Could not decode file content: {0}")]
    Decode(String),

    #[error("Invalid file handle: {0}")]
    InvalidHandle(String),

    #[error("No document is loaded")]
    NotLoaded,

    #[error("Another load or save is in progress")]
    Busy,
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// HTTP status for errors that came back from the host.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::NotFound(_) => Some(404),
            Error::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidJson(e.to_string())
    }
}

/// The provider's `message` field when there is one, otherwise the serialized body.
fn api_message(body: &Value) -> String {
    match body.get("message").and_then(Value::as_str) {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => match body {
            Value::Null => "GitHub API error".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    }
}
