use std::fmt;
use std::path::PathBuf;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Error as JsonError;

#[derive(Debug)]
pub enum GeminiApiError {
    MissingApiKey,
    InvalidHeader(String),
    InvalidRequestPayload(String),
    Request(reqwest::Error),
    Status(StatusCode, String),
    Serde(JsonError),
    PromptBlocked {
        reason: String,
    },
    StreamFailed {
        message: String,
    },
    FileRead {
        path: PathBuf,
        message: String,
    },
    Unknown(String),
}

impl GeminiApiError {
    /// Returns true for the request-rejection class of failures: missing or
    /// malformed credentials, malformed requests, and any HTTP 4xx status
    /// (authentication, quota, invalid argument).
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::MissingApiKey | Self::InvalidHeader(_) | Self::InvalidRequestPayload(_) => true,
            Self::Status(status, _) => status.is_client_error(),
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(rename = "error")]
    pub value: Option<ErrorPayloadFields>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayloadFields {
    pub message: Option<String>,
    pub status: Option<String>,
}

impl ErrorPayloadFields {
    pub fn message_or_fallback(&self) -> Option<String> {
        let explicit = self.message.as_deref().and_then(non_empty_string)?;

        match self.status.as_deref().and_then(non_empty_string) {
            Some(status) => Some(format!("{status}: {explicit}")),
            None => Some(explicit.to_owned()),
        }
    }
}

impl fmt::Display for GeminiApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "API key is required"),
            Self::InvalidHeader(message) => write!(f, "invalid request header: {message}"),
            Self::InvalidRequestPayload(message) => {
                write!(f, "invalid request payload: {message}")
            }
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status(status, message) => write!(f, "HTTP {status} {message}"),
            Self::Serde(error) => write!(f, "serialization error: {error}"),
            Self::PromptBlocked { reason } => write!(f, "prompt blocked by safety: {reason}"),
            Self::StreamFailed { message } => write!(f, "stream failed: {message}"),
            Self::FileRead { path, message } => {
                write!(f, "failed to read {}: {message}", path.display())
            }
            Self::Unknown(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for GeminiApiError {}

impl From<reqwest::Error> for GeminiApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

impl From<JsonError> for GeminiApiError {
    fn from(error: JsonError) -> Self {
        Self::Serde(error)
    }
}

/// Extract a human-readable message from a Gemini error response body.
///
/// Gemini reports failures as `{"error": {"code", "message", "status"}}`;
/// anything else falls back to the raw body or the HTTP reason phrase.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    let parsed = match serde_json::from_str::<ErrorPayload>(body) {
        Ok(payload) => payload,
        Err(_) => {
            return if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body.to_string()
            };
        }
    };

    if let Some(error) = parsed.value {
        if let Some(message) = error.message_or_fallback() {
            return message;
        }
    }

    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}

fn non_empty_string(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
