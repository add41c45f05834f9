//! Minimal provider-agnostic contract for document-grounded chat generation.
//!
//! This crate defines only the shared message model, uploaded-file handle,
//! and provider interface. It excludes transport details, wire payloads,
//! and session orchestration concerns.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Message author on the API-facing side of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Returns the stable wire name for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One part of a message: literal text or a reference to an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePart {
    Text { text: String },
    FileRef { uri: String, mime_type: String },
}

/// One turn in the model-facing conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<MessagePart>,
}

impl Message {
    /// Creates a user turn holding a single text part.
    #[must_use]
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![MessagePart::Text { text: text.into() }],
        }
    }

    /// Creates a model turn holding a single text part.
    #[must_use]
    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![MessagePart::Text { text: text.into() }],
        }
    }

    /// Creates a user turn referencing one uploaded file.
    #[must_use]
    pub fn user_file(file: &UploadedFile) -> Self {
        Self {
            role: Role::User,
            parts: vec![MessagePart::FileRef {
                uri: file.uri.clone(),
                mime_type: file.mime_type.clone(),
            }],
        }
    }

    /// Concatenates the text parts of this message, skipping file references.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            if let MessagePart::Text { text } = part {
                out.push_str(text);
            }
        }
        out
    }
}

/// Opaque handle returned by the upload service for one reference document.
///
/// `name` is the service-assigned identity; `display_name` is the local
/// file name the handle was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub display_name: String,
    pub uri: String,
    pub mime_type: String,
}

/// Immutable metadata describing a chat provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub provider_id: String,
    pub model_id: String,
}

impl fmt::Display for ProviderProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider_id, self.model_id)
    }
}

/// Failure while uploading one reference document.
#[derive(Debug, Error)]
#[error("failed to upload {}: {message}", path.display())]
pub struct UploadError {
    pub path: PathBuf,
    pub message: String,
}

impl UploadError {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Failure while generating one model response.
///
/// `Client` covers the authentication/quota/malformed-request class the
/// upstream service reports as a request rejection; `Stream` covers any
/// other failure while the response stream is being produced or consumed.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("model request rejected: {message}")]
    Client { message: String },

    #[error("model stream failed: {message}")]
    Stream { message: String },
}

impl GenerateError {
    #[must_use]
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
        }
    }

    /// Returns true for the request-rejection class of failures.
    #[must_use]
    pub fn is_client(&self) -> bool {
        matches!(self, Self::Client { .. })
    }
}

/// Provider interface for uploads and streamed generation.
///
/// `generate` consumes the provider's response stream to completion,
/// forwarding each text fragment to `on_fragment` in arrival order, and
/// returns the exact concatenation of the forwarded fragments.
pub trait ChatProvider: Send + Sync + 'static {
    /// Returns provider/model identity metadata.
    fn profile(&self) -> ProviderProfile;

    /// Uploads one local file and returns its service handle.
    fn upload_file(&self, path: &Path) -> Result<UploadedFile, UploadError>;

    /// Generates one streamed response for the full message history.
    fn generate(
        &self,
        history: &[Message],
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, GenerateError>;
}
