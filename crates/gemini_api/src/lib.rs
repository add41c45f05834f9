//! Transport-only Gemini API client primitives.
//!
//! This crate owns request building, SSE stream parsing, and file-upload
//! behavior for the Gemini `generateContent` and Files endpoints only. It
//! intentionally contains no session state and no UI coupling.
//!
//! The generation endpoint is stateless between calls: the caller passes
//! the full conversation history as `contents` on every request and this
//! crate streams back incremental response frames.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod payload;
pub mod response;
pub mod sse;
pub mod url;

pub use reqwest::StatusCode;

pub use client::{mime_type_for_path, GeminiApiClient};
pub use config::GeminiApiConfig;
pub use error::GeminiApiError;
pub use payload::{
    Content, FileData, GenerateContentRequest, GenerationConfig, HarmBlockThreshold, HarmCategory,
    Part, SafetySetting,
};
pub use response::{Candidate, FileHandle, FinishReason, GenerateContentResponse, PromptFeedback};
pub use sse::SseStreamParser;
pub use url::normalize_base_url;
