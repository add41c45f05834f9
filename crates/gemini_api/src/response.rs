use serde::{Deserialize, Serialize};

use crate::payload::Content;

/// One streamed response frame from the `generateContent` endpoint family.
///
/// Streamed generation delivers a sequence of these; each carries the next
/// text fragment in `candidates[0]`. A populated `prompt_feedback` block
/// reason means the service refused the prompt outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts, if any text arrived
    /// in this frame.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let mut out = String::new();
        let mut saw_text = false;

        for part in &content.parts {
            if let Some(text) = part.text.as_deref() {
                out.push_str(text);
                saw_text = true;
            }
        }

        saw_text.then_some(out)
    }

    /// Block reason reported by prompt feedback, if the prompt was refused.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()?
            .block_reason
            .as_deref()
            .filter(|reason| !reason.is_empty())
    }

    /// Terminal finish reason of the first candidate, if present.
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.candidates.first()?.finish_reason
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Canonical terminal state reported per candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    #[serde(other)]
    Other,
}

impl FinishReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "STOP",
            Self::MaxTokens => "MAX_TOKENS",
            Self::Safety => "SAFETY",
            Self::Recitation => "RECITATION",
            Self::Other => "OTHER",
        }
    }
}

/// Handle returned by the Files service for one uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHandle {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub uri: String,
    pub mime_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadFileResponse {
    pub file: FileHandle,
}
