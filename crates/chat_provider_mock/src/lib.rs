//! Deterministic mock implementation of the shared `chat_provider` contract.
//!
//! This crate contains no transport logic and is intended for local runs
//! and contract-level integration testing. Uploads mint `mock://` handles
//! without touching the filesystem; generation replays a scripted fragment
//! sequence or a scripted failure, identically on every call.

use std::path::Path;
use std::thread;
use std::time::Duration;

use chat_provider::{
    ChatProvider, GenerateError, Message, ProviderProfile, UploadError, UploadedFile,
};

/// Stable provider identifier used for explicit startup selection.
pub const MOCK_PROVIDER_ID: &str = "mock";

#[derive(Debug, Clone, PartialEq, Eq)]
enum GenerateOutcome {
    Succeed,
    FailClient(String),
    FailStream(String),
}

/// Deterministic mock provider used by `chat_agent` local runs and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockProvider {
    fragments: Vec<String>,
    generate_outcome: GenerateOutcome,
    fail_uploads: bool,
}

impl MockProvider {
    const FRAGMENT_DELAY_MS: u64 = 50;

    /// Creates a mock provider that streams the given fragments on every call.
    #[must_use]
    pub fn new(fragments: Vec<String>) -> Self {
        Self {
            fragments,
            generate_outcome: GenerateOutcome::Succeed,
            fail_uploads: false,
        }
    }

    /// Creates a mock provider whose generation calls fail with the
    /// request-rejection class (authentication/quota).
    #[must_use]
    pub fn failing_client(message: impl Into<String>) -> Self {
        Self {
            fragments: Vec::new(),
            generate_outcome: GenerateOutcome::FailClient(message.into()),
            fail_uploads: false,
        }
    }

    /// Creates a mock provider whose generation calls fail mid-stream.
    #[must_use]
    pub fn failing_stream(message: impl Into<String>) -> Self {
        Self {
            fragments: Vec::new(),
            generate_outcome: GenerateOutcome::FailStream(message.into()),
            fail_uploads: false,
        }
    }

    /// Makes every upload fail, for all-or-nothing initialization tests.
    #[must_use]
    pub fn with_failing_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(vec![
            "This is a mocked answer streamed ".to_string(),
            "fragment by fragment. ".to_string(),
            "The uploaded reference documents were not consulted, ".to_string(),
            "because the mock provider never leaves the process.".to_string(),
        ])
    }
}

impl ChatProvider for MockProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: MOCK_PROVIDER_ID.to_string(),
            model_id: "mock".to_string(),
        }
    }

    fn upload_file(&self, path: &Path) -> Result<UploadedFile, UploadError> {
        if self.fail_uploads {
            return Err(UploadError::new(path, "mock upload failure"));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| UploadError::new(path, "path has no file name"))?;
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone());

        Ok(UploadedFile {
            name: format!("files/{stem}"),
            display_name: file_name.clone(),
            uri: format!("mock://files/{file_name}"),
            mime_type: mime_type_for_name(&file_name),
        })
    }

    fn generate(
        &self,
        history: &[Message],
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, GenerateError> {
        let _ = history;

        match &self.generate_outcome {
            GenerateOutcome::FailClient(message) => {
                return Err(GenerateError::client(message.clone()))
            }
            GenerateOutcome::FailStream(message) => {
                return Err(GenerateError::stream(message.clone()))
            }
            GenerateOutcome::Succeed => {}
        }

        let mut accumulated = String::new();
        for fragment in &self.fragments {
            on_fragment(fragment);
            accumulated.push_str(fragment);
            thread::sleep(Duration::from_millis(Self::FRAGMENT_DELAY_MS));
        }

        Ok(accumulated)
    }
}

fn mime_type_for_name(file_name: &str) -> String {
    let mime = match file_name.rsplit('.').next() {
        Some("csv") => "text/csv",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    };

    mime.to_string()
}
