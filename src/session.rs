//! Session coordination: one owner for the model-facing history and the
//! display transcript.

use std::path::Path;
use std::sync::Arc;

use chat_provider::{ChatProvider, Message, ProviderProfile, UploadedFile};

use crate::error::{SessionError, SessionInitError};
use crate::history;
use crate::loader;
use crate::transcript::TranscriptEntry;

/// Lifecycle state for one session.
///
/// `Failed` is terminal: a session whose initialization failed never
/// accepts questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
    Generating,
    Failed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::Generating => "generating",
            Self::Failed => "failed",
        }
    }
}

/// One conversation session, owned by the caller.
///
/// The session holds the conversation history (API-facing, replayed in
/// full on every generation call), the display transcript (UI-facing,
/// text only), and the uploaded file handles, for the process lifetime.
pub struct ChatSession {
    provider: Arc<dyn ChatProvider>,
    system_instructions: String,
    state: SessionState,
    history: Vec<Message>,
    transcript: Vec<TranscriptEntry>,
    files: Vec<UploadedFile>,
}

impl ChatSession {
    /// Creates an uninitialized session with the default persona.
    #[must_use]
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self::with_system_instructions(provider, None)
    }

    /// Creates an uninitialized session; `None` selects the default persona.
    #[must_use]
    pub fn with_system_instructions(
        provider: Arc<dyn ChatProvider>,
        system_instructions: Option<String>,
    ) -> Self {
        Self {
            provider,
            system_instructions: system_instructions
                .unwrap_or_else(|| history::DEFAULT_SYSTEM_INSTRUCTIONS.to_string()),
            state: SessionState::Uninitialized,
            history: Vec::new(),
            transcript: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn provider_profile(&self) -> ProviderProfile {
        self.provider.profile()
    }

    /// Initialize the session from a directory of reference documents.
    ///
    /// Runs the file loader and the history builder exactly once. Any
    /// failure is fatal: the session moves to `Failed` and stays there.
    pub fn start(&mut self, directory: &Path) -> Result<(), SessionInitError> {
        if self.state != SessionState::Uninitialized {
            return Err(SessionInitError::AlreadyStarted);
        }
        self.state = SessionState::Initializing;

        match loader::upload_reference_files(self.provider.as_ref(), directory) {
            Ok(files) => {
                self.history = history::build_initial_history(&self.system_instructions, &files);
                self.files = files;
                self.state = SessionState::Ready;
                tracing::info!(
                    files = self.files.len(),
                    history_turns = self.history.len(),
                    "session ready"
                );
                Ok(())
            }
            Err(error) => {
                self.state = SessionState::Failed;
                tracing::error!(error = %error, "session initialization failed");
                Err(error)
            }
        }
    }

    /// Run one question/answer turn.
    ///
    /// The user entry is appended to the transcript before generation
    /// runs. On success the history gains a user and a model turn and the
    /// transcript gains a matching assistant entry. On generation failure
    /// the history keeps the trailing user turn and the transcript keeps
    /// an unmatched user entry; the session returns to `Ready` and stays
    /// usable for subsequent turns.
    pub fn ask(
        &mut self,
        user_text: &str,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::NotReady {
                state: self.state.as_str(),
            });
        }

        self.transcript.push(TranscriptEntry::user(user_text));
        self.state = SessionState::Generating;
        let outcome = crate::generate::generate(
            self.provider.as_ref(),
            &mut self.history,
            user_text,
            on_fragment,
        );
        self.state = SessionState::Ready;

        match outcome {
            Ok(text) => {
                self.transcript.push(TranscriptEntry::assistant(text.clone()));
                Ok(text)
            }
            Err(error) => {
                tracing::warn!(error = %error, "generation failed; answer absent for this turn");
                Err(SessionError::Generate(error))
            }
        }
    }
}
