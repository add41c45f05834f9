//! Conversation-state core for a document-grounded chat session.
//!
//! Invariant: the model-facing history and the display transcript are
//! mutated only through [`session::ChatSession`]'s own call sequence, so
//! the two representations stay in lockstep without locking.
//!
//! # Public API Overview
//! - Bootstrap a session from a directory of reference documents via
//!   [`ChatSession::start`].
//! - Run one streamed question/answer turn via [`ChatSession::ask`].
//! - Build the initial persona/acknowledgement history with
//!   [`history::build_initial_history`].
//! - Drive a single generation turn directly with [`generate::generate`]
//!   when the caller owns its own history.

pub mod error;
pub mod generate;
pub mod history;
pub mod loader;
pub mod session;
pub mod transcript;

pub use crate::error::{SessionError, SessionInitError};
pub use crate::generate::generate;
pub use crate::history::{build_initial_history, system_instructions_from_env};
pub use crate::session::{ChatSession, SessionState};
pub use crate::transcript::{TranscriptEntry, TranscriptRole};

/// Provider contract types re-exported for session callers.
pub use chat_provider::{
    ChatProvider, GenerateError, Message, MessagePart, ProviderProfile, Role, UploadError,
    UploadedFile,
};
