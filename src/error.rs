use std::path::PathBuf;

use thiserror::Error;

use chat_provider::{GenerateError, UploadError};

/// Fatal initialization failures. A session that fails to start is
/// terminal: it never becomes usable and `ask` is rejected.
#[derive(Debug, Error)]
pub enum SessionInitError {
    #[error("session already started")]
    AlreadyStarted,

    #[error("cannot read reference directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no .csv or .txt reference files found in {}", path.display())]
    NoMatchingFiles { path: PathBuf },

    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// Per-turn failures. Generation errors are recoverable: the turn's
/// answer is absent but the session stays usable.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is not ready for questions (state: {state})")]
    NotReady { state: &'static str },

    #[error(transparent)]
    Generate(#[from] GenerateError),
}
