//! Initial conversation-history construction.
//!
//! The bootstrap history is deterministic given the same uploaded file set
//! and order: a persona instruction turn, a fixed acknowledgement turn,
//! then one (file reference, acknowledgement) turn pair per uploaded file.

use chat_provider::{Message, UploadedFile};

pub const SYSTEM_INSTRUCTIONS_ENV_VAR: &str = "DOCBOT_SYSTEM_INSTRUCTIONS";

pub const DEFAULT_SYSTEM_INSTRUCTIONS: &str = "You are ClarkBot, an intelligent and helpful \
virtual assistant. You have access to information from the files I uploaded. Use that \
information to answer my questions. If you cannot find the information, please inform the user \
that you do not have the information available.";

/// Fixed model turn following the persona instructions.
pub const INSTRUCTIONS_ACKNOWLEDGEMENT: &str = "Okay, I understand...";

/// Resolve the system instructions, honoring the environment override.
pub fn system_instructions_from_env() -> String {
    let from_env = std::env::var(SYSTEM_INSTRUCTIONS_ENV_VAR).ok();
    sanitize_system_instructions(from_env)
}

fn sanitize_system_instructions(raw: Option<String>) -> String {
    let Some(value) = raw else {
        return DEFAULT_SYSTEM_INSTRUCTIONS.to_string();
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        DEFAULT_SYSTEM_INSTRUCTIONS.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Model turn acknowledging one uploaded file by its service name.
pub fn file_acknowledgement(file_name: &str) -> String {
    format!("Okay, I have processed the {file_name} data.")
}

/// Assemble the bootstrap history for one session.
///
/// The result always holds `2 + 2 × files.len()` turns, with the
/// file-derived pairs in the order of `files`.
pub fn build_initial_history(system_instructions: &str, files: &[UploadedFile]) -> Vec<Message> {
    let mut history = Vec::with_capacity(2 + files.len() * 2);

    history.push(Message::user_text(system_instructions));
    history.push(Message::model_text(INSTRUCTIONS_ACKNOWLEDGEMENT));

    for file in files {
        history.push(Message::user_file(file));
        history.push(Message::model_text(file_acknowledgement(&file.name)));
    }

    history
}
