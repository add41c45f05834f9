//! Terminal chat agent for document-grounded question answering.
//!
//! ## Provider bootstrap
//!
//! `chat_agent` selects its provider from the environment:
//!
//! - `DOCBOT_PROVIDER=gemini-api` (the default) for Gemini API transport
//! - `DOCBOT_PROVIDER=mock` for deterministic local runs
//!
//! Contract notes:
//! - `gemini-api` requires `GEMINI_API_KEY`; a missing or blank key is a
//!   fatal configuration error reported before any network call.
//! - `DOCBOT_MODEL` overrides the Gemini model ID
//!   (default `gemini-2.0-flash`).
//! - `DOCBOT_SYSTEM_INSTRUCTIONS` overrides the built-in persona block;
//!   blank overrides fall back to the default.
//! - A `.env` file in the working directory is loaded at startup.
//!
//! ## Interactive surface
//!
//! The agent reads one free-text question per turn, streams the answer to
//! stdout as fragments arrive, and keeps the session's transcript in
//! lockstep with the model-facing history. A case-insensitive `exit`
//! terminates the loop. Generation failures are reported and the loop
//! continues; initialization failures terminate the process.

pub mod providers;
pub mod repl;
