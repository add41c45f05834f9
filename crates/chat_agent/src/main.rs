use std::io;
use std::path::PathBuf;

use chat_agent::{providers, repl};
use docbot::{system_instructions_from_env, ChatProvider, ChatSession};
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let directory = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let provider = providers::provider_from_env().map_err(io::Error::other)?;
    tracing::info!(provider = %provider.profile(), directory = %directory.display(), "starting session");

    let mut session =
        ChatSession::with_system_instructions(provider, Some(system_instructions_from_env()));
    session.start(&directory).map_err(io::Error::other)?;

    let stdin = io::stdin();
    repl::run(&mut session, stdin.lock(), io::stdout())
}
