//! Single-turn response generation against a provider-owned stream.

use chat_provider::{ChatProvider, GenerateError, Message};

/// Run one generation turn: append the user turn, stream the model
/// response, append the model turn.
///
/// Each fragment is forwarded to `on_fragment` in arrival order as a side
/// effect; the appended model turn holds the exact concatenation of the
/// forwarded fragments, and that text is also returned.
///
/// Failure is deliberately not atomic: when the provider reports an error
/// the appended user turn stays in `history` and no model turn is added,
/// leaving a trailing user turn the caller must account for.
pub fn generate(
    provider: &dyn ChatProvider,
    history: &mut Vec<Message>,
    user_text: &str,
    on_fragment: &mut dyn FnMut(&str),
) -> Result<String, GenerateError> {
    history.push(Message::user_text(user_text));

    let text = provider.generate(history, on_fragment)?;
    history.push(Message::model_text(text.clone()));

    Ok(text)
}
