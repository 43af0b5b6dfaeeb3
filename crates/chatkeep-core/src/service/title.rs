//! Conversation title derivation.

use chatkeep_types::conversation::DEFAULT_TITLE;

/// Maximum title length, counted in characters.
pub const TITLE_MAX_CHARS: usize = 20;

/// Derive a display title from a conversation's first prompt.
///
/// Takes the first 20 characters verbatim (no word-boundary handling);
/// an empty prompt gets [`DEFAULT_TITLE`].
pub fn derive_title(prompt: &str) -> String {
    if prompt.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    prompt.chars().take(TITLE_MAX_CHARS).collect()
}
