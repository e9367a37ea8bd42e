use crate::semantic::MAX_EMBED_CHARS;

pub(super) const NOTHING_PENDING_MESSAGE: &str =
    "Wszystkie dokumenty mają już embeddingi. Użyj --force aby wygenerować ponownie.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedOptions {
    pub force: bool,
    pub max_chars: usize,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            force: false,
            max_chars: MAX_EMBED_CHARS,
        }
    }
}
