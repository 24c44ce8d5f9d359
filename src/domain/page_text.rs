use itertools::Itertools;

/// Longest slice of page text that is handed to the classifier.
pub const MAX_EXCERPT_CHARS: usize = 2_500;

/// Collapses every whitespace run (newlines included) into a single space.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().join(" ")
}

/// Prefix of `text` holding at most `max_chars` characters.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
