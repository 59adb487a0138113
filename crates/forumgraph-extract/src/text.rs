//! Sentence and token helpers shared by the extractors.

/// Split on runs of `.`, `!` or `?`, dropping blank pieces.
pub fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Keep only ASCII letters, digits and `-`.
pub fn clean_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

pub fn starts_uppercase(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_uppercase())
}
