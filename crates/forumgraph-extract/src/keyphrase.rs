//! Sliding-window key-phrase extraction.
//!
//! From every token position, a window grows over up to four consecutive
//! "heavy" tokens (longer than three characters and either capitalized or
//! longer than six). Windows of at least two tokens and more than six
//! characters are kept.

use crate::text::{clean_token, split_sentences, starts_uppercase};

const MAX_WINDOW: usize = 4;

fn is_heavy(token: &str) -> bool {
    let len = token.chars().count();
    len > 3 && (starts_uppercase(token) || len > 6)
}

/// Extract distinct multi-word phrases in first-seen order.
pub fn extract_key_phrases(text: &str) -> Vec<String> {
    let mut phrases: Vec<String> = Vec::new();

    for sentence in split_sentences(text) {
        let tokens: Vec<String> = sentence.split_whitespace().map(clean_token).collect();

        for start in 0..tokens.len() {
            let window: Vec<&str> = tokens[start..]
                .iter()
                .take(MAX_WINDOW)
                .take_while(|t| is_heavy(t))
                .map(String::as_str)
                .collect();

            if window.len() < 2 {
                continue;
            }
            let phrase = window.join(" ");
            if phrase.chars().count() > 6 && !phrases.contains(&phrase) {
                phrases.push(phrase);
            }
        }
    }
    phrases
}
