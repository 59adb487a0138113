//! NLP component availability and extraction tier classification.

use serde::{Deserialize, Serialize};

/// Extraction quality tier that the available components allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionTier {
    /// Minimal capitalized-token recognizer only.
    Fallback,
    /// Dictionary + pattern recognizer with domain keyword scan.
    Pattern,
}

impl std::fmt::Display for ExtractionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fallback => write!(f, "fallback"),
            Self::Pattern => write!(f, "pattern"),
        }
    }
}

/// Which optional NLP components are switched on for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NlpCapabilities {
    /// Dictionary/pattern entity recognizer.
    pub primary_recognizer: bool,
    /// Sliding-window key-phrase extractor.
    pub key_phrases: bool,
    /// Keyword sentiment heuristic used for the "Discussion Tone" section.
    pub sentiment: bool,
}

impl NlpCapabilities {
    /// Every component enabled.
    pub fn all() -> Self {
        Self {
            primary_recognizer: true,
            key_phrases: true,
            sentiment: true,
        }
    }

    /// Only the always-available fallback recognizer.
    pub fn minimal() -> Self {
        Self {
            primary_recognizer: false,
            key_phrases: false,
            sentiment: false,
        }
    }

    /// Read component switches from the environment.
    ///
    /// `FORUMGRAPH_PRIMARY_NLP`, `FORUMGRAPH_KEY_PHRASES` and
    /// `FORUMGRAPH_SENTIMENT` accept `0`/`false`/`off` to disable; anything
    /// else (or unset) leaves the component on.
    pub fn discover() -> Self {
        Self {
            primary_recognizer: env_flag("FORUMGRAPH_PRIMARY_NLP", true),
            key_phrases: env_flag("FORUMGRAPH_KEY_PHRASES", true),
            sentiment: env_flag("FORUMGRAPH_SENTIMENT", true),
        }
    }

    pub fn tier(&self) -> ExtractionTier {
        if self.primary_recognizer {
            ExtractionTier::Pattern
        } else {
            ExtractionTier::Fallback
        }
    }
}

impl Default for NlpCapabilities {
    fn default() -> Self {
        Self::all()
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => parse_flag(&v).unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "0" | "false" | "off" | "no" => Some(false),
        "1" | "true" | "on" | "yes" => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag(" OFF "), Some(false));
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_tier() {
        assert_eq!(NlpCapabilities::all().tier(), ExtractionTier::Pattern);
        assert_eq!(NlpCapabilities::minimal().tier(), ExtractionTier::Fallback);
        assert_eq!(ExtractionTier::Fallback.to_string(), "fallback");
    }
}
