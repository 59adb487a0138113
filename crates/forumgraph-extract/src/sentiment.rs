//! Keyword-count sentiment heuristic for the "Discussion Tone" summary line.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use forumgraph_core::{Error, Result};

/// Overall tone of a discussion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "Positive"),
            Self::Negative => write!(f, "Negative"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Trait for sentiment backends.
pub trait SentimentAnalyzer: Send + Sync {
    /// Check if the analyzer can run.
    fn is_available(&self) -> bool;

    fn analyze(&self, text: &str) -> Result<Tone>;
}

const POSITIVE: &[&str] = &[
    "good", "great", "excellent", "helpful", "clear", "thanks", "thank", "awesome", "love",
    "useful", "amazing", "perfect", "understand", "solved", "works", "nice", "brilliant",
];

const NEGATIVE: &[&str] = &[
    "bad", "confusing", "confused", "wrong", "error", "difficult", "hard", "stuck", "hate",
    "broken", "fail", "failed", "problem", "unclear", "terrible", "frustrating", "lost",
];

/// Compares positive and negative keyword hits.
pub struct KeywordSentiment {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
}

impl KeywordSentiment {
    pub fn new() -> Self {
        Self {
            positive: POSITIVE.iter().copied().collect(),
            negative: NEGATIVE.iter().copied().collect(),
        }
    }
}

impl Default for KeywordSentiment {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer for KeywordSentiment {
    fn is_available(&self) -> bool {
        true
    }

    fn analyze(&self, text: &str) -> Result<Tone> {
        if text.trim().is_empty() {
            return Err(Error::Sentiment("no text to analyze".into()));
        }

        let lower = text.to_lowercase();
        let (mut pos, mut neg) = (0usize, 0usize);
        for word in lower.split(|c: char| !c.is_alphanumeric()) {
            if self.positive.contains(word) {
                pos += 1;
            } else if self.negative.contains(word) {
                neg += 1;
            }
        }

        Ok(match pos.cmp(&neg) {
            std::cmp::Ordering::Greater => Tone::Positive,
            std::cmp::Ordering::Less => Tone::Negative,
            std::cmp::Ordering::Equal => Tone::Neutral,
        })
    }
}
