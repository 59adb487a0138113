//! Minimal always-available recognizer.

use forumgraph_core::{EntityCandidate, EntityType, Result};

use super::EntityRecognizer;
use crate::text::starts_uppercase;
use crate::Dictionaries;

const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Keeps capitalized whitespace tokens longer than four characters.
pub struct MinimalRecognizer {
    dicts: &'static Dictionaries,
}

impl MinimalRecognizer {
    pub fn new(dicts: &'static Dictionaries) -> Self {
        Self { dicts }
    }

    /// Infallible extraction used as the last tier.
    pub fn recognize(&self, text: &str) -> Vec<EntityCandidate> {
        text.split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|t| t.chars().count() > 4)
            .filter(|t| starts_uppercase(t))
            .filter(|t| !self.dicts.is_stop_word(t))
            .map(|t| {
                EntityCandidate::new(
                    t,
                    EntityType::Term,
                    FALLBACK_CONFIDENCE,
                    "Capitalized term (basic extraction)",
                )
            })
            .collect()
    }
}

impl EntityRecognizer for MinimalRecognizer {
    fn name(&self) -> &'static str {
        "minimal"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn extract(&self, text: &str, _course: &str) -> Result<Vec<EntityCandidate>> {
        Ok(self.recognize(text))
    }
}
