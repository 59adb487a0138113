//! Entity recognizer strategy and tier selection.
//!
//! The `EntityRecognizer` trait abstracts over candidate extraction.
//! Implementations:
//! - `PatternRecognizer`: dictionary + shape rules + domain keyword scan
//! - `MinimalRecognizer`: capitalized long tokens only, never fails
//!
//! `RecognizerChain` picks the primary when it reports itself available and
//! drops to the minimal tier when it is missing, unavailable, or errors.

mod fallback;
mod pattern;

pub use fallback::MinimalRecognizer;
pub use pattern::PatternRecognizer;

use std::collections::HashMap;

use forumgraph_core::{EntityCandidate, ExtractionTier, Result};
use tracing::{debug, warn};

/// Trait for entity recognizers.
pub trait EntityRecognizer: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Check if the recognizer can run right now.
    fn is_available(&self) -> bool;

    /// Extract candidates from `text` in the context of `course`.
    fn extract(&self, text: &str, course: &str) -> Result<Vec<EntityCandidate>>;
}

/// Outcome of one recognition call.
#[derive(Debug, Clone, Default)]
pub struct Recognition {
    /// De-duplicated candidates.
    pub candidates: Vec<EntityCandidate>,
    /// Whether the minimal tier produced them.
    pub fallback_used: bool,
}

/// Primary recognizer with the minimal tier behind it.
pub struct RecognizerChain {
    primary: Option<Box<dyn EntityRecognizer>>,
    fallback: MinimalRecognizer,
}

impl RecognizerChain {
    pub fn new(primary: Option<Box<dyn EntityRecognizer>>, fallback: MinimalRecognizer) -> Self {
        Self { primary, fallback }
    }

    /// Pattern recognizer over the standard dictionaries when `enabled`,
    /// otherwise fallback only. A pattern set that fails to compile also
    /// leaves the chain on the fallback tier.
    pub fn standard(enabled: bool) -> Self {
        let dicts = crate::Dictionaries::standard();
        let primary: Option<Box<dyn EntityRecognizer>> = if enabled {
            match PatternRecognizer::new(dicts) {
                Ok(p) => Some(Box::new(p)),
                Err(e) => {
                    warn!("Pattern recognizer unavailable: {}. Using fallback tier.", e);
                    None
                }
            }
        } else {
            None
        };
        Self::new(primary, MinimalRecognizer::new(dicts))
    }

    /// Tier that the next call will use, absent a runtime failure.
    pub fn tier(&self) -> ExtractionTier {
        match &self.primary {
            Some(p) if p.is_available() => ExtractionTier::Pattern,
            _ => ExtractionTier::Fallback,
        }
    }

    /// Extract candidates. Never fails; blank input yields nothing.
    pub fn recognize(&self, text: &str, course: &str) -> Recognition {
        if text.trim().is_empty() {
            return Recognition::default();
        }

        match &self.primary {
            Some(primary) if primary.is_available() => match primary.extract(text, course) {
                Ok(candidates) => {
                    return Recognition {
                        candidates: dedupe_candidates(candidates),
                        fallback_used: false,
                    };
                }
                Err(e) => {
                    warn!("Recognizer '{}' failed: {}. Using fallback tier.", primary.name(), e);
                }
            },
            Some(primary) => {
                debug!("Recognizer '{}' not available, using fallback tier", primary.name());
            }
            None => {}
        }

        Recognition {
            candidates: dedupe_candidates(self.fallback.recognize(text)),
            fallback_used: true,
        }
    }
}

/// Collapse candidates sharing a case-insensitive name.
///
/// Keeps first-seen order; a later duplicate replaces the kept one only when
/// its confidence is strictly higher.
pub fn dedupe_candidates(candidates: Vec<EntityCandidate>) -> Vec<EntityCandidate> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<EntityCandidate> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let key = candidate.key();
        if key.is_empty() {
            continue;
        }
        match index.get(&key) {
            Some(&i) => {
                if candidate.confidence > out[i].confidence {
                    out[i] = candidate;
                }
            }
            None => {
                index.insert(key, out.len());
                out.push(candidate);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use forumgraph_core::{EntityType, Error};

    struct BrokenRecognizer;

    impl EntityRecognizer for BrokenRecognizer {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn is_available(&self) -> bool {
            true
        }
        fn extract(&self, _text: &str, _course: &str) -> Result<Vec<EntityCandidate>> {
            Err(Error::Extraction("model crashed".into()))
        }
    }

    struct OfflineRecognizer;

    impl EntityRecognizer for OfflineRecognizer {
        fn name(&self) -> &'static str {
            "offline"
        }
        fn is_available(&self) -> bool {
            false
        }
        fn extract(&self, _text: &str, _course: &str) -> Result<Vec<EntityCandidate>> {
            panic!("must not be called when unavailable");
        }
    }

    fn chain_with(primary: Box<dyn EntityRecognizer>) -> RecognizerChain {
        RecognizerChain::new(
            Some(primary),
            MinimalRecognizer::new(crate::Dictionaries::standard()),
        )
    }

    #[test]
    fn test_failing_primary_falls_back() {
        let chain = chain_with(Box::new(BrokenRecognizer));
        let result = chain.recognize("Dijkstra explained Shortest paths", "");
        assert!(result.fallback_used);
        assert!(result.candidates.iter().all(|c| c.entity_type == EntityType::Term));
        assert!(result.candidates.iter().any(|c| c.name == "Dijkstra"));
    }

    #[test]
    fn test_unavailable_primary_is_not_called() {
        let chain = chain_with(Box::new(OfflineRecognizer));
        assert_eq!(chain.tier(), ExtractionTier::Fallback);
        let result = chain.recognize("Kruskal Prim", "");
        assert!(result.fallback_used);
    }

    #[test]
    fn test_blank_input_is_empty() {
        let chain = RecognizerChain::standard(true);
        let result = chain.recognize("   \n", "Computer Science");
        assert!(result.candidates.is_empty());
        assert!(!result.fallback_used);
    }

    #[test]
    fn test_standard_disabled_uses_fallback() {
        let chain = RecognizerChain::standard(false);
        assert_eq!(chain.tier(), ExtractionTier::Fallback);
    }

    #[test]
    fn test_dedupe_case_insensitive() {
        let out = dedupe_candidates(vec![
            EntityCandidate::new("Algorithm", EntityType::CsConcept, 0.8, ""),
            EntityCandidate::new("algorithm", EntityType::Concept, 0.8, ""),
            EntityCandidate::new("Graph", EntityType::Person, 0.7, ""),
            EntityCandidate::new("graph", EntityType::CsConcept, 0.8, ""),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].entity_type, EntityType::CsConcept);
        assert_eq!(out[0].name, "Algorithm");
        assert_eq!(out[1].entity_type, EntityType::CsConcept);
    }
}
