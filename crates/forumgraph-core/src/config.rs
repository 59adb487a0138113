//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::capabilities::NlpCapabilities;

/// Limits applied by the summary synthesizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryLimits {
    /// Concept entities listed under "Key Concepts".
    pub max_key_concepts: usize,
    /// Key phrases appended after the concepts.
    pub max_key_phrases: usize,
    /// Names listed under "Related Topics".
    pub max_related_topics: usize,
    /// Combined extractive text longer than this is shortened.
    pub extractive_max_chars: usize,
    /// Characters taken from each reply for the extractive text.
    pub reply_excerpt_chars: usize,
    /// Replies contributing to the extractive text.
    pub max_excerpt_replies: usize,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self {
            max_key_concepts: 3,
            max_key_phrases: 2,
            max_related_topics: 5,
            extractive_max_chars: 250,
            reply_excerpt_chars: 100,
            max_excerpt_replies: 3,
        }
    }
}

/// Top-level ForumGraph configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumGraphConfig {
    /// Root data directory.
    pub data_dir: PathBuf,
    /// Entity database file (`<data_dir>/forumgraph.db`).
    pub db_path: PathBuf,
    /// Enabled NLP components.
    pub capabilities: NlpCapabilities,
    /// Summary section limits.
    pub summary: SummaryLimits,
}

impl ForumGraphConfig {
    /// Configuration rooted at `data_dir` with every component on.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            db_path: data_dir.join("forumgraph.db"),
            data_dir,
            capabilities: NlpCapabilities::all(),
            summary: SummaryLimits::default(),
        }
    }

    /// Create configuration from environment and defaults. Creates the data
    /// directory if needed.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let mut config = Self::new(data_dir);
        if let Ok(path) = std::env::var("FORUMGRAPH_DB") {
            config.db_path = PathBuf::from(path);
        }
        config.capabilities = NlpCapabilities::discover();
        std::fs::create_dir_all(&config.data_dir)?;
        debug!(
            "Config: db={}, tier={}, sentiment={}",
            config.db_path.display(),
            config.capabilities.tier(),
            config.capabilities.sentiment
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = SummaryLimits::default();
        assert_eq!(limits.max_key_concepts, 3);
        assert_eq!(limits.max_key_phrases, 2);
        assert_eq!(limits.max_related_topics, 5);
        assert_eq!(limits.extractive_max_chars, 250);
    }

    #[test]
    fn test_db_path_under_data_dir() {
        let config = ForumGraphConfig::new("/tmp/fg");
        assert_eq!(config.db_path, PathBuf::from("/tmp/fg/forumgraph.db"));
    }
}
