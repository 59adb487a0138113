//! ForumGraph Engine — turns thread and reply text into a knowledge graph.
//!
//! Provides the two processing entry points (full thread, single reply) on
//! top of extraction, entity merge, co-occurrence linking, scoring and
//! template summaries.

pub mod graph;
pub mod merge;
pub mod orchestrator;
pub mod scorer;
pub mod summary;
pub mod types;

pub use graph::GraphArena;
pub use merge::{merge_candidates, MergeOutcome};
pub use orchestrator::KnowledgeEngine;
pub use scorer::knowledge_score;
pub use summary::SummarySynthesizer;
pub use types::*;
