//! Knowledge engine: full-thread and single-reply processing.
//!
//! Both entry points are read-merge-write over the injected repository and
//! hold no state between calls. Callers wrap each call in one transaction
//! and serialize calls per thread id.

use std::collections::BTreeSet;
use std::time::Instant;

use tracing::{debug, info};

use forumgraph_core::{
    EntityCandidate, EntityId, EntityType, ExtractionTier, ForumGraphConfig, NlpCapabilities,
    Result, SummaryLimits, Thread,
};
use forumgraph_extract::{
    dedupe_candidates, extract_key_phrases, KeywordSentiment, RecognizerChain, SentimentAnalyzer,
};
use forumgraph_store::EntityRepository;

use crate::graph::GraphArena;
use crate::merge::merge_candidates;
use crate::scorer::knowledge_score;
use crate::summary::SummarySynthesizer;
use crate::types::{CandidateSet, ProcessMode, ProcessReport};

const THREAD_PHRASE_CONFIDENCE: f64 = 0.7;
const REPLY_PHRASE_CONFIDENCE: f64 = 0.6;
const THREAD_PHRASE_DESCRIPTION: &str = "Key phrase from discussion";
const REPLY_PHRASE_DESCRIPTION: &str = "Key phrase from reply";

/// Top-level engine that owns the extractors and summary settings.
pub struct KnowledgeEngine {
    recognizer: RecognizerChain,
    key_phrases: bool,
    summary: SummarySynthesizer,
}

impl KnowledgeEngine {
    /// Build from configuration.
    pub fn new(config: &ForumGraphConfig) -> Self {
        Self::with_capabilities(config.capabilities, config.summary.clone())
    }

    /// Build with explicit component switches.
    pub fn with_capabilities(caps: NlpCapabilities, limits: SummaryLimits) -> Self {
        let sentiment: Option<Box<dyn SentimentAnalyzer>> = if caps.sentiment {
            Some(Box::new(KeywordSentiment::new()))
        } else {
            None
        };

        let engine = Self::with_parts(
            RecognizerChain::standard(caps.primary_recognizer),
            caps.key_phrases,
            SummarySynthesizer::new(limits, sentiment),
        );
        info!(
            "Knowledge engine initialized: tier={}, key_phrases={}, sentiment={}",
            engine.tier(),
            caps.key_phrases,
            caps.sentiment
        );
        engine
    }

    /// Assemble from pre-built components.
    pub fn with_parts(recognizer: RecognizerChain, key_phrases: bool, summary: SummarySynthesizer) -> Self {
        Self {
            recognizer,
            key_phrases,
            summary,
        }
    }

    pub fn tier(&self) -> ExtractionTier {
        self.recognizer.tier()
    }

    /// Re-extract the whole thread and replace its entity set.
    pub fn process_full_thread(
        &self,
        repo: &dyn EntityRepository,
        thread: &mut Thread,
    ) -> Result<ProcessReport> {
        let start = Instant::now();
        let mut report = ProcessReport::new(thread.id, ProcessMode::FullThread);

        let extraction = self.extract_thread_candidates(&thread.full_text(), &thread.course);
        report.candidates = extraction.candidates.len();
        report.fallback_used = extraction.fallback_used;

        let merged = merge_candidates(repo, &extraction.candidates, thread.id)?;
        report.created = merged.created;
        report.updated = merged.updated;

        let mut arena = GraphArena::new();
        for entity in merged.entities {
            arena.insert(entity);
        }
        let ids = arena.ids();
        report.edges_added = arena.link_all(&ids);
        arena.persist(repo)?;

        self.commit(repo, thread, &arena, ids.into_iter().collect())?;

        report.knowledge_score = thread.knowledge_score;
        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Processed thread {}: candidates={}, created={}, updated={}, edges={}, score={:.3}, fallback={}",
            thread.id,
            report.candidates,
            report.created,
            report.updated,
            report.edges_added,
            report.knowledge_score,
            report.fallback_used
        );
        Ok(report)
    }

    /// Fold one new reply into the thread's existing graph.
    ///
    /// Blank or missing content, or content that yields no candidates,
    /// leaves the thread untouched.
    pub fn process_reply(
        &self,
        repo: &dyn EntityRepository,
        thread: &mut Thread,
        reply_content: Option<&str>,
    ) -> Result<ProcessReport> {
        let start = Instant::now();
        let Some(text) = reply_content.filter(|t| !t.trim().is_empty()) else {
            debug!("Empty reply for thread {}, nothing to process", thread.id);
            return Ok(ProcessReport::new(thread.id, ProcessMode::Skipped));
        };

        let extraction = self.extract(text, &thread.course, REPLY_PHRASE_CONFIDENCE, REPLY_PHRASE_DESCRIPTION);
        if extraction.candidates.is_empty() {
            debug!("Reply on thread {} produced no entities", thread.id);
            let mut report = ProcessReport::new(thread.id, ProcessMode::Skipped);
            report.fallback_used = extraction.fallback_used;
            return Ok(report);
        }

        let mut report = ProcessReport::new(thread.id, ProcessMode::Reply);
        report.candidates = extraction.candidates.len();
        report.fallback_used = extraction.fallback_used;

        let merged = merge_candidates(repo, &extraction.candidates, thread.id)?;
        report.created = merged.created;
        report.updated = merged.updated;

        let mut arena = GraphArena::new();
        let new_ids: Vec<EntityId> = merged.entities.iter().map(|e| e.id).collect();
        for entity in merged.entities {
            arena.insert(entity);
        }

        let previous: Vec<EntityId> = thread
            .knowledge_entities
            .iter()
            .copied()
            .filter(|id| !arena.contains(*id))
            .collect();
        for entity in repo.get_many(&previous)? {
            arena.insert(entity);
        }

        let mut all: BTreeSet<EntityId> = thread.knowledge_entities.clone();
        all.extend(new_ids.iter().copied());
        let all_ids: Vec<EntityId> = all.iter().copied().collect();

        report.edges_added = arena.link_all(&new_ids);
        report.edges_added += arena.link_all(&all_ids);
        arena.persist(repo)?;

        self.commit(repo, thread, &arena, all)?;

        report.knowledge_score = thread.knowledge_score;
        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Processed reply on thread {}: candidates={}, created={}, updated={}, edges={}, score={:.3}",
            thread.id,
            report.candidates,
            report.created,
            report.updated,
            report.edges_added,
            report.knowledge_score
        );
        Ok(report)
    }

    /// Regenerate the summary from the thread's stored entities.
    pub fn generate_knowledge_summary(
        &self,
        repo: &dyn EntityRepository,
        thread: &Thread,
    ) -> Result<String> {
        let ids: Vec<EntityId> = thread.knowledge_entities.iter().copied().collect();
        let entities = repo.get_many(&ids)?;
        self.summary.generate(repo, thread, &entities)
    }

    /// Candidates a full-thread pass would merge for `text`, without
    /// touching any store.
    pub fn extract_thread_candidates(&self, text: &str, course: &str) -> CandidateSet {
        self.extract(text, course, THREAD_PHRASE_CONFIDENCE, THREAD_PHRASE_DESCRIPTION)
    }

    /// Write entity set, score and summary onto `thread` together.
    ///
    /// Everything fallible runs against a staged copy first, so an error
    /// leaves the caller's thread exactly as it was.
    fn commit(
        &self,
        repo: &dyn EntityRepository,
        thread: &mut Thread,
        arena: &GraphArena,
        ids: BTreeSet<EntityId>,
    ) -> Result<()> {
        let ordered: Vec<EntityId> = ids.iter().copied().collect();
        let entities = arena.select(&ordered);

        let mut staged = thread.clone();
        staged.knowledge_entities = ids;
        staged.knowledge_score = knowledge_score(&entities, thread.view_count, thread.reply_count);
        let summary = self.summary.generate(repo, &staged, &entities)?;

        thread.knowledge_entities = staged.knowledge_entities;
        thread.knowledge_score = staged.knowledge_score;
        thread.ai_generated_summary = Some(summary);
        Ok(())
    }

    /// Recognizer candidates plus key phrases, de-duplicated by name.
    fn extract(&self, text: &str, course: &str, phrase_confidence: f64, phrase_description: &str) -> CandidateSet {
        let recognition = self.recognizer.recognize(text, course);
        let mut candidates = recognition.candidates;

        if self.key_phrases {
            candidates.extend(extract_key_phrases(text).into_iter().map(|phrase| {
                EntityCandidate::new(phrase, EntityType::KeyPhrase, phrase_confidence, phrase_description)
            }));
        }

        CandidateSet {
            candidates: dedupe_candidates(candidates),
            fallback_used: recognition.fallback_used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forumgraph_store::MemoryEntityStore;

    fn engine() -> KnowledgeEngine {
        KnowledgeEngine::with_capabilities(NlpCapabilities::all(), SummaryLimits::default())
    }

    #[test]
    fn test_full_thread_replaces_entity_set() {
        let store = MemoryEntityStore::new();
        let engine = engine();
        let mut thread = Thread::new(1, "Recursion", "How does recursion work?", "Computer Science");

        engine.process_full_thread(&store, &mut thread).unwrap();
        let first = thread.knowledge_entities.clone();
        assert!(!first.is_empty());

        thread.title = "Sorting".into();
        thread.content = "Explain quicksort please.".into();
        engine.process_full_thread(&store, &mut thread).unwrap();
        let recursion = store.find_by_name("recursion").unwrap().unwrap();
        assert!(!thread.knowledge_entities.contains(&recursion.id));
    }

    #[test]
    fn test_reply_without_candidates_is_skipped() {
        let store = MemoryEntityStore::new();
        let engine = engine();
        let mut thread = Thread::new(1, "Heaps", "binary heap question", "Computer Science");
        engine.process_full_thread(&store, &mut thread).unwrap();
        let before = thread.clone();

        let report = engine.process_reply(&store, &mut thread, Some("ok so yes")).unwrap();
        assert_eq!(report.mode, ProcessMode::Skipped);
        assert_eq!(thread, before);
    }

    #[test]
    fn test_fallback_tier_still_processes() {
        let store = MemoryEntityStore::new();
        let engine = KnowledgeEngine::with_capabilities(NlpCapabilities::minimal(), SummaryLimits::default());
        assert_eq!(engine.tier(), ExtractionTier::Fallback);

        let mut thread = Thread::new(1, "Dijkstra Algorithm", "Shortest paths", "Computer Science");
        let report = engine.process_full_thread(&store, &mut thread).unwrap();
        assert!(report.fallback_used);
        assert!(store.find_by_name("dijkstra").unwrap().is_some());
        assert!(store.find_by_name("recursion").unwrap().is_none());
        assert!(thread.ai_generated_summary.is_some());
    }

    #[test]
    fn test_key_phrases_persisted_per_path() {
        let store = MemoryEntityStore::new();
        let engine = engine();
        let mut thread = Thread::new(1, "Dynamic Programming Memoization", "", "History");

        engine.process_full_thread(&store, &mut thread).unwrap();
        let phrase = store.find_by_name("dynamic programming memoization").unwrap().unwrap();
        assert_eq!(phrase.entity_type, EntityType::KeyPhrase);
        assert_eq!(phrase.confidence_score, 0.7);
        assert_eq!(phrase.description, "Key phrase from discussion");
        assert!(thread.knowledge_entities.contains(&phrase.id));

        engine
            .process_reply(&store, &mut thread, Some("Greedy Choice Property"))
            .unwrap();
        let phrase = store.find_by_name("Greedy Choice Property").unwrap().unwrap();
        assert_eq!(phrase.entity_type, EntityType::KeyPhrase);
        assert_eq!(phrase.confidence_score, 0.6);
        assert_eq!(phrase.description, "Key phrase from reply");
        assert!(thread.knowledge_entities.contains(&phrase.id));
    }

    #[test]
    fn test_key_phrases_switched_off() {
        let store = MemoryEntityStore::new();
        let caps = NlpCapabilities {
            key_phrases: false,
            ..NlpCapabilities::all()
        };
        let engine = KnowledgeEngine::with_capabilities(caps, SummaryLimits::default());
        let mut thread = Thread::new(1, "Dynamic Programming Memoization", "", "History");

        engine.process_full_thread(&store, &mut thread).unwrap();
        assert!(store.find_by_name("Dynamic Programming Memoization").unwrap().is_none());
        assert!(store.find_by_name("programming").unwrap().is_some());
    }

    #[test]
    fn test_extract_thread_candidates_matches_full_pass() {
        let set = engine().extract_thread_candidates("Dynamic Programming Memoization", "History");
        assert!(!set.fallback_used);
        let phrase = set
            .candidates
            .iter()
            .find(|c| c.name == "Dynamic Programming Memoization")
            .unwrap();
        assert_eq!(phrase.entity_type, EntityType::KeyPhrase);
        assert_eq!(phrase.confidence, 0.7);
        assert!(set.candidates.iter().any(|c| c.name == "programming"));
    }
}
