//! Template summary assembled from a thread's entities and text.
//!
//! Sections, in order, separated by blank lines:
//! `Key Concepts`, `Discussion Summary`, `Discussion Tone`,
//! `Discussion Activity`, `Related Topics`. A thread without entities gets
//! only the extractive text, with no headers at all.

use std::collections::BTreeSet;

use tracing::warn;

use forumgraph_core::{Entity, EntityId, EntityType, Result, SummaryLimits, Thread};
use forumgraph_extract::SentimentAnalyzer;
use forumgraph_store::EntityRepository;

const NO_RELATED_TOPICS: &str = "No strongly related topics found yet.";

pub struct SummarySynthesizer {
    limits: SummaryLimits,
    sentiment: Option<Box<dyn SentimentAnalyzer>>,
}

impl SummarySynthesizer {
    pub fn new(limits: SummaryLimits, sentiment: Option<Box<dyn SentimentAnalyzer>>) -> Self {
        Self { limits, sentiment }
    }

    /// Build the summary for `thread` given its current `entities`.
    ///
    /// Only the related-topic lookup touches the repository; its errors
    /// propagate. Sentiment failures drop the tone section.
    pub fn generate(
        &self,
        repo: &dyn EntityRepository,
        thread: &Thread,
        entities: &[Entity],
    ) -> Result<String> {
        if entities.is_empty() {
            return Ok(self.extractive_summary(thread));
        }

        let mut sections: Vec<String> = Vec::new();

        if let Some(concepts) = self.key_concepts(entities) {
            sections.push(format!("Key Concepts: {}", concepts));
        }

        sections.push(format!("Discussion Summary: {}", self.extractive_summary(thread)));

        if let Some(tone) = self.tone(thread) {
            sections.push(format!("Discussion Tone: {}", tone));
        }

        let active = thread.active_replies().count();
        if active > 0 {
            let noun = if active == 1 { "reply" } else { "replies" };
            sections.push(format!("Discussion Activity: {} active {}", active, noun));
        }

        let related = self.related_topics(repo, thread, entities)?;
        let related = if related.is_empty() {
            NO_RELATED_TOPICS.to_string()
        } else {
            related.join(", ")
        };
        sections.push(format!("Related Topics: {}", related));

        Ok(sections.join("\n\n"))
    }

    /// Top concepts by confidence, then top key phrases.
    fn key_concepts(&self, entities: &[Entity]) -> Option<String> {
        let mut concepts: Vec<&Entity> = entities.iter().filter(|e| e.entity_type.is_concept()).collect();
        let mut phrases: Vec<&Entity> = entities
            .iter()
            .filter(|e| e.entity_type == EntityType::KeyPhrase)
            .collect();
        by_confidence(&mut concepts);
        by_confidence(&mut phrases);

        let names: Vec<&str> = concepts
            .iter()
            .take(self.limits.max_key_concepts)
            .chain(phrases.iter().take(self.limits.max_key_phrases))
            .map(|e| e.name.as_str())
            .collect();

        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }

    /// Content plus the opening of the first few active replies, shortened
    /// to two sentences or a hard character cut when too long.
    pub fn extractive_summary(&self, thread: &Thread) -> String {
        let mut combined = thread.content.trim().to_string();
        for reply in thread.active_replies().take(self.limits.max_excerpt_replies) {
            let excerpt: String = reply.content.chars().take(self.limits.reply_excerpt_chars).collect();
            let excerpt = excerpt.trim();
            if excerpt.is_empty() {
                continue;
            }
            if !combined.is_empty() {
                combined.push(' ');
            }
            combined.push_str(excerpt);
        }

        let max = self.limits.extractive_max_chars;
        if combined.chars().count() <= max {
            return combined;
        }

        let sentences: Vec<&str> = combined.split(". ").collect();
        if sentences.len() >= 2 {
            let mut two = format!("{}. {}", sentences[0], sentences[1]);
            if !two.ends_with('.') {
                two.push('.');
            }
            return two;
        }

        let truncated: String = combined.chars().take(max).collect();
        format!("{}...", truncated)
    }

    fn tone(&self, thread: &Thread) -> Option<String> {
        let analyzer = self.sentiment.as_ref().filter(|s| s.is_available())?;
        match analyzer.analyze(&thread.full_text()) {
            Ok(tone) => Some(tone.to_string()),
            Err(e) => {
                warn!("Sentiment unavailable for thread {}: {}", thread.id, e);
                None
            }
        }
    }

    /// One-hop neighbours that are not already on the thread.
    fn related_topics(
        &self,
        repo: &dyn EntityRepository,
        thread: &Thread,
        entities: &[Entity],
    ) -> Result<Vec<String>> {
        let own: BTreeSet<EntityId> = thread
            .knowledge_entities
            .iter()
            .copied()
            .chain(entities.iter().map(|e| e.id))
            .collect();

        let neighbours: Vec<EntityId> = entities
            .iter()
            .flat_map(|e| e.related_entities.iter().copied())
            .collect::<BTreeSet<_>>()
            .difference(&own)
            .copied()
            .collect();

        let mut related = repo.get_many(&neighbours)?;
        related.sort_by(|a, b| {
            b.frequency_count
                .cmp(&a.frequency_count)
                .then_with(|| b.confidence_score.total_cmp(&a.confidence_score))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(related
            .into_iter()
            .take(self.limits.max_related_topics)
            .map(|e| e.name)
            .collect())
    }
}

fn by_confidence(entities: &mut [&Entity]) {
    entities.sort_by(|a, b| {
        b.confidence_score
            .total_cmp(&a.confidence_score)
            .then_with(|| b.frequency_count.cmp(&a.frequency_count))
            .then_with(|| a.name.cmp(&b.name))
    });
}
