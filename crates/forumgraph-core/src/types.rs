//! Data types for threads, extracted candidates and persisted entities.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type EntityId = i64;
pub type ThreadId = i64;

/// Entity type tag.
///
/// The known tags cover everything the extractors emit, but rows written by
/// other producers may carry any string, so unknown tags round-trip through
/// `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    Person,
    Organization,
    CsConcept,
    MathConcept,
    Concept,
    Term,
    KeyPhrase,
    Other(String),
}

impl EntityType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Person => "PERSON",
            Self::Organization => "ORGANIZATION",
            Self::CsConcept => "CS_CONCEPT",
            Self::MathConcept => "MATH_CONCEPT",
            Self::Concept => "CONCEPT",
            Self::Term => "TERM",
            Self::KeyPhrase => "KEY_PHRASE",
            Self::Other(tag) => tag,
        }
    }

    /// Any concept-flavoured tag (`CONCEPT`, `CS_CONCEPT`, `MATH_CONCEPT`, ...).
    pub fn is_concept(&self) -> bool {
        self.as_str().contains("CONCEPT")
    }
}

impl From<&str> for EntityType {
    fn from(tag: &str) -> Self {
        match tag {
            "PERSON" => Self::Person,
            "ORGANIZATION" => Self::Organization,
            "CS_CONCEPT" => Self::CsConcept,
            "MATH_CONCEPT" => Self::MathConcept,
            "CONCEPT" => Self::Concept,
            "TERM" => Self::Term,
            "KEY_PHRASE" => Self::KeyPhrase,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for EntityType {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<EntityType> for String {
    fn from(t: EntityType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive identity key for an entity name.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// An entity proposed by one extraction pass, before merge/persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCandidate {
    pub name: String,
    pub entity_type: EntityType,
    pub confidence: f64,
    pub description: String,
}

impl EntityCandidate {
    pub fn new(
        name: impl Into<String>,
        entity_type: EntityType,
        confidence: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            entity_type,
            confidence: clamp_unit(confidence),
            description: description.into(),
        }
    }

    pub fn key(&self) -> String {
        name_key(&self.name)
    }
}

/// A persisted knowledge entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub entity_type: EntityType,
    pub description: String,
    pub confidence_score: f64,
    pub frequency_count: u64,
    #[serde(default)]
    pub related_entities: BTreeSet<EntityId>,
    #[serde(default)]
    pub related_threads: BTreeSet<ThreadId>,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl Entity {
    /// Build a brand-new record from a candidate. Frequency starts at 0.
    pub fn from_candidate(id: EntityId, candidate: &EntityCandidate, thread_id: ThreadId) -> Self {
        Self {
            id,
            name: candidate.name.clone(),
            entity_type: candidate.entity_type.clone(),
            description: candidate.description.clone(),
            confidence_score: clamp_unit(candidate.confidence),
            frequency_count: 0,
            related_entities: BTreeSet::new(),
            related_threads: BTreeSet::from([thread_id]),
            created_at: chrono::Utc::now().timestamp_millis(),
            updated_at: None,
        }
    }

    pub fn key(&self) -> String {
        name_key(&self.name)
    }

    /// Count one later observation of this entity in `thread_id`.
    pub fn record_occurrence(&mut self, thread_id: ThreadId) {
        self.frequency_count = self.frequency_count.saturating_add(1);
        self.related_threads.insert(thread_id);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(chrono::Utc::now().timestamp_millis());
    }
}

/// One reply on a discussion thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Reply {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_deleted: false,
        }
    }
}

/// Discussion thread aggregate.
///
/// `knowledge_entities`, `knowledge_score` and `ai_generated_summary` are
/// written by the knowledge engine; the rest is owned by the discussion
/// subsystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: ThreadId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub replies: Vec<Reply>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub knowledge_entities: BTreeSet<EntityId>,
    #[serde(default)]
    pub knowledge_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_generated_summary: Option<String>,
}

impl Thread {
    pub fn new(
        id: ThreadId,
        title: impl Into<String>,
        content: impl Into<String>,
        course: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            course: course.into(),
            ..Default::default()
        }
    }

    /// Replies that have not been deleted.
    pub fn active_replies(&self) -> impl Iterator<Item = &Reply> {
        self.replies.iter().filter(|r| !r.is_deleted)
    }

    /// Title, content and every active reply, space-joined.
    pub fn full_text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.title.as_str(), self.content.as_str()];
        parts.extend(self.active_replies().map(|r| r.content.as_str()));
        parts
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
