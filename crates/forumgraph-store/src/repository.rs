//! Repository traits consumed by the knowledge engine.

use forumgraph_core::{Entity, EntityCandidate, EntityId, EntityType, Result, ThreadId};

/// Lookup-or-create persistence for entity records.
///
/// Methods take `&self`; implementations use interior mutability so one
/// store can be shared by the engine and the caller's transaction wrapper.
/// Every error returned here is a persistence failure and must abort the
/// enclosing processing call.
pub trait EntityRepository: Send + Sync {
    /// Case-insensitive lookup by name.
    fn find_by_name(&self, name: &str) -> Result<Option<Entity>>;

    fn get(&self, id: EntityId) -> Result<Option<Entity>>;

    /// Persist a brand-new entity first observed in `thread_id`.
    /// The stored record has `frequency_count == 0`.
    fn create(&self, candidate: &EntityCandidate, thread_id: ThreadId) -> Result<Entity>;

    /// Write back an existing entity (counters, thread links, relations).
    fn save(&self, entity: &Entity) -> Result<()>;

    /// Load several entities, skipping ids that no longer exist.
    fn get_many(&self, ids: &[EntityId]) -> Result<Vec<Entity>> {
        let mut out = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(entity) = self.get(id)? {
                out.push(entity);
            }
        }
        Ok(out)
    }
}

/// Read-side queries served straight off persisted entity rows.
pub trait EntityQueries {
    /// Names containing `needle`, case-insensitive, most frequent first.
    fn search_by_name(&self, needle: &str, limit: usize) -> Result<Vec<Entity>>;

    fn most_frequent(&self, limit: usize) -> Result<Vec<Entity>>;

    fn by_type(&self, entity_type: &EntityType, limit: usize) -> Result<Vec<Entity>>;

    /// Entities one hop away from `id`.
    fn related_to(&self, id: EntityId) -> Result<Vec<Entity>>;
}

/// Order used by every ranked query: frequency desc, confidence desc, name.
pub(crate) fn rank(entities: &mut [Entity]) {
    entities.sort_by(|a, b| {
        b.frequency_count
            .cmp(&a.frequency_count)
            .then_with(|| b.confidence_score.total_cmp(&a.confidence_score))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}
