//! In-memory entity arena.
//!
//! Records are indexed by stable id with a lower-cased name index on the side.
//! Relations are stored as id sets on each record; `save` mirrors every edge
//! onto the peer record so the arena stays symmetric even when a caller only
//! writes one side.

use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;
use tracing::debug;

use crate::repository::{rank, EntityQueries, EntityRepository};
use crate::types::StoreStats;
use forumgraph_core::{
    name_key, Entity, EntityCandidate, EntityId, EntityType, Error, Result, ThreadId,
};

#[derive(Default)]
struct Arena {
    entities: BTreeMap<EntityId, Entity>,
    by_name: HashMap<String, EntityId>,
    next_id: EntityId,
}

/// Thread-safe arena store.
#[derive(Default)]
pub struct MemoryEntityStore {
    arena: Mutex<Arena>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.arena.lock().entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every stored entity in id order.
    pub fn all(&self) -> Vec<Entity> {
        self.arena.lock().entities.values().cloned().collect()
    }

    pub fn stats(&self) -> StoreStats {
        let arena = self.arena.lock();
        let directed: usize = arena.entities.values().map(|e| e.related_entities.len()).sum();
        let links: usize = arena.entities.values().map(|e| e.related_threads.len()).sum();
        StoreStats {
            total_entities: arena.entities.len() as i64,
            total_relations: (directed / 2) as i64,
            thread_links: links as i64,
        }
    }
}

impl EntityRepository for MemoryEntityStore {
    fn find_by_name(&self, name: &str) -> Result<Option<Entity>> {
        let arena = self.arena.lock();
        Ok(arena
            .by_name
            .get(&name_key(name))
            .and_then(|id| arena.entities.get(id))
            .cloned())
    }

    fn get(&self, id: EntityId) -> Result<Option<Entity>> {
        Ok(self.arena.lock().entities.get(&id).cloned())
    }

    fn create(&self, candidate: &EntityCandidate, thread_id: ThreadId) -> Result<Entity> {
        let key = candidate.key();
        if key.is_empty() {
            return Err(Error::Storage("entity name must not be blank".into()));
        }

        let mut arena = self.arena.lock();
        if arena.by_name.contains_key(&key) {
            return Err(Error::Storage(format!("entity '{}' already exists", candidate.name)));
        }
        arena.next_id += 1;
        let entity = Entity::from_candidate(arena.next_id, candidate, thread_id);
        arena.by_name.insert(key, entity.id);
        arena.entities.insert(entity.id, entity.clone());
        debug!("Created entity {} '{}'", entity.id, entity.name);
        Ok(entity)
    }

    fn save(&self, entity: &Entity) -> Result<()> {
        let mut arena = self.arena.lock();
        let Some(previous) = arena.entities.get(&entity.id) else {
            return Err(Error::NotFound(format!("entity {}", entity.id)));
        };

        let old_key = previous.key();
        let new_key = entity.key();
        if old_key != new_key {
            if arena.by_name.contains_key(&new_key) {
                return Err(Error::Storage(format!("entity '{}' already exists", entity.name)));
            }
            arena.by_name.remove(&old_key);
            arena.by_name.insert(new_key, entity.id);
        }

        let mut stored = entity.clone();
        stored.related_entities.remove(&entity.id);
        for peer_id in &stored.related_entities {
            if let Some(peer) = arena.entities.get_mut(peer_id) {
                peer.related_entities.insert(entity.id);
            }
        }
        arena.entities.insert(entity.id, stored);
        Ok(())
    }
}

impl EntityQueries for MemoryEntityStore {
    fn search_by_name(&self, needle: &str, limit: usize) -> Result<Vec<Entity>> {
        let needle = needle.to_lowercase();
        let mut hits: Vec<Entity> = self
            .arena
            .lock()
            .entities
            .values()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        rank(&mut hits);
        hits.truncate(limit);
        Ok(hits)
    }

    fn most_frequent(&self, limit: usize) -> Result<Vec<Entity>> {
        let mut all = self.all();
        rank(&mut all);
        all.truncate(limit);
        Ok(all)
    }

    fn by_type(&self, entity_type: &EntityType, limit: usize) -> Result<Vec<Entity>> {
        let mut hits: Vec<Entity> = self
            .arena
            .lock()
            .entities
            .values()
            .filter(|e| &e.entity_type == entity_type)
            .cloned()
            .collect();
        rank(&mut hits);
        hits.truncate(limit);
        Ok(hits)
    }

    fn related_to(&self, id: EntityId) -> Result<Vec<Entity>> {
        let arena = self.arena.lock();
        let Some(entity) = arena.entities.get(&id) else {
            return Ok(Vec::new());
        };
        let mut related: Vec<Entity> = entity
            .related_entities
            .iter()
            .filter_map(|rid| arena.entities.get(rid))
            .cloned()
            .collect();
        rank(&mut related);
        Ok(related)
    }
}
