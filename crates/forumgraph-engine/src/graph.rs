//! Co-occurrence graph over the entities of one processing pass.
//!
//! Records live in an arena keyed by entity id; relations are id sets on the
//! records. `link` is the only writer and always writes both directions.

use std::collections::BTreeMap;

use forumgraph_core::{Entity, EntityId, Result};
use forumgraph_store::EntityRepository;

#[derive(Debug, Default)]
pub struct GraphArena {
    entities: BTreeMap<EntityId, Entity>,
}

impl GraphArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record; an existing record with the same id is kept.
    pub fn insert(&mut self, entity: Entity) {
        self.entities.entry(entity.id).or_insert(entity);
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Records for `ids` that are present in the arena.
    pub fn select(&self, ids: &[EntityId]) -> Vec<Entity> {
        ids.iter().filter_map(|id| self.entities.get(id)).cloned().collect()
    }

    /// Symmetric edge between `a` and `b`. Returns whether it was new.
    ///
    /// Self-loops and ids outside the arena are ignored.
    pub fn link(&mut self, a: EntityId, b: EntityId) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) {
            return false;
        }
        let mut added = false;
        if let Some(ea) = self.entities.get_mut(&a) {
            added |= ea.related_entities.insert(b);
        }
        if let Some(eb) = self.entities.get_mut(&b) {
            added |= eb.related_entities.insert(a);
        }
        added
    }

    /// Complete graph over `ids`. Returns the number of new pairs.
    pub fn link_all(&mut self, ids: &[EntityId]) -> usize {
        let mut added = 0;
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                if self.link(a, b) {
                    added += 1;
                }
            }
        }
        added
    }

    /// Save every record in the arena.
    pub fn persist(&self, repo: &dyn EntityRepository) -> Result<()> {
        for entity in self.entities.values() {
            repo.save(entity)?;
        }
        Ok(())
    }
}
