//! Lookup-or-create merge with frequency tracking.

use tracing::debug;

use forumgraph_core::{Entity, EntityCandidate, Result, ThreadId};
use forumgraph_store::EntityRepository;

/// Entities persisted by one merge, in candidate order.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub entities: Vec<Entity>,
    pub created: usize,
    pub updated: usize,
}

/// Persist each candidate against the repository.
///
/// A known name (case-insensitive) gets `frequency_count + 1` and the thread
/// link; an unknown name is created with frequency 0. Candidates must already
/// be de-duplicated, otherwise a name would be counted twice in one pass.
/// Repository errors abort the merge.
pub fn merge_candidates(
    repo: &dyn EntityRepository,
    candidates: &[EntityCandidate],
    thread_id: ThreadId,
) -> Result<MergeOutcome> {
    let mut outcome = MergeOutcome::default();

    for candidate in candidates {
        match repo.find_by_name(&candidate.name)? {
            Some(mut existing) => {
                existing.record_occurrence(thread_id);
                repo.save(&existing)?;
                outcome.updated += 1;
                outcome.entities.push(existing);
            }
            None => {
                let created = repo.create(candidate, thread_id)?;
                outcome.created += 1;
                outcome.entities.push(created);
            }
        }
    }

    debug!(
        "Merged {} candidates for thread {}: created={}, updated={}",
        candidates.len(),
        thread_id,
        outcome.created,
        outcome.updated
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forumgraph_core::EntityType;
    use forumgraph_store::MemoryEntityStore;

    #[test]
    fn test_create_then_increment() {
        let store = MemoryEntityStore::new();
        let c = vec![EntityCandidate::new("Algorithm", EntityType::CsConcept, 0.8, "")];

        let first = merge_candidates(&store, &c, 1).unwrap();
        assert_eq!(first.created, 1);
        assert_eq!(first.entities[0].frequency_count, 0);

        let lower = vec![EntityCandidate::new("algorithm", EntityType::Concept, 0.8, "")];
        let second = merge_candidates(&store, &lower, 2).unwrap();
        assert_eq!(second.updated, 1);
        assert_eq!(second.entities[0].id, first.entities[0].id);
        assert_eq!(second.entities[0].frequency_count, 1);
        assert_eq!(second.entities[0].entity_type, EntityType::CsConcept);

        let stored = store.find_by_name("ALGORITHM").unwrap().unwrap();
        assert_eq!(stored.frequency_count, 1);
        assert!(stored.related_threads.contains(&1));
        assert!(stored.related_threads.contains(&2));
    }
}
