//! Composite knowledge score.

use forumgraph_core::{clamp_unit, Entity};

const ENGAGEMENT_WEIGHT: f64 = 0.1;

/// `mean(confidence * frequency) + ln(views + replies + 1) * 0.1`, clamped to `[0, 1]`.
/// A thread with no entities scores 0.
pub fn knowledge_score(entities: &[Entity], view_count: u64, reply_count: u64) -> f64 {
    if entities.is_empty() {
        return 0.0;
    }

    let total: f64 = entities
        .iter()
        .map(|e| e.confidence_score * e.frequency_count as f64)
        .sum();
    let avg = total / entities.len() as f64;

    let engagement = view_count.saturating_add(reply_count).saturating_add(1) as f64;
    clamp_unit(avg + engagement.ln() * ENGAGEMENT_WEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forumgraph_core::{EntityCandidate, EntityType};

    fn entity(confidence: f64, frequency: u64) -> Entity {
        let c = EntityCandidate::new("x", EntityType::Term, confidence, "");
        let mut e = Entity::from_candidate(1, &c, 1);
        e.frequency_count = frequency;
        e
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(knowledge_score(&[], 1000, 50), 0.0);
    }

    #[test]
    fn test_single_entity_no_engagement() {
        let score = knowledge_score(&[entity(0.8, 1)], 0, 0);
        assert!((score - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_engagement_boost() {
        // New entities contribute nothing; only views + replies count.
        let score = knowledge_score(&[entity(0.5, 0)], 7, 2);
        assert!((score - 10f64.ln() * 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_capped_at_one() {
        let score = knowledge_score(&[entity(0.9, 40), entity(0.7, 3)], 500, 20);
        assert_eq!(score, 1.0);
    }
}
