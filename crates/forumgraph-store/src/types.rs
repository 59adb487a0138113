//! Store-level statistics.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_entities: i64,
    /// Undirected relationship count (each symmetric pair counted once).
    pub total_relations: i64,
    pub thread_links: i64,
}
