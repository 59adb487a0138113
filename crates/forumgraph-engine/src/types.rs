//! Engine types.

use serde::Serialize;

use forumgraph_core::{EntityCandidate, ThreadId};

/// De-duplicated candidates from one extraction step.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSet {
    pub candidates: Vec<EntityCandidate>,
    pub fallback_used: bool,
}

/// Which entry point produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessMode {
    FullThread,
    Reply,
    /// Input was empty; the thread was left untouched.
    Skipped,
}

/// Result of one processing call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReport {
    pub thread_id: ThreadId,
    pub mode: ProcessMode,
    /// Distinct candidates after de-duplication.
    pub candidates: usize,
    pub created: usize,
    pub updated: usize,
    /// Relationship pairs that did not exist before this call.
    pub edges_added: usize,
    pub fallback_used: bool,
    pub knowledge_score: f64,
    pub duration_ms: u64,
}

impl ProcessReport {
    pub(crate) fn new(thread_id: ThreadId, mode: ProcessMode) -> Self {
        Self {
            thread_id,
            mode,
            candidates: 0,
            created: 0,
            updated: 0,
            edges_added: 0,
            fallback_used: false,
            knowledge_score: 0.0,
            duration_ms: 0,
        }
    }
}
