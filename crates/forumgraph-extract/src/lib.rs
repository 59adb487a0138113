//! ForumGraph Extract — dictionary/pattern entity recognition with a minimal
//! fallback tier, sliding-window key phrases, and a keyword sentiment heuristic.
//!
//! Everything here is deterministic: fixed word lists, regex shape checks and
//! counting. No statistical models are involved.

pub mod dictionaries;
pub mod keyphrase;
pub mod recognizer;
pub mod sentiment;
pub mod text;

pub use dictionaries::{Dictionaries, Domain};
pub use keyphrase::extract_key_phrases;
pub use recognizer::{
    dedupe_candidates, EntityRecognizer, MinimalRecognizer, PatternRecognizer, Recognition,
    RecognizerChain,
};
pub use sentiment::{KeywordSentiment, SentimentAnalyzer, Tone};
