//! ForumGraph Core — thread/entity model, error type, configuration, NLP capabilities.

pub mod capabilities;
pub mod config;
pub mod error;
pub mod types;

pub use capabilities::{ExtractionTier, NlpCapabilities};
pub use config::{ForumGraphConfig, SummaryLimits};
pub use error::{Error, Result};
pub use types::*;
