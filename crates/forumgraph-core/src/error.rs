//! Error types for ForumGraph.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Sentiment error: {0}")]
    Sentiment(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error came from the entity persistence layer.
    ///
    /// Persistence failures must abort the enclosing transaction; every other
    /// kind is recoverable inside the engine.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Database(_) | Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
