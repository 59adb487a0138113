//! ForumGraph Store — entity persistence behind the `EntityRepository` trait.

pub mod memory;
pub mod repository;
pub mod schema;
pub mod sqlite;
pub mod types;

pub use memory::MemoryEntityStore;
pub use repository::{EntityQueries, EntityRepository};
pub use sqlite::SqliteEntityStore;
pub use types::*;
