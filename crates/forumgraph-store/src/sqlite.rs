//! SQLite-backed entity repository.
//!
//! Names are unique under `COLLATE NOCASE`. Relation rows are written in both
//! directions on every save, so the table is symmetric regardless of which
//! side the caller persisted. `transaction` gives callers the atomic boundary
//! one processing call needs.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::repository::{EntityQueries, EntityRepository};
use crate::schema::SCHEMA_SQL;
use crate::types::StoreStats;
use forumgraph_core::{Entity, EntityCandidate, EntityId, EntityType, Error, Result, ThreadId};

const SELECT_ENTITY: &str = "SELECT e.id, e.name, e.entity_type, e.description, e.confidence_score, \
     e.frequency_count, e.created_at, e.updated_at FROM entities e";

const RANK_ORDER: &str = "ORDER BY e.frequency_count DESC, e.confidence_score DESC, e.name COLLATE NOCASE";

fn db_err(e: rusqlite::Error) -> Error {
    Error::Database(e.to_string())
}

/// SQLite entity store.
pub struct SqliteEntityStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl SqliteEntityStore {
    /// Open or create the store at `db_path`, creating parent directories.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path).map_err(db_err)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(db_err)?;
        let store = Self::init(conn, Some(db_path.to_path_buf()))?;

        let stats = store.stats()?;
        info!(
            "SqliteEntityStore initialized: {} entities, {} relations, path={}",
            stats.total_entities,
            stats.total_relations,
            db_path.display()
        );
        Ok(store)
    }

    /// Private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;").map_err(db_err)?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, db_path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Run `f` inside `BEGIN IMMEDIATE` / `COMMIT`, rolling back if it fails.
    ///
    /// Must not be nested; SQLite rejects a second `BEGIN`.
    pub fn transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        self.conn.lock().execute_batch("BEGIN IMMEDIATE").map_err(db_err)?;
        match f(self) {
            Ok(value) => {
                self.conn.lock().execute_batch("COMMIT").map_err(db_err)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rb) = self.conn.lock().execute_batch("ROLLBACK") {
                    warn!("Rollback failed after '{}': {}", e, rb);
                } else {
                    debug!("Rolled back transaction: {}", e);
                }
                Err(e)
            }
        }
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.conn.lock();
        let count = |sql: &str| -> Result<i64> {
            conn.query_row(sql, [], |row| row.get(0)).map_err(db_err)
        };
        Ok(StoreStats {
            total_entities: count("SELECT COUNT(*) FROM entities")?,
            total_relations: count("SELECT COUNT(*) FROM entity_relations")? / 2,
            thread_links: count("SELECT COUNT(*) FROM entity_threads")?,
        })
    }

    fn row_to_entity(row: &rusqlite::Row<'_>) -> rusqlite::Result<Entity> {
        let frequency: i64 = row.get(5)?;
        let entity_type: String = row.get(2)?;
        Ok(Entity {
            id: row.get(0)?,
            name: row.get(1)?,
            entity_type: EntityType::from(entity_type),
            description: row.get(3)?,
            confidence_score: row.get(4)?,
            frequency_count: frequency.max(0) as u64,
            related_entities: Default::default(),
            related_threads: Default::default(),
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    /// Fill in relation and thread sets.
    fn hydrate(conn: &Connection, mut entity: Entity) -> Result<Entity> {
        let mut stmt = conn
            .prepare_cached("SELECT related_id FROM entity_relations WHERE entity_id = ?1")
            .map_err(db_err)?;
        entity.related_entities = stmt
            .query_map(params![entity.id], |row| row.get(0))
            .map_err(db_err)?
            .collect::<rusqlite::Result<_>>()
            .map_err(db_err)?;

        let mut stmt = conn
            .prepare_cached("SELECT thread_id FROM entity_threads WHERE entity_id = ?1")
            .map_err(db_err)?;
        entity.related_threads = stmt
            .query_map(params![entity.id], |row| row.get(0))
            .map_err(db_err)?
            .collect::<rusqlite::Result<_>>()
            .map_err(db_err)?;
        Ok(entity)
    }

    fn query_one(&self, sql: &str, param: &dyn rusqlite::ToSql) -> Result<Option<Entity>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached(sql)
            .map_err(db_err)?
            .query_row([param].as_slice(), Self::row_to_entity)
            .optional()
            .map_err(db_err)?;
        row.map(|e| Self::hydrate(&conn, e)).transpose()
    }

    fn query_many(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Entity>> {
        let conn = self.conn.lock();
        let rows: Vec<Entity> = conn
            .prepare_cached(sql)
            .map_err(db_err)?
            .query_map(params, Self::row_to_entity)
            .map_err(db_err)?
            .collect::<rusqlite::Result<_>>()
            .map_err(db_err)?;
        rows.into_iter().map(|e| Self::hydrate(&conn, e)).collect()
    }
}

impl EntityRepository for SqliteEntityStore {
    fn find_by_name(&self, name: &str) -> Result<Option<Entity>> {
        let sql = format!("{} WHERE e.name = ?1", SELECT_ENTITY);
        self.query_one(&sql, &name.trim())
    }

    fn get(&self, id: EntityId) -> Result<Option<Entity>> {
        let sql = format!("{} WHERE e.id = ?1", SELECT_ENTITY);
        self.query_one(&sql, &id)
    }

    fn create(&self, candidate: &EntityCandidate, thread_id: ThreadId) -> Result<Entity> {
        let mut entity = Entity::from_candidate(0, candidate, thread_id);
        entity.name = entity.name.trim().to_string();
        if entity.name.is_empty() {
            return Err(Error::Storage("entity name must not be blank".into()));
        }

        let mut conn = self.conn.lock();
        let sp = conn.savepoint().map_err(db_err)?;
        entity.id = sp
            .prepare_cached(
                "INSERT INTO entities (name, entity_type, description, confidence_score, frequency_count, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .map_err(db_err)?
            .insert(params![
                entity.name,
                entity.entity_type.as_str(),
                entity.description,
                entity.confidence_score,
                entity.frequency_count as i64,
                entity.created_at,
            ])
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint") {
                    Error::Storage(format!("entity '{}' already exists", entity.name))
                } else {
                    db_err(e)
                }
            })?;
        sp.execute(
            "INSERT OR IGNORE INTO entity_threads (entity_id, thread_id) VALUES (?1, ?2)",
            params![entity.id, thread_id],
        )
        .map_err(db_err)?;
        sp.commit().map_err(db_err)?;

        debug!("Created entity {} '{}'", entity.id, entity.name);
        Ok(entity)
    }

    fn save(&self, entity: &Entity) -> Result<()> {
        let mut conn = self.conn.lock();
        let sp = conn.savepoint().map_err(db_err)?;

        let updated = sp
            .execute(
                "UPDATE entities SET name = ?1, entity_type = ?2, description = ?3,
                     confidence_score = ?4, frequency_count = ?5, updated_at = ?6
                 WHERE id = ?7",
                params![
                    entity.name,
                    entity.entity_type.as_str(),
                    entity.description,
                    entity.confidence_score,
                    entity.frequency_count as i64,
                    entity.updated_at,
                    entity.id,
                ],
            )
            .map_err(db_err)?;
        if updated == 0 {
            return Err(Error::NotFound(format!("entity {}", entity.id)));
        }

        {
            let mut link = sp
                .prepare_cached(
                    "INSERT OR IGNORE INTO entity_relations (entity_id, related_id) VALUES (?1, ?2), (?2, ?1)",
                )
                .map_err(db_err)?;
            for &related in entity.related_entities.iter().filter(|&&r| r != entity.id) {
                link.execute(params![entity.id, related]).map_err(db_err)?;
            }

            let mut thread = sp
                .prepare_cached("INSERT OR IGNORE INTO entity_threads (entity_id, thread_id) VALUES (?1, ?2)")
                .map_err(db_err)?;
            for &thread_id in &entity.related_threads {
                thread.execute(params![entity.id, thread_id]).map_err(db_err)?;
            }
        }

        sp.commit().map_err(db_err)
    }
}

impl EntityQueries for SqliteEntityStore {
    fn search_by_name(&self, needle: &str, limit: usize) -> Result<Vec<Entity>> {
        let sql = format!(
            "{} WHERE instr(lower(e.name), lower(?1)) > 0 {} LIMIT ?2",
            SELECT_ENTITY, RANK_ORDER
        );
        self.query_many(&sql, params![needle, limit as i64])
    }

    fn most_frequent(&self, limit: usize) -> Result<Vec<Entity>> {
        let sql = format!("{} {} LIMIT ?1", SELECT_ENTITY, RANK_ORDER);
        self.query_many(&sql, params![limit as i64])
    }

    fn by_type(&self, entity_type: &EntityType, limit: usize) -> Result<Vec<Entity>> {
        let sql = format!("{} WHERE e.entity_type = ?1 {} LIMIT ?2", SELECT_ENTITY, RANK_ORDER);
        self.query_many(&sql, params![entity_type.as_str(), limit as i64])
    }

    fn related_to(&self, id: EntityId) -> Result<Vec<Entity>> {
        let sql = format!(
            "{} JOIN entity_relations r ON r.related_id = e.id WHERE r.entity_id = ?1 {}",
            SELECT_ENTITY, RANK_ORDER
        );
        self.query_many(&sql, params![id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (SqliteEntityStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteEntityStore::open(dir.path().join("forumgraph.db")).unwrap();
        (store, dir)
    }

    fn candidate(name: &str, t: EntityType) -> EntityCandidate {
        EntityCandidate::new(name, t, 0.8, "test")
    }

    #[test]
    fn test_open_under_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let result = SqliteEntityStore::open(blocker.join("sub").join("forumgraph.db"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_create_and_find_case_insensitive() {
        let (store, _dir) = test_store();
        let created = store.create(&candidate("Algorithm", EntityType::CsConcept), 5).unwrap();
        assert_eq!(created.frequency_count, 0);

        let found = store.find_by_name("algorithm").unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.entity_type, EntityType::CsConcept);
        assert!(found.related_threads.contains(&5));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (store, _dir) = test_store();
        store.create(&candidate("stack", EntityType::CsConcept), 1).unwrap();
        let err = store.create(&candidate("STACK", EntityType::Term), 1).unwrap_err();
        assert!(err.is_persistence());
        assert_eq!(store.stats().unwrap().total_entities, 1);
    }

    #[test]
    fn test_save_persists_counters_and_symmetric_relations() {
        let (store, _dir) = test_store();
        let mut a = store.create(&candidate("heap", EntityType::CsConcept), 1).unwrap();
        let b = store.create(&candidate("priority queue", EntityType::KeyPhrase), 1).unwrap();

        a.record_occurrence(2);
        a.related_entities.insert(b.id);
        store.save(&a).unwrap();

        let a2 = store.get(a.id).unwrap().unwrap();
        assert_eq!(a2.frequency_count, 1);
        assert_eq!(a2.related_threads.len(), 2);
        assert!(a2.related_entities.contains(&b.id));

        let b2 = store.get(b.id).unwrap().unwrap();
        assert!(b2.related_entities.contains(&a.id));
        assert_eq!(store.stats().unwrap().total_relations, 1);
        assert_eq!(store.related_to(b.id).unwrap()[0].id, a.id);
    }

    #[test]
    fn test_save_missing_is_not_found() {
        let (store, _dir) = test_store();
        let ghost = Entity::from_candidate(99, &candidate("ghost", EntityType::Term), 1);
        assert!(matches!(store.save(&ghost), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let (store, _dir) = test_store();
        let result: Result<()> = store.transaction(|s| {
            s.create(&candidate("graph", EntityType::CsConcept), 1)?;
            Err(Error::Storage("simulated".into()))
        });
        assert!(result.is_err());
        assert!(store.find_by_name("graph").unwrap().is_none());

        store
            .transaction(|s| s.create(&candidate("graph", EntityType::CsConcept), 1).map(|_| ()))
            .unwrap();
        assert!(store.find_by_name("Graph").unwrap().is_some());
    }

    #[test]
    fn test_queries() {
        let (store, _dir) = test_store();
        let mut tree = store.create(&candidate("binary tree", EntityType::KeyPhrase), 1).unwrap();
        store.create(&candidate("tree traversal", EntityType::KeyPhrase), 1).unwrap();
        store.create(&candidate("Euler", EntityType::Person), 1).unwrap();
        tree.record_occurrence(2);
        store.save(&tree).unwrap();

        let hits = store.search_by_name("TREE", 10).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "binary tree");
        assert_eq!(store.most_frequent(1).unwrap()[0].name, "binary tree");
        assert_eq!(store.by_type(&EntityType::Person, 10).unwrap().len(), 1);
        assert!(store.search_by_name("zzz", 10).unwrap().is_empty());
    }

    #[test]
    fn test_in_memory_store() {
        let store = SqliteEntityStore::open_in_memory().unwrap();
        assert!(store.db_path().is_none());
        store.create(&candidate("mutex", EntityType::CsConcept), 1).unwrap();
        assert_eq!(store.stats().unwrap().thread_links, 1);
    }
}
