//! Database schema SQL.

/// Entity rows plus the relation and thread-link tables.
///
/// `name` uses `COLLATE NOCASE` so both the unique constraint and equality
/// lookups ignore ASCII case. Relations are stored once per direction.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS entities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL COLLATE NOCASE UNIQUE,
    entity_type TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    confidence_score REAL NOT NULL,
    frequency_count INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER
);

CREATE INDEX IF NOT EXISTS idx_entities_type ON entities(entity_type);
CREATE INDEX IF NOT EXISTS idx_entities_frequency ON entities(frequency_count);

CREATE TABLE IF NOT EXISTS entity_relations (
    entity_id INTEGER NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
    related_id INTEGER NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
    PRIMARY KEY (entity_id, related_id),
    CHECK (entity_id <> related_id)
);

CREATE TABLE IF NOT EXISTS entity_threads (
    entity_id INTEGER NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
    thread_id INTEGER NOT NULL,
    PRIMARY KEY (entity_id, thread_id)
);

CREATE INDEX IF NOT EXISTS idx_entity_threads_thread ON entity_threads(thread_id);
"#;
