//! Database schema definitions
//!
//! One table per logical bucket. Every bucket is a plain ordered key/value
//! map: `key` is the record identity (usually a URL), `value` is the JSON
//! encoding of the record.

/// SQL schema for the store
pub const SCHEMA_SQL: &str = r#"
-- Frontier: URLs discovered but not yet crawled (value unused)
CREATE TABLE IF NOT EXISTS pending (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL
);

-- Document store: URL -> Document
CREATE TABLE IF NOT EXISTS docs (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL
);

-- Per-document keyword vectors: URL -> [KeywordRef]
CREATE TABLE IF NOT EXISTS doc_keywords (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL
);

-- Link store and graph: URL -> Link
CREATE TABLE IF NOT EXISTS links (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL
);

-- Inverted index: word -> Keyword
CREATE TABLE IF NOT EXISTS keywords (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL
);

-- Corpus counters, single record under a fixed key
CREATE TABLE IF NOT EXISTS stats (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL
);
"#;

/// Initializes the store schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Bucket;
    use rusqlite::Connection;

    #[test]
    fn schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn all_bucket_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for bucket in Bucket::ALL {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [bucket.table()],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", bucket.table());
        }
    }
}
