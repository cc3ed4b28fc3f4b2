//! Storage module: the shared persistent store
//!
//! The store is a transactional key/value database with named buckets,
//! backed by SQLite. Each crawl step runs against one write transaction
//! that either commits every mutation or none of them. Reads outside a
//! transaction are allowed for the unlocked planning phase of a step.

mod kv;
mod schema;

pub use kv::StoreTx;
pub use schema::initialize_schema;

use rusqlite::Connection;
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Logical buckets in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Frontier of URLs awaiting crawl
    Pending,
    /// Document store
    Docs,
    /// Per-document keyword vectors
    DocKeywords,
    /// Link store and graph
    Links,
    /// Inverted keyword index
    Keywords,
    /// Corpus counters
    Stats,
}

impl Bucket {
    pub const ALL: [Bucket; 6] = [
        Bucket::Pending,
        Bucket::Docs,
        Bucket::DocKeywords,
        Bucket::Links,
        Bucket::Keywords,
        Bucket::Stats,
    ];

    /// The SQLite table backing this bucket
    pub fn table(self) -> &'static str {
        match self {
            Bucket::Pending => "pending",
            Bucket::Docs => "docs",
            Bucket::DocKeywords => "doc_keywords",
            Bucket::Links => "links",
            Bucket::Keywords => "keywords",
            Bucket::Stats => "stats",
        }
    }
}

/// Key of the single corpus-counters record in [`Bucket::Stats`]
pub const STATS_KEY: &str = "count";

/// Handle to the shared persistent store
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Begins the single write transaction for one crawl step.
    pub fn tx(&mut self) -> StorageResult<StoreTx<'_>> {
        StoreTx::new(&mut self.conn)
    }

    /// Read-only lookup outside any write transaction.
    pub fn get(&self, bucket: Bucket, key: &str) -> StorageResult<Option<Vec<u8>>> {
        kv::get_raw(&self.conn, bucket, key)
    }

    /// Read-only JSON lookup outside any write transaction.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        bucket: Bucket,
        key: &str,
    ) -> StorageResult<Option<T>> {
        match self.get(bucket, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Lexicographically smallest key in the bucket, read-only.
    pub fn first_key(&self, bucket: Bucket) -> StorageResult<Option<String>> {
        kv::first_key_raw(&self.conn, bucket)
    }

    /// Number of records in the bucket, read-only.
    pub fn count(&self, bucket: Bucket) -> StorageResult<u64> {
        kv::count_raw(&self.conn, bucket)
    }
}
