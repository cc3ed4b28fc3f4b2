//! Transactional key/value operations over the bucket tables
//!
//! `StoreTx` wraps one rusqlite transaction. A crawl step runs to commit or
//! rollback as a unit: dropping a `StoreTx` without calling [`StoreTx::commit`]
//! rolls back every write made through it.

use crate::storage::{Bucket, StorageResult};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A single write transaction against the store
pub struct StoreTx<'a> {
    tx: Transaction<'a>,
}

impl<'a> StoreTx<'a> {
    pub(crate) fn new(conn: &'a mut Connection) -> StorageResult<Self> {
        Ok(Self {
            tx: conn.transaction()?,
        })
    }

    /// Gets the raw value stored under `key`, or `None` if absent.
    pub fn get(&self, bucket: Bucket, key: &str) -> StorageResult<Option<Vec<u8>>> {
        get_raw(&self.tx, bucket, key)
    }

    /// Stores `value` under `key`, replacing any existing value.
    pub fn put(&self, bucket: Bucket, key: &str, value: &[u8]) -> StorageResult<()> {
        self.tx.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (key, value) VALUES (?1, ?2)",
                bucket.table()
            ),
            params![key, value],
        )?;
        Ok(())
    }

    /// Deletes the record under `key`; deleting an absent key is a no-op.
    pub fn delete(&self, bucket: Bucket, key: &str) -> StorageResult<()> {
        self.tx.execute(
            &format!("DELETE FROM {} WHERE key = ?1", bucket.table()),
            params![key],
        )?;
        Ok(())
    }

    /// Returns the lexicographically smallest key in the bucket.
    pub fn first_key(&self, bucket: Bucket) -> StorageResult<Option<String>> {
        first_key_raw(&self.tx, bucket)
    }

    /// Gets and JSON-decodes the record under `key`.
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

    /// JSON-encodes and stores `value` under `key`.
    pub fn put_json<T: Serialize>(&self, bucket: Bucket, key: &str, value: &T) -> StorageResult<()> {
        let bytes = serde_json::to_vec(value)?;
        self.put(bucket, key, &bytes)
    }

    /// Commits every write made through this transaction.
    pub fn commit(self) -> StorageResult<()> {
        self.tx.commit()?;
        Ok(())
    }
}

pub(crate) fn get_raw(
    conn: &Connection,
    bucket: Bucket,
    key: &str,
) -> StorageResult<Option<Vec<u8>>> {
    let value = conn
        .query_row(
            &format!("SELECT value FROM {} WHERE key = ?1", bucket.table()),
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub(crate) fn first_key_raw(conn: &Connection, bucket: Bucket) -> StorageResult<Option<String>> {
    let key = conn
        .query_row(
            &format!("SELECT key FROM {} ORDER BY key LIMIT 1", bucket.table()),
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(key)
}

pub(crate) fn count_raw(conn: &Connection, bucket: Bucket) -> StorageResult<u64> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", bucket.table()),
        [],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}
