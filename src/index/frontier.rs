//! Frontier: the ordered set of URLs awaiting crawl
//!
//! The frontier is the `pending` bucket used as a key set. Dequeue order is
//! lexicographic key order, not arrival order; a key's presence means the
//! URL has not yet been dequeued for processing.

use crate::storage::{Bucket, Store, StoreTx};
use crate::Result;

/// Returns the next URL to crawl without removing it.
///
/// This is the read-only half of the dequeue; the commit phase of the step
/// removes the key once the outcome is known.
pub fn peek(store: &Store) -> Result<Option<String>> {
    Ok(store.first_key(Bucket::Pending)?)
}

/// Inserts a URL into the frontier. Re-inserting an existing key is a no-op.
pub fn enqueue(tx: &StoreTx<'_>, url: &str) -> Result<()> {
    tx.put(Bucket::Pending, url, b"")?;
    Ok(())
}

/// Removes a URL from the frontier.
pub fn remove(tx: &StoreTx<'_>, url: &str) -> Result<()> {
    tx.delete(Bucket::Pending, url)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Store;

    #[test]
    fn peek_returns_lexicographically_smallest() {
        let mut store = Store::open_in_memory().unwrap();

        let tx = store.tx().unwrap();
        enqueue(&tx, "http://z.test/").unwrap();
        enqueue(&tx, "http://m.test/").unwrap();
        enqueue(&tx, "http://a.test/").unwrap();
        tx.commit().unwrap();

        assert_eq!(peek(&store).unwrap(), Some("http://a.test/".to_string()));

        // Peek does not consume
        assert_eq!(peek(&store).unwrap(), Some("http://a.test/".to_string()));
    }

    #[test]
    fn peek_empty_frontier() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(peek(&store).unwrap(), None);
    }

    #[test]
    fn enqueue_is_idempotent() {
        let mut store = Store::open_in_memory().unwrap();

        let tx = store.tx().unwrap();
        enqueue(&tx, "http://a.test/").unwrap();
        enqueue(&tx, "http://a.test/").unwrap();
        tx.commit().unwrap();

        assert_eq!(store.count(crate::storage::Bucket::Pending).unwrap(), 1);
    }

    #[test]
    fn remove_advances_the_queue() {
        let mut store = Store::open_in_memory().unwrap();

        let tx = store.tx().unwrap();
        enqueue(&tx, "http://a.test/").unwrap();
        enqueue(&tx, "http://b.test/").unwrap();
        tx.commit().unwrap();

        let tx = store.tx().unwrap();
        remove(&tx, "http://a.test/").unwrap();
        tx.commit().unwrap();

        assert_eq!(peek(&store).unwrap(), Some("http://b.test/".to_string()));
    }
}
