//! Document store
//!
//! Maps a canonical URL to its `Document` record and keyword vector. A
//! document is written exactly once, at the successful processing of its
//! URL; there is no re-crawl path.

use crate::model::{Document, KeywordRef};
use crate::storage::{Bucket, Store, StoreTx};
use crate::Result;

/// Dedup check during the unlocked fetch phase.
pub fn contains(store: &Store, url: &str) -> Result<bool> {
    Ok(store.get(Bucket::Docs, url)?.is_some())
}

/// Dedup re-validation inside the commit transaction.
pub fn contains_tx(tx: &StoreTx<'_>, url: &str) -> Result<bool> {
    Ok(tx.get(Bucket::Docs, url)?.is_some())
}

/// Stores a document and its keyword vector.
pub fn put(tx: &StoreTx<'_>, doc: &Document, keywords: &[KeywordRef]) -> Result<()> {
    tx.put_json(Bucket::Docs, &doc.url, doc)?;
    tx.put_json(Bucket::DocKeywords, &doc.url, &keywords)?;
    Ok(())
}

/// Loads a document record.
pub fn get(store: &Store, url: &str) -> Result<Option<Document>> {
    Ok(store.get_json(Bucket::Docs, url)?)
}

/// Loads a document's keyword vector.
pub fn keyword_vector(store: &Store, url: &str) -> Result<Option<Vec<KeywordRef>>> {
    Ok(store.get_json(Bucket::DocKeywords, url)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(url: &str) -> Document {
        Document {
            url: url.to_string(),
            title: "Title".to_string(),
            size: 120,
            length: 9,
        }
    }

    #[test]
    fn put_then_contains_and_get() {
        let mut store = Store::open_in_memory().unwrap();

        let tx = store.tx().unwrap();
        assert!(!contains_tx(&tx, "http://a.test/").unwrap());

        let keywords = vec![KeywordRef {
            word: "hello".to_string(),
            frequency: 2,
        }];
        put(&tx, &doc("http://a.test/"), &keywords).unwrap();
        assert!(contains_tx(&tx, "http://a.test/").unwrap());
        tx.commit().unwrap();

        assert!(contains(&store, "http://a.test/").unwrap());
        assert_eq!(get(&store, "http://a.test/").unwrap(), Some(doc("http://a.test/")));
        assert_eq!(
            keyword_vector(&store, "http://a.test/").unwrap().unwrap(),
            keywords
        );
    }

    #[test]
    fn absent_url_not_contained() {
        let store = Store::open_in_memory().unwrap();
        assert!(!contains(&store, "http://missing.test/").unwrap());
        assert!(get(&store, "http://missing.test/").unwrap().is_none());
    }
}
