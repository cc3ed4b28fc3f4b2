//! Inverted keyword index
//!
//! Maps each word to its aggregate corpus frequency and the ordered list of
//! documents containing it. Updates run inside the step's commit
//! transaction; a document contributes to each keyword at most once because
//! documents are created at most once per URL.

use crate::model::{CountStats, DocumentRef, Keyword, KeywordRef};
use crate::storage::{Bucket, StoreTx};
use crate::Result;
use std::collections::BTreeMap;

/// Applies one document's word-frequency map to the inverted index.
///
/// For every word with a positive frequency: creates the keyword record if
/// absent (incrementing the corpus keyword counter), adds the frequency to
/// the aggregate, and appends a `DocumentRef` to the keyword's document
/// list. Returns the document's own keyword vector for the document store.
pub fn apply_word_counts(
    tx: &StoreTx<'_>,
    doc_url: &str,
    counts: &BTreeMap<String, u64>,
    stats: &mut CountStats,
) -> Result<Vec<KeywordRef>> {
    let mut doc_keywords = Vec::with_capacity(counts.len());

    for (word, &frequency) in counts {
        if frequency == 0 {
            continue;
        }

        doc_keywords.push(KeywordRef {
            word: word.clone(),
            frequency,
        });

        let mut keyword = match tx.get_json::<Keyword>(Bucket::Keywords, word)? {
            Some(existing) => existing,
            None => {
                stats.keyword_count += 1;
                Keyword::default()
            }
        };

        keyword.frequency += frequency;
        keyword.docs.push(DocumentRef {
            url: doc_url.to_string(),
            frequency,
        });

        tx.put_json(Bucket::Keywords, word, &keyword)?;
    }

    Ok(doc_keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Store;

    fn counts(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
        pairs.iter().map(|(w, f)| (w.to_string(), *f)).collect()
    }

    #[test]
    fn new_keywords_increment_counter() {
        let mut store = Store::open_in_memory().unwrap();
        let tx = store.tx().unwrap();
        let mut stats = CountStats::default();

        let refs = apply_word_counts(
            &tx,
            "http://a.test/",
            &counts(&[("hello", 2), ("world", 1)]),
            &mut stats,
        )
        .unwrap();

        assert_eq!(stats.keyword_count, 2);
        assert_eq!(refs.len(), 2);

        let hello: Keyword = tx.get_json(Bucket::Keywords, "hello").unwrap().unwrap();
        assert_eq!(hello.frequency, 2);
        assert_eq!(hello.docs.len(), 1);
        assert_eq!(hello.docs[0].url, "http://a.test/");
        assert_eq!(hello.docs[0].frequency, 2);
    }

    #[test]
    fn existing_keyword_does_not_increment_counter() {
        let mut store = Store::open_in_memory().unwrap();
        let tx = store.tx().unwrap();
        let mut stats = CountStats::default();

        apply_word_counts(&tx, "http://a.test/", &counts(&[("hello", 2)]), &mut stats).unwrap();
        apply_word_counts(&tx, "http://b.test/", &counts(&[("hello", 3)]), &mut stats).unwrap();

        assert_eq!(stats.keyword_count, 1);

        let hello: Keyword = tx.get_json(Bucket::Keywords, "hello").unwrap().unwrap();
        assert_eq!(hello.frequency, 5);
        assert_eq!(hello.docs.len(), 2);
        // Document list is append-ordered
        assert_eq!(hello.docs[0].url, "http://a.test/");
        assert_eq!(hello.docs[1].url, "http://b.test/");
    }

    #[test]
    fn aggregate_equals_sum_of_document_refs() {
        let mut store = Store::open_in_memory().unwrap();
        let tx = store.tx().unwrap();
        let mut stats = CountStats::default();

        apply_word_counts(
            &tx,
            "http://a.test/",
            &counts(&[("alpha", 4), ("beta", 1)]),
            &mut stats,
        )
        .unwrap();
        apply_word_counts(
            &tx,
            "http://b.test/",
            &counts(&[("alpha", 2), ("gamma", 7)]),
            &mut stats,
        )
        .unwrap();

        for word in ["alpha", "beta", "gamma"] {
            let keyword: Keyword = tx.get_json(Bucket::Keywords, word).unwrap().unwrap();
            let sum: u64 = keyword.docs.iter().map(|d| d.frequency).sum();
            assert_eq!(keyword.frequency, sum, "aggregate invariant for {}", word);
        }
    }

    #[test]
    fn zero_frequency_words_are_ignored() {
        let mut store = Store::open_in_memory().unwrap();
        let tx = store.tx().unwrap();
        let mut stats = CountStats::default();

        let refs = apply_word_counts(
            &tx,
            "http://a.test/",
            &counts(&[("empty", 0), ("real", 1)]),
            &mut stats,
        )
        .unwrap();

        assert_eq!(stats.keyword_count, 1);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].word, "real");
        assert!(tx
            .get_json::<Keyword>(Bucket::Keywords, "empty")
            .unwrap()
            .is_none());
    }
}
