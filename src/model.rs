//! Persisted entity types
//!
//! All records live in the shared store as JSON values. The shapes mirror
//! the logical buckets: links, docs, doc_keywords, keywords and stats.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Persisted metadata about a URL: status, content type, redirect target,
/// and its graph edges.
///
/// A `Link` with `redirect = true` is only a pointer at `url` (the target)
/// and carries no content metadata; it must be resolved transitively to a
/// non-redirect record before use. The `outgoing`/`incoming` sets are kept
/// symmetric: adding edge (A -> B) updates both records in the same write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Normalized absolute URL (fragment stripped)
    pub url: String,

    pub status_code: u16,
    pub content_type: String,
    pub last_modified: String,

    #[serde(default)]
    pub redirect: bool,

    #[serde(default)]
    pub outgoing: BTreeSet<String>,

    #[serde(default)]
    pub incoming: BTreeSet<String>,
}

impl Link {
    /// Builds a content-bearing link record from response metadata.
    pub fn new(url: String, status_code: u16, content_type: String, last_modified: String) -> Self {
        Self {
            url,
            status_code,
            content_type,
            // Upstream servers pad this header often enough to matter
            last_modified: last_modified.trim().to_string(),
            redirect: false,
            outgoing: BTreeSet::new(),
            incoming: BTreeSet::new(),
        }
    }

    /// Builds a redirect marker pointing at `target`.
    pub fn redirect_to(target: String) -> Self {
        Self {
            url: target,
            status_code: 0,
            content_type: String::new(),
            last_modified: String::new(),
            redirect: true,
            outgoing: BTreeSet::new(),
            incoming: BTreeSet::new(),
        }
    }
}

/// The indexed representation of one crawled page.
///
/// Created exactly once per URL, at successful processing; immutable
/// afterwards (there is no re-crawl path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub title: String,
    /// Byte size of the raw response body
    pub size: usize,
    /// Token count reported by the vectorizer
    pub length: u64,
}

/// A word and its frequency within one document (the document's keyword
/// vector, consumed by the external query path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRef {
    pub word: String,
    pub frequency: u64,
}

/// One document's contribution to a keyword's global record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub url: String,
    pub frequency: u64,
}

/// Global inverted-index record for a single word.
///
/// Invariant: `frequency` equals the sum of frequencies over `docs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub frequency: u64,
    pub docs: Vec<DocumentRef>,
}

/// Process-wide corpus counters, stored as a single record.
///
/// Must exist before any crawl step runs; absence is fatal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountStats {
    pub document_count: u64,
    pub pending_count: u64,
    pub keyword_count: u64,
}
