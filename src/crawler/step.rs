//! Crawl step orchestrator
//!
//! One step is the atomic unit of work: dequeue a URL, resolve it, fetch
//! and extract its content, update the link graph, inverted index, document
//! store and corpus counters, and commit all of it or none of it.
//!
//! The step is split into three phases so the store's single writer lock is
//! never held across network I/O:
//! 1. plan — read-only: load counters, peek the frontier;
//! 2. fetch — unlocked: resolve the link, fetch the body, extract content
//!    and resolve children, staging link records in memory;
//! 3. commit — one short write transaction: remove the frontier entry,
//!    re-validate the dedup check, and apply every staged mutation.
//!
//! A step that fails mid-fetch has committed nothing, so the frontier entry
//! simply survives for a later retry; no explicit re-enqueue is needed.

use crate::crawler::extract::extract;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::vectorizer::vectorize;
use crate::index::{docs, frontier, keywords, valid_link, LinkResolver};
use crate::model::{CountStats, Document, Link};
use crate::storage::{Bucket, Store, StoreTx, STATS_KEY};
use crate::{output, QuarryError, Result};
use std::fmt;
use url::Url;

/// Terminal state of a successful step
#[derive(Debug)]
pub enum StepOutcome {
    /// A document was indexed and every mutation committed
    Committed(StepSummary),
    /// The step finished without indexing content; counts as success
    Skipped(SkipReason),
}

/// Why a step skipped its URL without indexing it
#[derive(Debug)]
pub enum SkipReason {
    /// The pending entry was not a parseable URL; it was dropped
    MalformedUrl(String),
    /// The resolved link failed the validity filter
    InvalidLink(String),
    /// A document already exists for this URL
    AlreadyIndexed(String),
    /// The page body could not be read
    BodyUnreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MalformedUrl(url) => write!(f, "malformed pending url {}", url),
            SkipReason::InvalidLink(url) => write!(f, "link failed validity filter: {}", url),
            SkipReason::AlreadyIndexed(url) => write!(f, "already indexed: {}", url),
            SkipReason::BodyUnreadable(url) => write!(f, "could not read body of {}", url),
        }
    }
}

/// Human-readable result of a committed step
#[derive(Debug, Clone)]
pub struct StepSummary {
    pub title: String,
    pub url: String,
    pub size: usize,
    pub last_modified: String,
    pub children: usize,
    pub stats: CountStats,
}

/// Initializes the corpus: writes zeroed counters and enqueues the seed URL.
///
/// Idempotent: an already-initialized store is left untouched. The counters
/// record must exist before any step runs; its absence at step start is
/// treated as a corrupt store.
pub fn init_corpus(store: &mut Store, seed_url: &str) -> Result<CountStats> {
    if let Some(stats) = store.get_json::<CountStats>(Bucket::Stats, STATS_KEY)? {
        return Ok(stats);
    }

    let stats = CountStats {
        document_count: 0,
        pending_count: 1,
        keyword_count: 0,
    };

    let tx = store.tx()?;
    tx.put_json(Bucket::Stats, STATS_KEY, &stats)?;
    frontier::enqueue(&tx, seed_url)?;
    tx.commit()?;

    tracing::info!(seed = seed_url, "initialized corpus");
    Ok(stats)
}

/// Executes one crawl step.
///
/// Returns `Ok(StepOutcome)` for both committed and skipped steps; an error
/// means nothing was committed and the caller decides whether to retry.
/// `seed_url` is enqueued (and persisted) when the frontier turns out to be
/// empty, before the `EmptyFrontier` error is returned.
pub async fn crawl_step(
    store: &mut Store,
    fetcher: &Fetcher,
    seed_url: &str,
) -> Result<StepOutcome> {
    // ----- plan phase: read-only -----

    let mut stats: CountStats = store
        .get_json(Bucket::Stats, STATS_KEY)?
        .ok_or(QuarryError::MissingStats)?;

    let pending_url = match frontier::peek(store)? {
        Some(url) => url,
        None => {
            // Committed on its own so the seed survives the error below.
            // The seed is counted exactly as init_corpus counts its seed.
            tracing::info!(seed = seed_url, "frontier empty, seeding");
            stats.pending_count += 1;
            let tx = store.tx()?;
            frontier::enqueue(&tx, seed_url)?;
            tx.put_json(Bucket::Stats, STATS_KEY, &stats)?;
            tx.commit()?;
            return Err(QuarryError::EmptyFrontier);
        }
    };

    tracing::debug!(url = %pending_url, "dequeued");

    // ----- fetch phase: no transaction held -----

    let url = match Url::parse(&pending_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(url = %pending_url, error = %e, "cannot parse pending url, dropping");
            let tx = store.tx()?;
            frontier::remove(&tx, &pending_url)?;
            tx.commit()?;
            return Ok(StepOutcome::Skipped(SkipReason::MalformedUrl(pending_url)));
        }
    };

    let mut resolver = LinkResolver::new(fetcher);
    let link = resolver.resolve(store, &url).await?;

    if !valid_link(&link) {
        return commit_skip(store, &pending_url, resolver, SkipReason::InvalidLink(link.url));
    }

    if docs::contains(store, &link.url)? {
        return commit_skip(
            store,
            &pending_url,
            resolver,
            SkipReason::AlreadyIndexed(link.url),
        );
    }

    let page = match fetcher.fetch(&link.url).await {
        Ok(page) => page,
        Err(e @ QuarryError::Body { .. }) => {
            tracing::warn!(url = %link.url, error = %e, "cannot read page body");
            return commit_skip(
                store,
                &pending_url,
                resolver,
                SkipReason::BodyUnreadable(link.url),
            );
        }
        Err(e) => return Err(e),
    };

    let size = page.body.len();
    let html = String::from_utf8_lossy(&page.body);
    let base = Url::parse(&link.url)?;
    let content = extract(&html, &base);

    // Child discovery: a failing child skips that child, never the step
    let mut outgoing = Vec::new();
    for anchor in &content.anchors {
        let child = match resolver.resolve(store, anchor).await {
            Ok(child) => child,
            Err(e) => {
                tracing::debug!(url = %anchor, error = %e, "unable to resolve child link, ignoring");
                continue;
            }
        };

        if !valid_link(&child) {
            continue;
        }

        resolver.add_edge(&link.url, &child.url)?;
        outgoing.push(child.url);
    }

    let (word_counts, length) = vectorize(&content.body_text());

    // ----- commit phase: one write transaction -----

    let staged = resolver.into_staged();
    let tx = store.tx()?;

    frontier::remove(&tx, &pending_url)?;
    write_staged_links(&tx, &staged)?;

    // Dedup state may have moved since the unlocked check
    if docs::contains_tx(&tx, &link.url)? {
        tx.commit()?;
        return Ok(StepOutcome::Skipped(SkipReason::AlreadyIndexed(link.url)));
    }

    let doc_keywords = keywords::apply_word_counts(&tx, &link.url, &word_counts, &mut stats)?;

    let doc = Document {
        url: link.url.clone(),
        title: content.title,
        size,
        length,
    };
    docs::put(&tx, &doc, &doc_keywords)?;

    for child in &outgoing {
        // Counted per attempt, not per new frontier entry
        stats.pending_count += 1;
        frontier::enqueue(&tx, child)?;
    }

    stats.document_count += 1;
    tx.put_json(Bucket::Stats, STATS_KEY, &stats)?;
    tx.commit()?;

    let summary = StepSummary {
        title: doc.title,
        url: doc.url,
        size,
        last_modified: link.last_modified,
        children: outgoing.len(),
        stats,
    };
    output::print_step_summary(&summary);

    Ok(StepOutcome::Committed(summary))
}

/// Commits a skipped step: the frontier entry is consumed and any link
/// records written during resolution persist, but no content is indexed.
fn commit_skip(
    store: &mut Store,
    pending_url: &str,
    resolver: LinkResolver<'_>,
    reason: SkipReason,
) -> Result<StepOutcome> {
    let staged = resolver.into_staged();

    let tx = store.tx()?;
    frontier::remove(&tx, pending_url)?;
    write_staged_links(&tx, &staged)?;
    tx.commit()?;

    tracing::info!(%reason, "step skipped");
    Ok(StepOutcome::Skipped(reason))
}

fn write_staged_links(tx: &StoreTx<'_>, staged: &[(String, Link)]) -> Result<()> {
    for (key, link) in staged {
        tx.put_json(Bucket::Links, key, link)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetcherConfig;

    const SEED: &str = "http://seed.test/";

    fn fetcher() -> Fetcher {
        Fetcher::new(&FetcherConfig {
            user_agent: "quarry-test/0.3".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn missing_stats_is_fatal() {
        let mut store = Store::open_in_memory().unwrap();
        let fetcher = fetcher();

        let result = crawl_step(&mut store, &fetcher, SEED).await;
        assert!(matches!(result, Err(QuarryError::MissingStats)));
    }

    #[tokio::test]
    async fn empty_frontier_seeds_and_fails() {
        let mut store = Store::open_in_memory().unwrap();
        init_corpus(&mut store, SEED).unwrap();

        // Drain the frontier so the step sees it empty
        let tx = store.tx().unwrap();
        frontier::remove(&tx, SEED).unwrap();
        tx.commit().unwrap();

        let fetcher = fetcher();
        let result = crawl_step(&mut store, &fetcher, SEED).await;
        assert!(matches!(result, Err(QuarryError::EmptyFrontier)));

        // The seed write survives the failing step and is counted like any
        // other enqueue attempt
        assert_eq!(frontier::peek(&store).unwrap(), Some(SEED.to_string()));
        let stats: CountStats = store.get_json(Bucket::Stats, STATS_KEY).unwrap().unwrap();
        assert_eq!(stats.pending_count, 2);
    }

    #[tokio::test]
    async fn init_corpus_is_idempotent() {
        let mut store = Store::open_in_memory().unwrap();

        let first = init_corpus(&mut store, SEED).unwrap();
        assert_eq!(first.pending_count, 1);

        // Mutate the counters, then re-init: nothing should reset
        let tx = store.tx().unwrap();
        let bumped = CountStats {
            document_count: 5,
            pending_count: 9,
            keyword_count: 2,
        };
        tx.put_json(Bucket::Stats, STATS_KEY, &bumped).unwrap();
        tx.commit().unwrap();

        let second = init_corpus(&mut store, SEED).unwrap();
        assert_eq!(second, bumped);
    }

    #[tokio::test]
    async fn malformed_pending_url_is_dropped() {
        let mut store = Store::open_in_memory().unwrap();
        init_corpus(&mut store, SEED).unwrap();

        let tx = store.tx().unwrap();
        frontier::remove(&tx, SEED).unwrap();
        frontier::enqueue(&tx, "::not a url::").unwrap();
        tx.commit().unwrap();

        let fetcher = fetcher();
        let outcome = crawl_step(&mut store, &fetcher, SEED).await.unwrap();
        assert!(matches!(
            outcome,
            StepOutcome::Skipped(SkipReason::MalformedUrl(_))
        ));

        // Dropped, not re-enqueued
        assert_eq!(frontier::peek(&store).unwrap(), None);

        // Counters untouched by a skipped step
        let stats: CountStats = store.get_json(Bucket::Stats, STATS_KEY).unwrap().unwrap();
        assert_eq!(stats.document_count, 0);
        assert_eq!(stats.pending_count, 1);
    }
}
