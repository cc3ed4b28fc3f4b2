//! Link store and link graph
//!
//! Resolve-or-create semantics: looking up a URL returns its canonical
//! `Link` record, chasing stored redirect markers and fetching the URL over
//! the network the first time it is seen. Resolution runs during the
//! unlocked fetch phase of a step; every record it creates or mutates is
//! staged in memory and written by the step's commit transaction.

use crate::crawler::Fetcher;
use crate::model::Link;
use crate::storage::{Bucket, Store};
use crate::{QuarryError, Result};
use std::collections::{BTreeSet, HashMap};
use url::Url;

/// Upper bound on stored-redirect hops chased per resolution.
///
/// Redirect markers in the store can form cycles (A -> B -> A); resolution
/// fails closed past the cap instead of recursing forever.
pub const MAX_REDIRECT_HOPS: usize = 8;

/// Strips the fragment: URLs differing only by fragment are the same resource.
pub fn normalize(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

/// Validity filter: accept iff the scheme is http/https, the status code is
/// in [200, 299) and the content type contains "html" (case-sensitive, as
/// received). Rejected links stay in the link store but are excluded from
/// indexing and the graph.
pub fn valid_link(link: &Link) -> bool {
    let scheme_ok = Url::parse(&link.url)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !scheme_ok {
        tracing::debug!(url = %link.url, "ignoring url with unknown scheme");
        return false;
    }

    if link.status_code < 200 || link.status_code >= 299 {
        tracing::debug!(url = %link.url, status = link.status_code, "page not found");
        return false;
    }

    if !link.content_type.contains("html") {
        tracing::debug!(
            url = %link.url,
            content_type = %link.content_type,
            "non html file, ignoring"
        );
        return false;
    }

    true
}

/// Resolves URLs to canonical `Link` records, staging every new or mutated
/// record for the commit phase.
pub struct LinkResolver<'a> {
    fetcher: &'a Fetcher,
    /// Records loaded or created during this step, keyed by their store key
    cache: HashMap<String, Link>,
    /// Keys whose records must be written at commit
    dirty: BTreeSet<String>,
}

impl<'a> LinkResolver<'a> {
    pub fn new(fetcher: &'a Fetcher) -> Self {
        Self {
            fetcher,
            cache: HashMap::new(),
            dirty: BTreeSet::new(),
        }
    }

    /// Returns the canonical link record for `url`, creating it if needed.
    ///
    /// Stored redirect markers are chased iteratively up to
    /// [`MAX_REDIRECT_HOPS`]. A URL never seen before is fetched over the
    /// network; on success a record is staged under the final URL, plus a
    /// redirect marker under the requested URL when the two differ. On fetch
    /// failure nothing is staged and the error propagates.
    pub async fn resolve(&mut self, store: &Store, url: &Url) -> Result<Link> {
        let mut current = normalize(url);

        for _ in 0..MAX_REDIRECT_HOPS {
            if let Some(link) = self.lookup(store, current.as_str())? {
                if link.redirect {
                    current = normalize(&Url::parse(&link.url)?);
                    continue;
                }
                return Ok(link);
            }

            // First sighting: hit the network
            let page = self.fetcher.fetch(current.as_str()).await?;
            let final_url = normalize(&page.final_url);

            let link = Link::new(
                final_url.to_string(),
                page.status,
                page.content_type,
                page.last_modified,
            );
            self.stage(final_url.to_string(), link.clone());

            if final_url.as_str() != current.as_str() {
                self.stage(
                    current.as_str().to_string(),
                    Link::redirect_to(final_url.to_string()),
                );
            }

            return Ok(link);
        }

        Err(QuarryError::RedirectLimit {
            url: url.to_string(),
            hops: MAX_REDIRECT_HOPS,
        })
    }

    /// Registers a directed edge parent -> child, updating both endpoints'
    /// records symmetrically.
    ///
    /// Both endpoints must already be resolved through this resolver and
    /// pass the validity filter; violating either precondition is an error
    /// rather than a silent graph pollution.
    pub fn add_edge(&mut self, parent: &str, child: &str) -> Result<()> {
        let endpoint_ok = |link: Option<&Link>| link.map(valid_link).unwrap_or(false);

        if !endpoint_ok(self.cache.get(parent)) || !endpoint_ok(self.cache.get(child)) {
            return Err(QuarryError::InvalidEdge {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }

        if let Some(p) = self.cache.get_mut(parent) {
            p.outgoing.insert(child.to_string());
        }
        if let Some(c) = self.cache.get_mut(child) {
            c.incoming.insert(parent.to_string());
        }

        self.dirty.insert(parent.to_string());
        self.dirty.insert(child.to_string());
        Ok(())
    }

    /// Hands over every staged record for the commit transaction, in key order.
    pub fn into_staged(self) -> Vec<(String, Link)> {
        let LinkResolver { cache, dirty, .. } = self;
        dirty
            .into_iter()
            .filter_map(|key| cache.get(&key).cloned().map(|link| (key, link)))
            .collect()
    }

    fn lookup(&mut self, store: &Store, key: &str) -> Result<Option<Link>> {
        if let Some(link) = self.cache.get(key) {
            return Ok(Some(link.clone()));
        }

        match store.get_json::<Link>(Bucket::Links, key)? {
            Some(link) => {
                // Cached clean; edge insertion may dirty it later
                self.cache.insert(key.to_string(), link.clone());
                Ok(Some(link))
            }
            None => Ok(None),
        }
    }

    fn stage(&mut self, key: String, link: Link) {
        self.dirty.insert(key.clone());
        self.cache.insert(key, link);
    }
}
