//! Persistent index components
//!
//! This module contains the data-structure side of the engine:
//! - Link store and link graph (resolve-or-create, redirect chasing, edges)
//! - Frontier of URLs awaiting crawl
//! - Inverted keyword index
//! - Document store

pub mod docs;
pub mod frontier;
pub mod keywords;
pub mod links;

pub use links::{normalize, valid_link, LinkResolver, MAX_REDIRECT_HOPS};
