//! Quarry: the crawl/index engine of a small web search service
//!
//! This crate implements the single-step crawl transaction: dequeue a URL
//! from the frontier, resolve it through the persistent link store, fetch
//! and extract its content, update the inverted keyword index, and commit
//! everything atomically (or nothing at all).

pub mod config;
pub mod crawler;
pub mod index;
pub mod model;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for Quarry operations
#[derive(Debug, Error)]
pub enum QuarryError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error for {url}: {source}")]
    Fetch {
        url: String,
        source: reqwest::Error,
    },

    #[error("Failed to read body of {url}: {source}")]
    Body {
        url: String,
        source: reqwest::Error,
    },

    #[error("Redirect chain exceeded {hops} hops starting at {url}")]
    RedirectLimit { url: String, hops: usize },

    #[error("Edge endpoints must pass the validity filter: {parent} -> {child}")]
    InvalidEdge { parent: String, child: String },

    #[error("Corpus statistics record not found; store is uninitialized or corrupt")]
    MissingStats,

    #[error("Frontier is empty; seeded the default URL")]
    EmptyFrontier,

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Quarry operations
pub type Result<T> = std::result::Result<T, QuarryError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl_step, init_corpus, Fetcher, SkipReason, StepOutcome, StepSummary};
pub use model::{CountStats, Document, DocumentRef, Keyword, KeywordRef, Link};
pub use storage::{Bucket, Store};
