//! Crawler module: fetching, extraction and the step orchestrator
//!
//! - HTTP fetching with redirect reporting
//! - Document-order content extraction
//! - Text vectorization
//! - The atomic crawl step

mod extract;
mod fetcher;
mod step;
mod vectorizer;

pub use extract::{extract, PageContent};
pub use fetcher::{FetchedPage, Fetcher};
pub use step::{crawl_step, init_corpus, SkipReason, StepOutcome, StepSummary};
pub use vectorizer::vectorize;
