//! Step summaries and corpus statistics

use crate::crawler::StepSummary;
use crate::model::CountStats;
use crate::storage::{Bucket, Store, STATS_KEY};
use crate::{QuarryError, Result};

/// Snapshot of the corpus for the `--stats` mode
#[derive(Debug, Clone)]
pub struct CorpusReport {
    /// Counters as maintained by crawl steps
    pub stats: CountStats,

    /// Actual bucket sizes
    pub pending_urls: u64,
    pub documents: u64,
    pub links: u64,
    pub keywords: u64,
}

/// Loads a corpus report from the store.
pub fn load_report(store: &Store) -> Result<CorpusReport> {
    let stats: CountStats = store
        .get_json(Bucket::Stats, STATS_KEY)?
        .ok_or(QuarryError::MissingStats)?;

    Ok(CorpusReport {
        stats,
        pending_urls: store.count(Bucket::Pending)?,
        documents: store.count(Bucket::Docs)?,
        links: store.count(Bucket::Links)?,
        keywords: store.count(Bucket::Keywords)?,
    })
}

/// Prints the human-readable summary of a committed step.
pub fn print_step_summary(summary: &StepSummary) {
    println!("---------------------------------------------");
    println!("Title         : {}", summary.title);
    println!("Url           : {}", summary.url);
    println!("Size          : {}", summary.size);
    println!("Last Modified : {}", summary.last_modified);
    println!("Children      : {}", summary.children);
    println!();
    println!("Documents Indexed : {}", summary.stats.document_count);
    println!("Documents Left    : {}", summary.stats.pending_count);
    println!("Keywords Indexed  : {}", summary.stats.keyword_count);
}

/// Prints corpus statistics to stdout.
pub fn print_report(report: &CorpusReport) {
    println!("=== Corpus Statistics ===\n");

    println!("Counters:");
    println!("  Documents indexed: {}", report.stats.document_count);
    println!("  URLs pending:      {}", report.stats.pending_count);
    println!("  Keywords indexed:  {}", report.stats.keyword_count);
    println!();

    println!("Store:");
    println!("  Frontier entries:  {}", report.pending_urls);
    println!("  Documents:         {}", report.documents);
    println!("  Link records:      {}", report.links);
    println!("  Keyword records:   {}", report.keywords);
}
