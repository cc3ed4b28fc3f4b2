//! Quarry main entry point
//!
//! Thin driver around the crawl step: loads configuration, opens the store,
//! and repeatedly invokes the step until the configured limit is reached or
//! a step fails.

use anyhow::Context;
use clap::Parser;
use quarry::config::load_config;
use quarry::crawler::{crawl_step, init_corpus, Fetcher, StepOutcome};
use quarry::output::{load_report, print_report};
use quarry::storage::Store;
use quarry::QuarryError;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Quarry: crawl/index engine of a small web search service
#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(version)]
#[command(about = "Crawl pages one atomic step at a time", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Initialize the corpus (counters + seed) and exit
    #[arg(long, conflicts_with = "stats")]
    init: bool,

    /// Show corpus statistics and exit
    #[arg(long, conflicts_with = "init")]
    stats: bool,

    /// Number of crawl steps to run (overrides the config)
    #[arg(long, value_name = "N")]
    steps: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let mut store = Store::open(Path::new(&config.engine.database_path))
        .with_context(|| format!("failed to open store at {}", config.engine.database_path))?;

    if cli.init {
        let stats = init_corpus(&mut store, &config.engine.seed_url)?;
        println!(
            "Corpus initialized: {} pending, {} documents, {} keywords",
            stats.pending_count, stats.document_count, stats.keyword_count
        );
        return Ok(());
    }

    if cli.stats {
        let report = load_report(&store)?;
        print_report(&report);
        return Ok(());
    }

    let max_steps = cli.steps.unwrap_or(config.engine.max_steps);
    run_steps(&mut store, &config, max_steps).await
}

/// Runs crawl steps until the limit is reached or a step fails.
async fn run_steps(
    store: &mut Store,
    config: &quarry::Config,
    max_steps: u64,
) -> anyhow::Result<()> {
    let fetcher = Fetcher::new(&config.fetcher).context("failed to build HTTP client")?;

    let mut committed = 0u64;
    let mut skipped = 0u64;
    let mut step = 0u64;

    loop {
        if max_steps > 0 && step >= max_steps {
            tracing::info!(committed, skipped, "step limit reached");
            break;
        }
        step += 1;

        match crawl_step(store, &fetcher, &config.engine.seed_url).await {
            Ok(StepOutcome::Committed(_)) => committed += 1,
            Ok(StepOutcome::Skipped(reason)) => {
                skipped += 1;
                tracing::debug!(%reason, "skipped");
            }
            Err(QuarryError::EmptyFrontier) => {
                tracing::info!("frontier exhausted; seed enqueued for the next run");
                break;
            }
            Err(e) => {
                tracing::error!(error = %e, "crawl step failed");
                return Err(e.into());
            }
        }
    }

    tracing::info!(committed, skipped, "crawl finished");
    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quarry=info,warn"),
            1 => EnvFilter::new("quarry=debug,info"),
            2 => EnvFilter::new("quarry=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
