//! Console reporting
//!
//! Line-oriented progress and statistics output. Not part of correctness;
//! every terminal step prints a structured summary and `--stats` dumps the
//! corpus counters alongside actual bucket sizes.

mod report;

pub use report::{load_report, print_report, print_step_summary, CorpusReport};
