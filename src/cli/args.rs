//! Command line argument parsing for the scour CLI using clap.

use std::path::PathBuf;

use clap::Parser;

use crate::analysis::StemmerKind;
use crate::config::DEFAULT_THREADS;

/// Default output file for `--counts` without a value.
pub const DEFAULT_COUNTS_PATH: &str = "counts.json";

/// Default output file for `--index` without a value.
pub const DEFAULT_INDEX_PATH: &str = "index.json";

/// Default output file for `--results` without a value.
pub const DEFAULT_RESULTS_PATH: &str = "results.json";

/// scour - build an inverted index from text files or a web crawl and run
/// ranked queries against it
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "scour")]
#[command(about = "Build an inverted index from text files or a web crawl and search it")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ScourArgs {
    /// Text file or directory of text files to index
    #[arg(long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Run multithreaded, optionally with the number of workers
    #[arg(long, value_name = "N", num_args = 0..=1)]
    pub threads: Option<Option<String>>,

    /// Seed URL to crawl (implies --threads)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Maximum number of distinct URLs to crawl
    #[arg(long, value_name = "N")]
    pub limit: Option<String>,

    /// Write word counts per location
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = DEFAULT_COUNTS_PATH)]
    pub counts: Option<PathBuf>,

    /// Write the inverted index
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = DEFAULT_INDEX_PATH)]
    pub index: Option<PathBuf>,

    /// File with one query per line
    #[arg(long, value_name = "FILE")]
    pub query: Option<PathBuf>,

    /// Match query words exactly instead of by prefix
    #[arg(long)]
    pub exact: bool,

    /// Write query results
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = DEFAULT_RESULTS_PATH)]
    pub results: Option<PathBuf>,

    /// JSON engine configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Stemmer applied to documents and queries
    #[arg(long, value_enum)]
    pub stemmer: Option<StemmerKind>,

    /// Save the finished index as a snapshot
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Load a snapshot before building
    #[arg(long, value_name = "FILE")]
    pub restore: Option<PathBuf>,

    /// Verbosity level (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,
}

impl ScourArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n.saturating_add(1),
            }
        }
    }

    /// Whether the threaded pipelines should be used.
    pub fn is_threaded(&self) -> bool {
        self.threads.is_some() || self.url.is_some()
    }

    /// Worker count given on the command line, if any.
    ///
    /// A bare `--threads` names no count and leaves the configured one in
    /// place. An unparsable or zero value falls back to the default.
    pub fn thread_count(&self) -> Option<usize> {
        self.threads
            .as_ref()
            .and_then(|value| value.as_deref())
            .map(|value| positive_or(Some(value), DEFAULT_THREADS))
    }

    /// Crawl limit requested on the command line, falling back to `default`.
    pub fn crawl_limit(&self, default: usize) -> usize {
        positive_or(self.limit.as_deref(), default)
    }
}

fn positive_or(value: Option<&str>, default: usize) -> usize {
    value
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(default)
}
