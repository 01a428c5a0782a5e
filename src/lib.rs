//! # Scour
//!
//! Builds an inverted index over text files or a web crawl and answers
//! ranked multi-word queries against it.
//!
//! ## Features
//!
//! - Word to location to position inverted index with per-location word counts
//! - Exact and prefix search ranked by match density
//! - Thread-safe index behind an owner-tracking reader/writer lock
//! - Worker pool whose completion barrier covers recursively submitted work
//! - Multithreaded directory indexing and bounded web crawling
//! - Pluggable text analysis with Snowball English stemming by default

pub mod analysis;
pub mod builder;
pub mod cli;
pub mod config;
pub mod crawler;
pub mod error;
pub mod index;
pub mod json;
pub mod search;
pub mod sync;

pub mod prelude {
    pub use crate::analysis::{StemmerKind, TextAnalyzer};
    pub use crate::builder::{IndexBuilder, ThreadedIndexBuilder};
    pub use crate::config::EngineConfig;
    pub use crate::crawler::WebCrawler;
    pub use crate::error::{Result, ScourError};
    pub use crate::index::{ConcurrentIndex, InvertedIndex};
    pub use crate::search::{QueryHandler, QueryProcessor, SearchResult, ThreadedQueryHandler};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
