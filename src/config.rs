//! Engine configuration.
//!
//! Every setting has a default, so a configuration file only needs the keys
//! it wants to change:
//!
//! ```
//! use scour::analysis::StemmerKind;
//! use scour::config::EngineConfig;
//!
//! let config: EngineConfig = serde_json::from_str(r#"{ "threads": 8, "stemmer": "simple" }"#).unwrap();
//! assert_eq!(config.threads, 8);
//! assert_eq!(config.stemmer, StemmerKind::Simple);
//! assert_eq!(config.crawl_limit, 50);
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::StemmerKind;
use crate::error::{Result, ScourError};

/// Worker count used when none is given or the given one is unusable.
pub const DEFAULT_THREADS: usize = 5;

/// Maximum number of distinct URLs a crawl visits by default.
pub const DEFAULT_CRAWL_LIMIT: usize = 50;

/// Configuration shared by the builders, the query handlers and the crawler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of worker threads for the threaded pipelines.
    pub threads: usize,

    /// Stemmer applied to documents and queries.
    pub stemmer: StemmerKind,

    /// Maximum number of distinct URLs visited by a crawl.
    pub crawl_limit: usize,

    /// Maximum number of redirects followed per fetch.
    pub redirect_limit: usize,

    /// Per-request timeout for fetches, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            stemmer: StemmerKind::default(),
            crawl_limit: DEFAULT_CRAWL_LIMIT,
            redirect_limit: 3,
            fetch_timeout_secs: 10,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: EngineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(ScourError::invalid_argument(
                "threads must be at least 1",
            ));
        }
        if self.crawl_limit == 0 {
            return Err(ScourError::invalid_argument(
                "crawl_limit must be at least 1",
            ));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
