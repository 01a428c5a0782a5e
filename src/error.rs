//! Error types for the Scour library.
//!
//! All fallible operations return [`ScourError`] through the crate-wide
//! [`Result`] alias. Variants follow the failure classes the engine
//! distinguishes: I/O while reading documents or query files, bad seed URLs
//! and fetch failures while crawling, and misuse of the concurrency
//! primitives.
//!
//! # Examples
//!
//! ```
//! use scour::error::{Result, ScourError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(ScourError::invalid_argument("thread count must be at least 1"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Scour operations.
#[derive(Error, Debug)]
pub enum ScourError {
    /// I/O errors (document files, query files, output files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// A page could not be fetched or cleaned
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Release of a write lock by a thread that does not hold it
    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    /// Work submitted to a queue that has been shut down
    #[error("Work queue shut down: {0}")]
    QueueShutdown(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Directory walk errors
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// A seed URL could not be parsed
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with ScourError.
pub type Result<T> = std::result::Result<T, ScourError>;

impl ScourError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        ScourError::Analysis(msg.into())
    }

    /// Create a new fetch error.
    pub fn fetch<S: Into<String>>(msg: S) -> Self {
        ScourError::Fetch(msg.into())
    }

    /// Create a new lock misuse error.
    pub fn concurrent_modification<S: Into<String>>(msg: S) -> Self {
        ScourError::ConcurrentModification(msg.into())
    }

    /// Create a new queue shutdown error.
    pub fn queue_shutdown<S: Into<String>>(msg: S) -> Self {
        ScourError::QueueShutdown(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        ScourError::InvalidArgument(msg.into())
    }
}
