//! Inverted index storage.
//!
//! - [`inverted`] - single-threaded word to location to positions index
//! - [`concurrent`] - the same index behind a reader/writer lock

pub mod concurrent;
pub mod inverted;

pub use concurrent::ConcurrentIndex;
pub use inverted::InvertedIndex;
