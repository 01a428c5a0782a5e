//! Query processing and ranked results.
//!
//! - [`result`] - [`SearchResult`] and the ranking order
//! - [`query`] - query handlers that turn query lines into cached result lists

pub mod query;
pub mod result;

pub use query::{QueryHandler, QueryProcessor, ThreadedQueryHandler, query_key};
pub use result::SearchResult;
