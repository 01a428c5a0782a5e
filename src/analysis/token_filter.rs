//! Token filters transform the stream produced by a tokenizer.
//!
//! - [`lowercase::LowercaseFilter`] - converts tokens to lowercase
//! - [`stem::StemFilter`] - reduces words to their stem form
//! - [`remove_empty::RemoveEmptyFilter`] - removes empty tokens
//!
//! # Examples
//!
//! ```
//! use scour::analysis::token::{Token, into_stream};
//! use scour::analysis::token_filter::Filter;
//! use scour::analysis::token_filter::lowercase::LowercaseFilter;
//!
//! let filter = LowercaseFilter::new();
//! let tokens = vec![Token::new("Hello", 0), Token::new("WORLD", 1)];
//! let filtered: Vec<_> = filter.filter(into_stream(tokens)).unwrap().collect();
//!
//! assert_eq!(filtered[0].text, "hello");
//! assert_eq!(filtered[1].text, "world");
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter.
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod remove_empty;
pub mod stem;
