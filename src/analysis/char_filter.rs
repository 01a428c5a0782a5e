//! Char filters rewrite raw text before it reaches the tokenizer.
//!
//! - [`alphabetic::AlphabeticCharFilter`] - canonical decomposition, then drop
//!   everything that is neither a letter nor whitespace

/// Trait for filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod alphabetic;
