//! Text analysis: turns raw text into the normalized words that are indexed
//! and searched.

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::TextAnalyzer;
pub use token_filter::stem::StemmerKind;
