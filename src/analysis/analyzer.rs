//! Text analyzer combining char filters, a tokenizer and token filters.
//!
//! The analyzer applies processing in this order:
//! 1. Char filters normalize the raw text
//! 2. The tokenizer splits it into tokens
//! 3. Token filters run in the order they were added
//!
//! [`TextAnalyzer::standard`] builds the pipeline used for both documents and
//! queries: NFD decomposition keeping only letters and whitespace, Unicode word
//! splitting, lowercasing, stemming, and removal of empty tokens.
//!
//! # Examples
//!
//! ```
//! use scour::analysis::{StemmerKind, TextAnalyzer};
//!
//! let analyzer = TextAnalyzer::standard(StemmerKind::Porter);
//!
//! let words = analyzer.analyze("The Dogs were RUNNING!").unwrap();
//! assert_eq!(words, vec!["the", "dog", "were", "run"]);
//!
//! let stems = analyzer.unique_stems("dogs dog Dog").unwrap();
//! assert_eq!(stems.len(), 1);
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::analysis::char_filter::CharFilter;
use crate::analysis::char_filter::alphabetic::AlphabeticCharFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::remove_empty::RemoveEmptyFilter;
use crate::analysis::token_filter::stem::{StemFilter, StemmerKind};
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
use crate::config::EngineConfig;
use crate::error::Result;

/// A configurable analysis pipeline. Cloning shares the stages.
#[derive(Clone)]
pub struct TextAnalyzer {
    char_filters: Vec<Arc<dyn CharFilter>>,
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
}

impl TextAnalyzer {
    /// A pipeline with only a tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        TextAnalyzer {
            char_filters: Vec::new(),
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// The standard document and query pipeline with the given stemmer.
    pub fn standard(stemmer: StemmerKind) -> Self {
        Self::new(Arc::new(UnicodeWordTokenizer::new()))
            .add_char_filter(Arc::new(AlphabeticCharFilter::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(StemFilter::from_kind(stemmer)))
            .add_filter(Arc::new(RemoveEmptyFilter::new()))
    }

    /// The standard pipeline with the stemmer named by `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::standard(config.stemmer)
    }

    pub fn add_char_filter(mut self, char_filter: Arc<dyn CharFilter>) -> Self {
        self.char_filters.push(char_filter);
        self
    }

    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Run the full pipeline.
    pub fn tokens(&self, text: &str) -> Result<TokenStream> {
        let mut filtered = None;
        for char_filter in &self.char_filters {
            let input = filtered.as_deref().unwrap_or(text);
            filtered = Some(char_filter.filter(input));
        }

        let mut tokens = self
            .tokenizer
            .tokenize(filtered.as_deref().unwrap_or(text))?;
        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }

        Ok(tokens)
    }

    /// Normalized words of `text` in order, duplicates kept.
    pub fn analyze(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.tokens(text)?.map(|token| token.text).collect())
    }

    /// Distinct normalized words of `text`, sorted.
    pub fn unique_stems(&self, text: &str) -> Result<BTreeSet<String>> {
        Ok(self.tokens(text)?.map(|token| token.text).collect())
    }
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::standard(StemmerKind::default())
    }
}

impl fmt::Debug for TextAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextAnalyzer")
            .field(
                "char_filters",
                &self.char_filters.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_pipeline() {
        let analyzer = TextAnalyzer::standard(StemmerKind::Porter);
        let words = analyzer.analyze("Hello, WORLD! Café-au-lait 42 times.").unwrap();

        assert_eq!(words, vec!["hello", "world", "cafeaulait", "time"]);
    }

    #[test]
    fn test_blank_text_is_empty() {
        let analyzer = TextAnalyzer::default();
        assert!(analyzer.analyze("  ... 123 ").unwrap().is_empty());
        assert!(analyzer.unique_stems("").unwrap().is_empty());
    }

    #[test]
    fn test_unique_stems_sorted_and_deduplicated() {
        let analyzer = TextAnalyzer::standard(StemmerKind::Porter);
        let stems = analyzer.unique_stems("zebras Apple apples zebra").unwrap();

        assert_eq!(
            stems.into_iter().collect::<Vec<_>>(),
            vec!["appl".to_string(), "zebra".to_string()]
        );
    }

    #[test]
    fn test_identity_stemmer_keeps_words() {
        let analyzer = TextAnalyzer::standard(StemmerKind::Identity);
        assert_eq!(analyzer.analyze("Running dogs").unwrap(), vec!["running", "dogs"]);
    }

    #[test]
    fn test_from_config_uses_configured_stemmer() {
        let config = EngineConfig {
            stemmer: StemmerKind::Simple,
            ..EngineConfig::default()
        };
        let analyzer = TextAnalyzer::from_config(&config);
        assert_eq!(analyzer.analyze("running").unwrap(), vec!["runn"]);
    }
}
