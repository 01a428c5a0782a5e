//! Stemming token filter and stemmer implementations.

use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::Filter;
use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for stemming algorithms.
pub trait Stemmer: Send + Sync {
    /// Stem a lowercase word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

pub mod identity;
pub mod porter;
pub mod simple;
pub mod snowball;

pub use identity::IdentityStemmer;
pub use porter::PorterStemmer;
pub use simple::SimpleStemmer;
pub use snowball::SnowballStemmer;

/// Stemming algorithm selectable from configuration and the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StemmerKind {
    /// Snowball English (Porter2).
    #[default]
    English,
    /// Porter (1980) suffix stripping.
    Porter,
    /// Strip a fixed list of common English suffixes.
    Simple,
    /// Leave words unchanged.
    Identity,
}

impl StemmerKind {
    /// Instantiate the stemmer this kind names.
    pub fn build(self) -> Arc<dyn Stemmer> {
        match self {
            StemmerKind::English => Arc::new(SnowballStemmer::english()),
            StemmerKind::Porter => Arc::new(PorterStemmer::new()),
            StemmerKind::Simple => Arc::new(SimpleStemmer::new()),
            StemmerKind::Identity => Arc::new(IdentityStemmer::new()),
        }
    }
}

impl fmt::Display for StemmerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StemmerKind::English => "english",
            StemmerKind::Porter => "porter",
            StemmerKind::Simple => "simple",
            StemmerKind::Identity => "identity",
        };
        f.write_str(name)
    }
}

/// Filter that applies a [`Stemmer`] to every token.
#[derive(Clone)]
pub struct StemFilter {
    stemmer: Arc<dyn Stemmer>,
}

impl fmt::Debug for StemFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StemFilter")
            .field("stemmer", &self.stemmer.name())
            .finish()
    }
}

impl StemFilter {
    /// Create a stem filter with the default (Snowball English) stemmer.
    pub fn new() -> Self {
        Self::from_kind(StemmerKind::default())
    }

    pub fn from_kind(kind: StemmerKind) -> Self {
        Self::with_stemmer(kind.build())
    }

    pub fn with_stemmer(stemmer: Arc<dyn Stemmer>) -> Self {
        StemFilter { stemmer }
    }

    pub fn stemmer_name(&self) -> &'static str {
        self.stemmer.name()
    }
}

impl Default for StemFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StemFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let stemmer = Arc::clone(&self.stemmer);
        Ok(Box::new(tokens.map(move |token| {
            let stemmed = stemmer.stem(&token.text);
            token.with_text(stemmed)
        })))
    }

    fn name(&self) -> &'static str {
        "stem"
    }
}
