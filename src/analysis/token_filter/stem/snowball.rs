//! Snowball English (Porter2) stemmer.
//!
//! # Examples
//!
//! ```
//! use scour::analysis::token_filter::stem::Stemmer;
//! use scour::analysis::token_filter::stem::snowball::SnowballStemmer;
//!
//! let stemmer = SnowballStemmer::english();
//!
//! assert_eq!(stemmer.stem("generously"), "generous");
//! assert_eq!(stemmer.stem("skies"), "sky");
//! ```

use std::fmt;

use rust_stemmers::{Algorithm, Stemmer as RustStemmer};

use crate::analysis::token_filter::stem::Stemmer;

/// Stemmer backed by the Snowball English algorithm.
pub struct SnowballStemmer {
    inner: RustStemmer,
}

impl SnowballStemmer {
    pub fn english() -> Self {
        SnowballStemmer {
            inner: RustStemmer::create(Algorithm::English),
        }
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowballStemmer")
            .field("algorithm", &"english")
            .finish()
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, word: &str) -> String {
        self.inner.stem(word).into_owned()
    }

    fn name(&self) -> &'static str {
        "english"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_stems() {
        let stemmer = SnowballStemmer::english();
        let pairs = [
            ("generously", "generous"),
            ("skies", "sky"),
            ("news", "news"),
            ("dying", "die"),
            ("running", "run"),
            ("cats", "cat"),
        ];
        for (word, expected) in pairs {
            assert_eq!(stemmer.stem(word), expected, "stemming {word}");
        }
    }

    #[test]
    fn test_non_ascii_word_is_stemmed_safely() {
        let stemmer = SnowballStemmer::english();
        assert!(!stemmer.stem("cafés").is_empty());
    }
}
