//! Suffix-list stemmer.

use super::Stemmer;

const DEFAULT_SUFFIXES: &[&str] = &[
    "ing", "ed", "er", "est", "ly", "s", "es", "ies", "ied", "tion", "sion", "able", "ible",
    "ment", "ness", "ful",
];

/// Removes the longest matching suffix from a fixed list, keeping at least
/// three characters of stem.
#[derive(Debug, Clone)]
pub struct SimpleStemmer {
    /// Sorted longest first.
    suffixes: Vec<String>,
}

impl SimpleStemmer {
    pub fn new() -> Self {
        Self::with_suffixes(DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_suffixes(mut suffixes: Vec<String>) -> Self {
        suffixes.sort_by_key(|s| std::cmp::Reverse(s.len()));
        SimpleStemmer { suffixes }
    }
}

impl Default for SimpleStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl Stemmer for SimpleStemmer {
    fn stem(&self, word: &str) -> String {
        let length = word.chars().count();
        if length <= 3 {
            return word.to_string();
        }

        for suffix in &self.suffixes {
            if let Some(stem) = word.strip_suffix(suffix.as_str()) {
                if stem.chars().count() > 2 {
                    return stem.to_string();
                }
            }
        }

        word.to_string()
    }

    fn name(&self) -> &'static str {
        "simple"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_stemmer() {
        let stemmer = SimpleStemmer::new();

        assert_eq!(stemmer.stem("running"), "runn");
        assert_eq!(stemmer.stem("flies"), "fli");
        assert_eq!(stemmer.stem("beautiful"), "beauti");
        assert_eq!(stemmer.stem("agreement"), "agree");
        assert_eq!(stemmer.stem("cat"), "cat");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let stemmer = SimpleStemmer::new();
        assert_eq!(stemmer.stem("éés"), "éés");
        assert_eq!(stemmer.stem("caféing"), "café");
    }
}
