use unicode_normalization::UnicodeNormalization;

use super::CharFilter;

/// Decomposes text to NFD and keeps only alphabetic and whitespace characters.
///
/// Combining marks split off by the decomposition are not alphabetic, so
/// accented letters collapse to their base letter. Punctuation and digits are
/// removed without leaving a gap, which joins the parts of "don't" or
/// "e-mail" into one word.
#[derive(Clone, Debug, Default)]
pub struct AlphabeticCharFilter;

impl AlphabeticCharFilter {
    pub fn new() -> Self {
        AlphabeticCharFilter
    }
}

impl CharFilter for AlphabeticCharFilter {
    fn filter(&self, input: &str) -> String {
        input
            .nfd()
            .filter(|c| c.is_alphabetic() || c.is_whitespace())
            .collect()
    }

    fn name(&self) -> &'static str {
        "alphabetic"
    }
}
