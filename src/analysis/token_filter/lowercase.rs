use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Converts token text to lowercase.
///
/// ASCII tokens take the fast path; anything else uses full Unicode case
/// mapping.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|mut token| {
            if token.text.is_ascii() {
                token.text.make_ascii_lowercase();
                token
            } else {
                let lowered = token.text.to_lowercase();
                token.with_text(lowered)
            }
        })))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::{Token, into_stream};

    #[test]
    fn test_lowercase_mixed_scripts() {
        let filter = LowercaseFilter::new();
        let tokens = vec![Token::new("QUICK", 0), Token::new("ÉCOLE", 1)];

        let result: Vec<Token> = filter.filter(into_stream(tokens)).unwrap().collect();

        assert_eq!(result[0].text, "quick");
        assert_eq!(result[1].text, "école");
    }
}
