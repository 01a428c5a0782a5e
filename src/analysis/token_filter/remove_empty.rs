use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Removes tokens whose text is empty.
///
/// Runs last in a pipeline so tokens emptied by earlier filters never reach
/// the index.
#[derive(Clone, Debug, Default)]
pub struct RemoveEmptyFilter;

impl RemoveEmptyFilter {
    pub fn new() -> Self {
        RemoveEmptyFilter
    }
}

impl Filter for RemoveEmptyFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.filter(|token| !token.is_empty())))
    }

    fn name(&self) -> &'static str {
        "remove_empty"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::{Token, into_stream};

    #[test]
    fn test_remove_empty() {
        let filter = RemoveEmptyFilter::new();
        let tokens = vec![Token::new("valid", 0), Token::new("", 1), Token::new("kept", 2)];

        let result: Vec<Token> = filter.filter(into_stream(tokens)).unwrap().collect();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "valid");
        assert_eq!(result[1].text, "kept");
    }
}
