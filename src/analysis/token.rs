//! Token types flowing through the analysis pipeline.
//!
//! # Examples
//!
//! ```
//! use scour::analysis::token::Token;
//!
//! let token = Token::with_offsets("world", 1, 6, 11);
//! assert_eq!(token.text, "world");
//! assert_eq!(token.start_offset, 6);
//! ```

use serde::{Deserialize, Serialize};

/// A single unit of text produced by a tokenizer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The token's text content.
    pub text: String,

    /// Position in the token stream (0-based).
    pub position: usize,

    /// Byte offset where this token starts in the filtered text.
    pub start_offset: usize,

    /// Byte offset where this token ends in the filtered text.
    pub end_offset: usize,
}

impl Token {
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Self::with_offsets(text, position, 0, 0)
    }

    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
        }
    }

    /// Replace the text, keeping position and offsets.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A boxed stream of tokens.
pub type TokenStream = Box<dyn Iterator<Item = Token> + Send>;

/// Box a vector of tokens as a stream.
pub fn into_stream(tokens: Vec<Token>) -> TokenStream {
    Box::new(tokens.into_iter())
}
