//! Ordered token sequence for one translation run.

use crate::tokens::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The tokens of one run, in source order. Cleared together with the
/// dynamic tables at the start of each run, so ids in here are only
/// meaningful against the tables of the same run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Render as the host-facing listing: `(W, 0) (I, 2) …`.
    pub fn to_listing(&self) -> String {
        let rendered: Vec<String> = self.tokens.iter().map(Token::to_string).collect();
        rendered.join(" ")
    }
}

impl fmt::Display for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_listing())
    }
}
