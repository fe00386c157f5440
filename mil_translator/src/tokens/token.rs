//! Category-classified tokens backed by interning tables.
//!
//! A token is nothing but a category and an index into that category's
//! symbol table; the lexeme itself lives in the table. The category set is
//! a closed enum so that every dispatch over it is checked at compile time
//! instead of falling through a string-keyed lookup at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The six token categories, each owning one symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenCategory {
    /// Reserved words (`W`)
    Keyword,
    /// Operators (`O`)
    Operator,
    /// Separators (`R`)
    Separator,
    /// Identifiers, including the pre-seeded boolean literals (`I`)
    Identifier,
    /// Numeric constants (`N`)
    NumConst,
    /// Character/string constants, delimiters included (`C`)
    CharConst,
}

impl TokenCategory {
    /// Single-letter tag used in the rendered token listing.
    pub fn letter(self) -> char {
        match self {
            TokenCategory::Keyword => 'W',
            TokenCategory::Operator => 'O',
            TokenCategory::Separator => 'R',
            TokenCategory::Identifier => 'I',
            TokenCategory::NumConst => 'N',
            TokenCategory::CharConst => 'C',
        }
    }

    /// Human-readable table name, used in table listings and logs.
    pub fn table_name(self) -> &'static str {
        match self {
            TokenCategory::Keyword => "keywords",
            TokenCategory::Operator => "operators",
            TokenCategory::Separator => "separators",
            TokenCategory::Identifier => "identifiers",
            TokenCategory::NumConst => "numeric constants",
            TokenCategory::CharConst => "character constants",
        }
    }

    /// Categories whose tables grow during a run (cleared between runs).
    pub fn is_dynamic(self) -> bool {
        matches!(
            self,
            TokenCategory::Identifier | TokenCategory::NumConst | TokenCategory::CharConst
        )
    }

    /// All categories in a fixed order (static tables first).
    pub fn all() -> [TokenCategory; 6] {
        [
            TokenCategory::Keyword,
            TokenCategory::Operator,
            TokenCategory::Separator,
            TokenCategory::Identifier,
            TokenCategory::NumConst,
            TokenCategory::CharConst,
        ]
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One classified token: a category and an id into that category's table.
/// Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub category: TokenCategory,
    pub id: usize,
}

impl Token {
    pub fn new(category: TokenCategory, id: usize) -> Self {
        Self { category, id }
    }

    /// Identifier, numeric and character constants are emitted directly by
    /// the code generator; everything else is an operation or structure.
    pub fn is_constant_operand(&self) -> bool {
        matches!(
            self.category,
            TokenCategory::Identifier | TokenCategory::NumConst | TokenCategory::CharConst
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.category.letter(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_letters_are_the_contract_tags() {
        let letters: Vec<char> = TokenCategory::all().iter().map(|c| c.letter()).collect();
        assert_eq!(letters, vec!['W', 'O', 'R', 'I', 'N', 'C']);
    }

    #[test]
    fn dynamic_categories() {
        assert!(TokenCategory::Identifier.is_dynamic());
        assert!(TokenCategory::NumConst.is_dynamic());
        assert!(TokenCategory::CharConst.is_dynamic());
        assert!(!TokenCategory::Keyword.is_dynamic());
        assert!(!TokenCategory::Operator.is_dynamic());
        assert!(!TokenCategory::Separator.is_dynamic());
    }

    #[test]
    fn token_display_matches_listing_format() {
        let token = Token::new(TokenCategory::Identifier, 3);
        assert_eq!(token.to_string(), "(I, 3)");
    }

    #[test]
    fn constant_operands() {
        assert!(Token::new(TokenCategory::NumConst, 0).is_constant_operand());
        assert!(!Token::new(TokenCategory::Operator, 0).is_constant_operand());
        assert!(!Token::new(TokenCategory::Keyword, 0).is_constant_operand());
    }
}
