//! Fixed language vocabulary shared by the lexer and the code generator.

pub mod vocabulary;

pub use vocabulary::{
    is_operator_char, is_separator_char, BOOLEAN_LITERALS, KEYWORDS, KEYWORD_FUNCTION, OPERATORS,
    SEPARATORS,
};
