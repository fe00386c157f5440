//! Lexical analysis: finite-state scanner over MIL source text.

pub mod analyzer;

pub use analyzer::{LexError, Lexer, LexicalMetrics};
