//! Token types produced by lexical analysis.

pub mod token;
pub mod token_stream;

pub use token::{Token, TokenCategory};
pub use token_stream::TokenStream;
