// Internal modules
pub mod config;
pub mod generator;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod symbols;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use generator::{GenerationError, RpnGenerator};
pub use lexical::{LexError, Lexer};
pub use pipeline::{translate_source, translate_source_with_preferences};
pub use pipeline::{PipelineError, TranslationOutput, TranslationResult};
pub use symbols::{SymbolTable, SymbolTables};
pub use tokens::{Token, TokenCategory, TokenStream};
