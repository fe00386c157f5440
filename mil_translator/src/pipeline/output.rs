//! The rendered outputs the host layer displays.

use crate::lexical::Lexer;
use crate::tokens::TokenStream;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Host-facing renderings of one translation: the token listing, the six
/// symbol tables in id order, and the instruction text.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationOutput {
    pub tokens: String,
    pub keyword_table: String,
    pub operator_table: String,
    pub separator_table: String,
    pub identifier_table: String,
    pub num_const_table: String,
    pub char_const_table: String,
    pub instructions: String,
    pub generated_at: DateTime<Utc>,
}

impl TranslationOutput {
    pub fn new(lexer: &Lexer, stream: &TokenStream, instructions: String) -> Self {
        let tables = lexer.tables();
        Self {
            tokens: stream.to_listing(),
            keyword_table: tables.keywords.to_listing(),
            operator_table: tables.operators.to_listing(),
            separator_table: tables.separators.to_listing(),
            identifier_table: tables.identifiers.to_listing(),
            num_const_table: tables.num_consts.to_listing(),
            char_const_table: tables.char_consts.to_listing(),
            instructions,
            generated_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
