//! Finite-state lexical analyzer.
//!
//! The scanner walks the source one character at a time through an explicit
//! state machine. Many transitions discover a token boundary only upon
//! seeing the first character of the *next* token; those transitions defer
//! the character, and the driver loop re-presents it to the new state until
//! some transition consumes it. Every arm below therefore answers two
//! questions: what state comes next, and whether the character was consumed.

use crate::config::constants::compile_time::lexical::{
    LEXEME_BUFFER_CAPACITY, TOKEN_BUFFER_CAPACITY,
};
use crate::config::runtime::LexicalPreferences;
use crate::grammar::vocabulary::{is_operator_char, is_separator_char};
use crate::logging::codes;
use crate::symbols::SymbolTables;
use crate::tokens::{Token, TokenCategory, TokenStream};
use crate::utils::Position;
use crate::{log_debug, log_error, log_success};
use std::collections::HashMap;

/// Lexical analysis errors. Both variants carry the lexeme accumulated so
/// far and the position of the offending character (for end of input, one
/// past the last character).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("invalid character at {position}: stuck on '{partial_lexeme}'")]
    InvalidCharacter {
        partial_lexeme: String,
        position: Position,
    },

    #[error("unexpected end of input at {position}: unfinished '{partial_lexeme}'")]
    UnexpectedEndOfInput {
        partial_lexeme: String,
        position: Position,
    },
}

impl LexError {
    pub fn partial_lexeme(&self) -> &str {
        match self {
            LexError::InvalidCharacter { partial_lexeme, .. }
            | LexError::UnexpectedEndOfInput { partial_lexeme, .. } => partial_lexeme,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            LexError::InvalidCharacter { position, .. }
            | LexError::UnexpectedEndOfInput { position, .. } => *position,
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexError::UnexpectedEndOfInput { .. } => codes::lexical::UNEXPECTED_END_OF_INPUT,
        }
    }
}

/// Token counts collected during one run.
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub operator_tokens: usize,
    pub separator_tokens: usize,
    pub identifier_tokens: usize,
    pub num_const_tokens: usize,
    pub char_const_tokens: usize,
    pub comment_count: usize,
    pub max_lexeme_length: usize,

    // Preference-controlled metrics
    pub operator_usage_patterns: HashMap<String, usize>,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token, lexeme: &str, preferences: &LexicalPreferences) {
        self.total_tokens += 1;
        self.max_lexeme_length = self.max_lexeme_length.max(lexeme.chars().count());

        match token.category {
            TokenCategory::Keyword => self.keyword_tokens += 1,
            TokenCategory::Operator => {
                self.operator_tokens += 1;
                if preferences.track_operator_patterns {
                    *self
                        .operator_usage_patterns
                        .entry(lexeme.to_string())
                        .or_insert(0) += 1;
                }
            }
            TokenCategory::Separator => self.separator_tokens += 1,
            TokenCategory::Identifier => self.identifier_tokens += 1,
            TokenCategory::NumConst => self.num_const_tokens += 1,
            TokenCategory::CharConst => self.char_const_tokens += 1,
        }
    }

    fn record_comment(&mut self) {
        self.comment_count += 1;
    }
}

/// Scanner states. The conceptual ERROR state is an `Err` return from
/// `step`, not a variant: the machine never continues past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexerState {
    Start,
    Identifier,
    IntConst,
    /// After the decimal point of a numeric constant
    FixedConst,
    /// After `e`/`E`; accepts one optional sign, then demands a digit
    FloatingSign {
        sign_seen: bool,
    },
    /// Exponent digits
    FloatingSection,
    /// Inside `'…'`
    StringConst1,
    /// Inside `"…"`
    StringConst2,
    Operator,
    Comment,
}

/// Whether a transition consumed the current character or left it for the
/// new state to reprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Advance {
    Consumed,
    Deferred,
}

/// The lexer. One instance owns the six symbol tables; each `run` is a
/// self-contained translation that resets the dynamic tables first.
pub struct Lexer {
    tables: SymbolTables,
    tokens: Vec<Token>,
    state: LexerState,
    current_word: String,
    position: Position,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl Lexer {
    /// Build a lexer with the static vocabularies interned deterministically.
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            tables: SymbolTables::new(),
            tokens: Vec::with_capacity(TOKEN_BUFFER_CAPACITY),
            state: LexerState::Start,
            current_word: String::with_capacity(LEXEME_BUFFER_CAPACITY),
            position: Position::start(),
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    /// Scan `source` into a token stream, populating the dynamic tables.
    ///
    /// Carriage returns are treated as whitespace and an implicit newline is
    /// appended, so a trailing comment or pending token always flushes. The
    /// run fails when the machine hits an unclassifiable character or when
    /// input ends while the machine is outside its initial state.
    pub fn run(&mut self, source: &str) -> Result<TokenStream, LexError> {
        self.reset();

        log_debug!("Starting lexical analysis",
            "char_count" => source.chars().count()
        );

        let mut text = source.replace('\r', " ");
        text.push('\n');

        for c in text.chars() {
            loop {
                match self.step(c) {
                    Ok(Advance::Consumed) => {
                        self.position = self.position.advance(c);
                        break;
                    }
                    Ok(Advance::Deferred) => continue,
                    Err(error) => {
                        self.log_failure(&error);
                        return Err(error);
                    }
                }
            }
        }

        if self.state != LexerState::Start {
            let error = LexError::UnexpectedEndOfInput {
                partial_lexeme: self.current_word.clone(),
                position: self.position,
            };
            self.log_failure(&error);
            return Err(error);
        }

        log_success!(codes::success::TOKENIZATION_COMPLETE,
            "Lexical analysis completed",
            "token_count" => self.tokens.len(),
            "keywords" => self.metrics.keyword_tokens,
            "operators" => self.metrics.operator_tokens,
            "separators" => self.metrics.separator_tokens,
            "identifiers" => self.metrics.identifier_tokens,
            "numeric_constants" => self.metrics.num_const_tokens,
            "character_constants" => self.metrics.char_const_tokens,
            "comments" => self.metrics.comment_count
        );

        Ok(TokenStream::new(std::mem::take(&mut self.tokens)))
    }

    /// The six tables of the most recent run.
    pub fn tables(&self) -> &SymbolTables {
        &self.tables
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    fn reset(&mut self) {
        self.tables.reset_dynamic();
        self.tokens.clear();
        self.state = LexerState::Start;
        self.current_word.clear();
        self.position = Position::start();
        self.metrics = LexicalMetrics::default();
    }

    fn log_failure(&self, error: &LexError) {
        if self.preferences.include_position_in_errors {
            log_error!(error.error_code(), "Lexical analysis failed",
                "position" => error.position(),
                "offset" => error.position().offset,
                "partial_lexeme" => error.partial_lexeme(),
                "tokens_scanned" => self.tokens.len()
            );
        } else {
            log_error!(error.error_code(), "Lexical analysis failed",
                "partial_lexeme" => error.partial_lexeme()
            );
        }
    }

    // ========================================================================
    // Transition function
    // ========================================================================

    fn step(&mut self, c: char) -> Result<Advance, LexError> {
        match self.state {
            LexerState::Start => self.step_start(c),

            LexerState::Identifier => {
                if c.is_alphanumeric() || c == '_' || c == '.' {
                    self.current_word.push(c);
                    Ok(Advance::Consumed)
                } else if is_operator_char(c) || is_separator_char(c) {
                    self.emit_word();
                    self.state = LexerState::Start;
                    Ok(Advance::Deferred)
                } else if c.is_whitespace() {
                    self.emit_word();
                    self.state = LexerState::Start;
                    Ok(Advance::Consumed)
                } else {
                    Err(self.invalid_character())
                }
            }

            LexerState::IntConst => {
                if c.is_numeric() {
                    self.current_word.push(c);
                    Ok(Advance::Consumed)
                } else if c == '.' {
                    self.current_word.push(c);
                    self.state = LexerState::FixedConst;
                    Ok(Advance::Consumed)
                } else if c == 'e' || c == 'E' {
                    self.current_word.push(c);
                    self.state = LexerState::FloatingSign { sign_seen: false };
                    Ok(Advance::Consumed)
                } else {
                    self.finish_number(c)
                }
            }

            LexerState::FixedConst => {
                if c.is_numeric() {
                    self.current_word.push(c);
                    Ok(Advance::Consumed)
                } else if c == 'e' || c == 'E' {
                    self.current_word.push(c);
                    self.state = LexerState::FloatingSign { sign_seen: false };
                    Ok(Advance::Consumed)
                } else {
                    self.finish_number(c)
                }
            }

            LexerState::FloatingSign { sign_seen } => {
                if c.is_numeric() {
                    self.current_word.push(c);
                    self.state = LexerState::FloatingSection;
                    Ok(Advance::Consumed)
                } else if (c == '+' || c == '-') && !sign_seen {
                    self.current_word.push(c);
                    self.state = LexerState::FloatingSign { sign_seen: true };
                    Ok(Advance::Consumed)
                } else {
                    // Exponent sign position with no digit following
                    Err(self.invalid_character())
                }
            }

            LexerState::FloatingSection => {
                if c.is_numeric() {
                    self.current_word.push(c);
                    Ok(Advance::Consumed)
                } else {
                    self.finish_number(c)
                }
            }

            LexerState::StringConst1 => {
                self.current_word.push(c);
                if c == '\'' {
                    self.emit_char_const();
                    self.state = LexerState::Start;
                }
                Ok(Advance::Consumed)
            }

            LexerState::StringConst2 => {
                self.current_word.push(c);
                if c == '"' {
                    self.emit_char_const();
                    self.state = LexerState::Start;
                }
                Ok(Advance::Consumed)
            }

            LexerState::Operator => {
                if is_operator_char(c) {
                    self.current_word.push(c);
                    Ok(Advance::Consumed)
                } else if is_separator_char(c) || c.is_alphanumeric() {
                    self.emit_operator()?;
                    self.state = LexerState::Start;
                    Ok(Advance::Deferred)
                } else if c.is_whitespace() {
                    self.emit_operator()?;
                    self.state = LexerState::Start;
                    Ok(Advance::Consumed)
                } else {
                    Err(self.invalid_character())
                }
            }

            LexerState::Comment => {
                if c == '\n' {
                    self.metrics.record_comment();
                    self.state = LexerState::Start;
                }
                Ok(Advance::Consumed)
            }
        }
    }

    fn step_start(&mut self, c: char) -> Result<Advance, LexError> {
        // Quote characters are separator vocabulary entries, but in the
        // initial state they open a literal instead of producing a token.
        if c == '\'' {
            self.begin_word(c);
            self.state = LexerState::StringConst1;
            Ok(Advance::Consumed)
        } else if c == '"' {
            self.begin_word(c);
            self.state = LexerState::StringConst2;
            Ok(Advance::Consumed)
        } else if c == '#' {
            self.state = LexerState::Comment;
            Ok(Advance::Consumed)
        } else if c.is_alphabetic() {
            self.begin_word(c);
            self.state = LexerState::Identifier;
            Ok(Advance::Consumed)
        } else if c.is_numeric() {
            self.begin_word(c);
            self.state = LexerState::IntConst;
            Ok(Advance::Consumed)
        } else if is_operator_char(c) {
            self.begin_word(c);
            self.state = LexerState::Operator;
            Ok(Advance::Consumed)
        } else if is_separator_char(c) {
            self.begin_word(c);
            self.emit_separator()?;
            Ok(Advance::Consumed)
        } else if c.is_whitespace() {
            Ok(Advance::Consumed)
        } else {
            self.begin_word(c);
            Err(self.invalid_character())
        }
    }

    /// Shared tail for the numeric states: a separator or operator
    /// character ends the constant and is reprocessed; whitespace ends it
    /// and is swallowed; anything else is unclassifiable.
    fn finish_number(&mut self, c: char) -> Result<Advance, LexError> {
        if is_operator_char(c) || is_separator_char(c) {
            self.emit_num_const();
            self.state = LexerState::Start;
            Ok(Advance::Deferred)
        } else if c.is_whitespace() {
            self.emit_num_const();
            self.state = LexerState::Start;
            Ok(Advance::Consumed)
        } else {
            Err(self.invalid_character())
        }
    }

    // ========================================================================
    // Token emission and classification
    // ========================================================================

    fn begin_word(&mut self, c: char) {
        self.current_word.clear();
        self.current_word.push(c);
    }

    fn push_token(&mut self, category: TokenCategory, id: usize) {
        let token = Token::new(category, id);
        let lexeme = self.current_word.clone();
        self.metrics.record_token(&token, &lexeme, &self.preferences);
        self.tokens.push(token);
    }

    /// Keyword lookup takes priority over identifier interning.
    fn emit_word(&mut self) {
        if let Some(id) = self.tables.keywords.id_of(&self.current_word) {
            self.push_token(TokenCategory::Keyword, id);
        } else {
            let id = self.tables.identifiers.intern(&self.current_word);
            self.push_token(TokenCategory::Identifier, id);
        }
    }

    fn emit_num_const(&mut self) {
        let id = self.tables.num_consts.intern(&self.current_word);
        self.push_token(TokenCategory::NumConst, id);
    }

    fn emit_char_const(&mut self) {
        let id = self.tables.char_consts.intern(&self.current_word);
        self.push_token(TokenCategory::CharConst, id);
    }

    /// An accumulated operator sequence must resolve against the static
    /// table; `<=-` and friends are maximal-munch overreach and fail here.
    fn emit_operator(&mut self) -> Result<(), LexError> {
        match self.tables.operators.id_of(&self.current_word) {
            Some(id) => {
                self.push_token(TokenCategory::Operator, id);
                Ok(())
            }
            None => Err(self.invalid_character()),
        }
    }

    fn emit_separator(&mut self) -> Result<(), LexError> {
        match self.tables.separators.id_of(&self.current_word) {
            Some(id) => {
                self.push_token(TokenCategory::Separator, id);
                Ok(())
            }
            None => Err(self.invalid_character()),
        }
    }

    fn invalid_character(&self) -> LexError {
        LexError::InvalidCharacter {
            partial_lexeme: self.current_word.clone(),
            position: self.position,
        }
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}
