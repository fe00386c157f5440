//! The RPN generator: one pass, one explicit stack, no syntax tree.
//!
//! Operands are emitted the moment they are read; operators wait on the
//! stack until priority or a dedicated closer releases them; control
//! constructs ride the stack as markers carrying their own counters and
//! label numbers. Statement boundaries (`;`, `}`, end of input) resolve
//! pending conditionals and loops, so every reserved label is defined
//! exactly once and every branch reference has a target.

use crate::generator::priority::operation_priority;
use crate::generator::stack::{Marker, StackEntry};
use crate::grammar::vocabulary::KEYWORD_FUNCTION;
use crate::logging::codes;
use crate::symbols::SymbolTables;
use crate::tokens::{Token, TokenCategory, TokenStream};
use crate::{log_debug, log_error, log_success};

use crate::config::constants::compile_time::generator::{
    OUTPUT_BUFFER_CAPACITY, STACK_CAPACITY,
};

/// Code generation errors. All are terminal for the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// An operation token with no precedence entry (`%%`, `:`, `return`).
    #[error("unknown operation '{lexeme}'")]
    UnknownOperation { lexeme: String },

    /// `[` not preceded by an identifier or call target.
    #[error("'[' must follow an identifier")]
    IndexWithoutBase,

    /// A closer or boundary exhausted the stack without finding its opener.
    #[error("stack underflow while {context}")]
    StackUnderflow { context: String },

    /// A token id with no entry in its category table. Cannot happen for
    /// streams produced by the lexer that owns the tables.
    #[error("token ({category}, {id}) resolves to no table entry")]
    UnresolvedToken { category: TokenCategory, id: usize },
}

impl GenerationError {
    fn underflow(context: impl Into<String>) -> Self {
        GenerationError::StackUnderflow {
            context: context.into(),
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            GenerationError::UnknownOperation { .. } => codes::generation::UNKNOWN_OPERATION,
            GenerationError::IndexWithoutBase => codes::generation::INDEX_WITHOUT_BASE,
            GenerationError::StackUnderflow { .. } => codes::generation::STACK_UNDERFLOW,
            GenerationError::UnresolvedToken { .. } => codes::generation::UNRESOLVED_TOKEN,
        }
    }
}

/// Monotonic label numbering, starting at 1. Each construct reserves its
/// numbers once; nothing ever reads the counter ambiently.
#[derive(Debug, Clone, Copy)]
struct LabelCounter {
    next: u32,
}

impl LabelCounter {
    fn new() -> Self {
        Self { next: 1 }
    }

    fn reserve(&mut self) -> u32 {
        let number = self.next;
        self.next += 1;
        number
    }

    fn allocated(&self) -> u32 {
        self.next - 1
    }
}

/// Generates the postfix instruction text for one token stream. The
/// borrowed tables provide reverse lookup (category + id → lexeme).
pub struct RpnGenerator<'a> {
    tokens: &'a TokenStream,
    tables: &'a SymbolTables,
    stack: Vec<StackEntry>,
    output: Vec<String>,
    if_labels: LabelCounter,
    while_labels: LabelCounter,
}

impl<'a> RpnGenerator<'a> {
    pub fn new(tokens: &'a TokenStream, tables: &'a SymbolTables) -> Self {
        Self {
            tokens,
            tables,
            stack: Vec::with_capacity(STACK_CAPACITY),
            output: Vec::with_capacity(OUTPUT_BUFFER_CAPACITY),
            if_labels: LabelCounter::new(),
            while_labels: LabelCounter::new(),
        }
    }

    /// Translate the whole stream into `MAIN <instructions…> END`.
    ///
    /// Self-contained: stack, output and label counters reset first, so a
    /// generator instance can be reused for another run over the same
    /// borrowed stream.
    pub fn generate(&mut self) -> Result<String, GenerationError> {
        self.stack.clear();
        self.output.clear();
        self.if_labels = LabelCounter::new();
        self.while_labels = LabelCounter::new();

        log_debug!("Starting RPN generation", "token_count" => self.tokens.len());

        self.emit("MAIN");

        let tokens = self.tokens;
        let mut prev: Option<Token> = None;
        for (index, token) in tokens.iter().enumerate() {
            let token = *token;
            if self.is_operand(&token)? {
                let lexeme = self.resolve(&token)?.to_string();
                self.emit(&lexeme);
            } else if let Err(error) = self.process_operation(&token, prev, index) {
                log_error!(error.error_code(), "RPN generation failed",
                    "token_index" => index,
                    "detail" => error
                );
                return Err(error);
            }
            prev = Some(token);
        }

        if let Err(error) = self.flush_at_end() {
            log_error!(error.error_code(), "RPN generation failed at end of input",
                "detail" => error
            );
            return Err(error);
        }

        self.emit("END");

        log_success!(codes::success::GENERATION_COMPLETE,
            "RPN generation completed",
            "instruction_count" => self.output.len(),
            "if_labels" => self.if_labels.allocated(),
            "while_labels" => self.while_labels.allocated()
        );

        Ok(self.output.join(" "))
    }

    /// Instructions emitted by the most recent `generate`, `MAIN`/`END`
    /// included.
    pub fn instruction_count(&self) -> usize {
        self.output.len()
    }

    pub fn if_labels_allocated(&self) -> u32 {
        self.if_labels.allocated()
    }

    pub fn while_labels_allocated(&self) -> u32 {
        self.while_labels.allocated()
    }

    // ========================================================================
    // Token classification
    // ========================================================================

    fn resolve(&self, token: &Token) -> Result<&'a str, GenerationError> {
        let tables = self.tables;
        tables
            .lexeme(token.category, token.id)
            .ok_or(GenerationError::UnresolvedToken {
                category: token.category,
                id: token.id,
            })
    }

    /// Identifiers and constants are operands; so is the `function`
    /// keyword, which names a call target.
    fn is_operand(&self, token: &Token) -> Result<bool, GenerationError> {
        if token.is_constant_operand() {
            return Ok(true);
        }
        if token.category == TokenCategory::Keyword {
            return Ok(self.resolve(token)? == KEYWORD_FUNCTION);
        }
        Ok(false)
    }

    /// Can the previous token be the target of a call or index?
    fn is_callee(&self, prev: Option<Token>) -> Result<bool, GenerationError> {
        match prev {
            Some(token) if token.category == TokenCategory::Identifier => Ok(true),
            Some(token) if token.category == TokenCategory::Keyword => {
                Ok(self.resolve(&token)? == KEYWORD_FUNCTION)
            }
            _ => Ok(false),
        }
    }

    fn prev_keyword_is(&self, prev: Option<Token>, word: &str) -> Result<bool, GenerationError> {
        match prev {
            Some(token) if token.category == TokenCategory::Keyword => {
                Ok(self.resolve(&token)? == word)
            }
            _ => Ok(false),
        }
    }

    /// Lookahead used at statement boundaries: a pending conditional stays
    /// open when its `else` is the next token.
    fn next_is_else(&self, index: usize) -> bool {
        match self.tokens.get(index + 1) {
            Some(token) if token.category == TokenCategory::Keyword => {
                self.tables.lexeme(token.category, token.id) == Some("else")
            }
            _ => false,
        }
    }

    // ========================================================================
    // Operation dispatch
    // ========================================================================

    fn process_operation(
        &mut self,
        token: &Token,
        prev: Option<Token>,
        index: usize,
    ) -> Result<(), GenerationError> {
        let lexeme = self.resolve(token)?.to_string();

        // Every non-operand must have a precedence entry, even the ones
        // dispatched specially below.
        if operation_priority(&lexeme).is_none() {
            return Err(GenerationError::UnknownOperation { lexeme });
        }

        match lexeme.as_str() {
            "(" => self.open_paren(prev),
            ")" => self.close_paren(),
            "{" => {
                self.stack
                    .push(StackEntry::Marker(Marker::Block { statement_count: 0 }));
                Ok(())
            }
            "}" => self.close_block(self.next_is_else(index)),
            "[" => self.open_index(prev),
            "]" => self.close_index(),
            "," => self.next_call_operand(),
            ";" => {
                self.end_statement(self.next_is_else(index));
                Ok(())
            }
            "if" => {
                self.stack.push(StackEntry::Marker(Marker::If));
                Ok(())
            }
            "while" => {
                self.open_while();
                Ok(())
            }
            "else" => self.open_else(),
            _ => {
                self.push_operator(&lexeme);
                Ok(())
            }
        }
    }

    /// `(` is a call opener after an identifier, transparent after
    /// `if`/`while` (the condition merges with their marker), and a plain
    /// grouping symbol otherwise.
    fn open_paren(&mut self, prev: Option<Token>) -> Result<(), GenerationError> {
        if self.is_callee(prev)? {
            self.stack
                .push(StackEntry::Marker(Marker::Func { operand_count: 2 }));
        } else if self.prev_keyword_is(prev, "if")? || self.prev_keyword_is(prev, "while")? {
            // The construct marker is already on the stack.
        } else {
            self.stack.push(StackEntry::Symbol("(".to_string()));
        }
        Ok(())
    }

    fn close_paren(&mut self) -> Result<(), GenerationError> {
        loop {
            match self.stack.pop() {
                None => return Err(GenerationError::underflow("searching for '(' at ')'")),
                Some(StackEntry::Symbol(symbol)) if symbol == "(" => return Ok(()),
                Some(StackEntry::Symbol(symbol)) => self.emit(&symbol),
                Some(StackEntry::Marker(Marker::Func { operand_count })) => {
                    self.emit(&operand_count.to_string());
                    self.emit("FUNC");
                    return Ok(());
                }
                Some(StackEntry::Marker(Marker::If)) => {
                    // Condition closed: reserve the false-branch target and
                    // carry it until the construct's boundary defines it.
                    let end_label = self.if_labels.reserve();
                    self.emit(&format!("M{}", end_label));
                    self.emit("UPL");
                    self.stack
                        .push(StackEntry::Marker(Marker::WorkedIf { end_label }));
                    return Ok(());
                }
                Some(StackEntry::Marker(Marker::While { test_label })) => {
                    let exit_label = self.while_labels.reserve();
                    self.emit(&format!("W{}", exit_label));
                    self.emit("UPL");
                    self.stack.push(StackEntry::Marker(Marker::WorkedWhile {
                        test_label,
                        exit_label,
                    }));
                    return Ok(());
                }
                Some(StackEntry::Marker(Marker::WorkedIf { end_label })) => {
                    // A conditional completed inside grouping parentheses:
                    // drain to the real '(' and close the construct here.
                    loop {
                        match self.stack.pop() {
                            None => {
                                return Err(GenerationError::underflow("searching for '(' at ')'"))
                            }
                            Some(StackEntry::Symbol(symbol)) if symbol == "(" => break,
                            Some(StackEntry::Symbol(symbol)) => self.emit(&symbol),
                            Some(StackEntry::Marker(marker)) => {
                                return Err(GenerationError::underflow(format!(
                                    "searching for '(' at ')' past an open {}",
                                    marker.describe()
                                )))
                            }
                        }
                    }
                    self.emit(&format!("M{}:", end_label));
                    return Ok(());
                }
                Some(StackEntry::Marker(marker)) => {
                    return Err(GenerationError::underflow(format!(
                        "searching for '(' at ')' past an open {}",
                        marker.describe()
                    )))
                }
            }
        }
    }

    fn open_index(&mut self, prev: Option<Token>) -> Result<(), GenerationError> {
        if self.is_callee(prev)? {
            self.stack
                .push(StackEntry::Marker(Marker::Aem { operand_count: 2 }));
            Ok(())
        } else {
            Err(GenerationError::IndexWithoutBase)
        }
    }

    fn close_index(&mut self) -> Result<(), GenerationError> {
        loop {
            match self.stack.pop() {
                None => return Err(GenerationError::underflow("searching for '[' at ']'")),
                Some(StackEntry::Symbol(symbol)) if symbol != "(" => self.emit(&symbol),
                Some(StackEntry::Marker(Marker::Aem { operand_count })) => {
                    self.emit(&operand_count.to_string());
                    self.emit("AEM");
                    return Ok(());
                }
                Some(_) => return Err(GenerationError::underflow("searching for '[' at ']'")),
            }
        }
    }

    /// `,` bumps the operand counter of the innermost open call or index.
    fn next_call_operand(&mut self) -> Result<(), GenerationError> {
        loop {
            let top_is_plain_symbol = matches!(
                self.stack.last(),
                Some(StackEntry::Symbol(symbol)) if symbol != "("
            );
            if top_is_plain_symbol {
                if let Some(StackEntry::Symbol(symbol)) = self.stack.pop() {
                    self.emit(&symbol);
                }
                continue;
            }
            return match self.stack.last_mut() {
                Some(StackEntry::Marker(
                    Marker::Func { operand_count } | Marker::Aem { operand_count },
                )) => {
                    *operand_count += 1;
                    Ok(())
                }
                _ => Err(GenerationError::underflow(
                    "searching for an open call or index at ','",
                )),
            };
        }
    }

    fn open_while(&mut self) {
        let test_label = self.while_labels.reserve();
        self.emit(&format!("W{}:", test_label));
        self.stack
            .push(StackEntry::Marker(Marker::While { test_label }));
    }

    /// `else`: jump over the else-body from the taken branch, define the
    /// false-branch target here, and re-aim the marker at the join label.
    fn open_else(&mut self) -> Result<(), GenerationError> {
        loop {
            let top_is_plain_symbol = matches!(
                self.stack.last(),
                Some(StackEntry::Symbol(symbol)) if symbol != "("
            );
            if !top_is_plain_symbol {
                break;
            }
            if let Some(StackEntry::Symbol(symbol)) = self.stack.pop() {
                self.emit(&symbol);
            }
        }
        match self.stack.pop() {
            Some(StackEntry::Marker(Marker::WorkedIf { end_label })) => {
                let join_label = self.if_labels.reserve();
                self.emit(&format!("M{}", join_label));
                self.emit("BP");
                self.emit(&format!("M{}:", end_label));
                self.stack.push(StackEntry::Marker(Marker::WorkedIf {
                    end_label: join_label,
                }));
                Ok(())
            }
            _ => Err(GenerationError::underflow(
                "searching for an open conditional at 'else'",
            )),
        }
    }

    /// `;`: emit the statement's dangling operators, resolve constructs
    /// whose body just ended, then count the statement for the enclosing
    /// block.
    fn end_statement(&mut self, next_is_else: bool) {
        loop {
            let top_is_plain_symbol = matches!(
                self.stack.last(),
                Some(StackEntry::Symbol(symbol)) if symbol != "("
            );
            if top_is_plain_symbol {
                if let Some(StackEntry::Symbol(symbol)) = self.stack.pop() {
                    self.emit(&symbol);
                }
                continue;
            }
            match self.stack.last() {
                Some(StackEntry::Marker(Marker::WorkedWhile {
                    test_label,
                    exit_label,
                })) => {
                    let (test_label, exit_label) = (*test_label, *exit_label);
                    self.stack.pop();
                    self.complete_while(test_label, exit_label);
                }
                Some(StackEntry::Marker(Marker::WorkedIf { end_label })) if !next_is_else => {
                    let end_label = *end_label;
                    self.stack.pop();
                    self.emit(&format!("M{}:", end_label));
                }
                _ => break,
            }
        }
        if let Some(StackEntry::Marker(Marker::Block { statement_count })) = self.stack.last_mut()
        {
            *statement_count += 1;
        }
    }

    fn close_block(&mut self, next_is_else: bool) -> Result<(), GenerationError> {
        loop {
            match self.stack.pop() {
                None => return Err(GenerationError::underflow("searching for '{' at '}'")),
                Some(StackEntry::Symbol(symbol)) if symbol != "(" => self.emit(&symbol),
                Some(StackEntry::Symbol(_)) => {
                    return Err(GenerationError::underflow(
                        "searching for '{' at '}' past an unmatched '('",
                    ))
                }
                Some(StackEntry::Marker(Marker::WorkedIf { end_label })) => {
                    self.emit(&format!("M{}:", end_label));
                }
                Some(StackEntry::Marker(Marker::WorkedWhile {
                    test_label,
                    exit_label,
                })) => self.complete_while(test_label, exit_label),
                Some(StackEntry::Marker(Marker::Block { statement_count })) => {
                    self.emit(&statement_count.to_string());
                    self.emit("BLOCK");
                    break;
                }
                Some(StackEntry::Marker(marker)) => {
                    return Err(GenerationError::underflow(format!(
                        "searching for '{{' at '}}' past an open {}",
                        marker.describe()
                    )))
                }
            }
        }
        // A block close is itself a statement boundary for any
        // single-statement construct body it terminates.
        self.resolve_boundary(next_is_else);
        Ok(())
    }

    /// Complete pending conditionals/loops sitting on top of the stack.
    fn resolve_boundary(&mut self, next_is_else: bool) {
        loop {
            match self.stack.last() {
                Some(StackEntry::Marker(Marker::WorkedWhile {
                    test_label,
                    exit_label,
                })) => {
                    let (test_label, exit_label) = (*test_label, *exit_label);
                    self.stack.pop();
                    self.complete_while(test_label, exit_label);
                }
                Some(StackEntry::Marker(Marker::WorkedIf { end_label })) if !next_is_else => {
                    let end_label = *end_label;
                    self.stack.pop();
                    self.emit(&format!("M{}:", end_label));
                }
                _ => break,
            }
        }
    }

    /// Ordinary operator: pop while the stack top binds at least as
    /// tightly (left-associative tie-break), then push.
    fn push_operator(&mut self, lexeme: &str) {
        let priority = operation_priority(lexeme).unwrap_or(0);
        while self
            .stack
            .last()
            .map_or(false, |top| top.priority() >= priority)
        {
            match self.stack.pop() {
                Some(StackEntry::Symbol(symbol)) => self.emit(&symbol),
                Some(entry) => {
                    self.stack.push(entry);
                    break;
                }
                None => break,
            }
        }
        self.stack.push(StackEntry::Symbol(lexeme.to_string()));
    }

    /// End of input flushes like a block close; unterminated grouping
    /// constructs have no closer coming and fail here.
    fn flush_at_end(&mut self) -> Result<(), GenerationError> {
        while let Some(entry) = self.stack.pop() {
            match entry {
                StackEntry::Symbol(symbol) if symbol != "(" => self.emit(&symbol),
                StackEntry::Symbol(_) => {
                    return Err(GenerationError::underflow(
                        "flushing an unmatched '(' at end of input",
                    ))
                }
                StackEntry::Marker(Marker::WorkedIf { end_label }) => {
                    self.emit(&format!("M{}:", end_label));
                }
                StackEntry::Marker(Marker::WorkedWhile {
                    test_label,
                    exit_label,
                }) => self.complete_while(test_label, exit_label),
                StackEntry::Marker(Marker::Block { statement_count }) => {
                    self.emit(&statement_count.to_string());
                    self.emit("BLOCK");
                }
                StackEntry::Marker(marker) => {
                    return Err(GenerationError::underflow(format!(
                        "flushing an unterminated {} at end of input",
                        marker.describe()
                    )))
                }
            }
        }
        Ok(())
    }

    /// Loop closure: branch back to the test, then define the exit.
    fn complete_while(&mut self, test_label: u32, exit_label: u32) {
        self.emit(&format!("W{}", test_label));
        self.emit("BP");
        self.emit(&format!("W{}:", exit_label));
    }

    fn emit(&mut self, instruction: &str) {
        self.output.push(instruction.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::Lexer;
    use assert_matches::assert_matches;
    use std::collections::{HashMap, HashSet};

    fn rpn(source: &str) -> String {
        let mut lexer = Lexer::new();
        let stream = lexer.run(source).expect("lexing should succeed");
        let mut generator = RpnGenerator::new(&stream, lexer.tables());
        generator.generate().expect("generation should succeed")
    }

    fn rpn_error(source: &str) -> GenerationError {
        let mut lexer = Lexer::new();
        let stream = lexer.run(source).expect("lexing should succeed");
        let mut generator = RpnGenerator::new(&stream, lexer.tables());
        generator
            .generate()
            .expect_err("generation should fail")
    }

    /// Every `M<k>`/`W<k>` reference must have exactly one `M<k>:`/`W<k>:`
    /// definition, and no label may be defined twice.
    fn assert_labels_well_formed(instructions: &str) {
        let mut definitions: HashMap<&str, usize> = HashMap::new();
        let mut references: HashSet<String> = HashSet::new();
        for word in instructions.split_whitespace() {
            let is_label_shape = |s: &str| {
                (s.starts_with('M') || s.starts_with('W'))
                    && s.len() > 1
                    && s[1..].chars().all(|c| c.is_ascii_digit())
            };
            if let Some(def) = word.strip_suffix(':') {
                if is_label_shape(def) {
                    *definitions.entry(def).or_insert(0) += 1;
                }
            } else if is_label_shape(word) {
                references.insert(word.to_string());
            }
        }
        for (label, count) in &definitions {
            assert_eq!(*count, 1, "label {} defined {} times", label, count);
        }
        for reference in &references {
            assert!(
                definitions.contains_key(reference.as_str()),
                "reference to undefined label {} in: {}",
                reference,
                instructions
            );
        }
    }

    #[test]
    fn empty_input_yields_the_program_skeleton() {
        assert_eq!(rpn(""), "MAIN END");
        assert_eq!(rpn("   # comments only\n"), "MAIN END");
    }

    #[test]
    fn operands_emit_in_order_operators_by_priority() {
        assert_eq!(rpn("x = a + b * c;"), "MAIN x a b c * + = END");
    }

    #[test]
    fn equal_priorities_pop_left_associatively() {
        assert_eq!(rpn("r = a - b + c;"), "MAIN r a b - c + = END");
    }

    #[test]
    fn parentheses_override_priority() {
        assert_eq!(rpn("r = (a + b) * c;"), "MAIN r a b + c * = END");
    }

    #[test]
    fn boolean_ladder_binds_below_comparisons() {
        assert_eq!(rpn("c = a & b | !d;"), "MAIN c a b & d ! | = END");
        assert_eq!(rpn("t = a < b & b <= c;"), "MAIN t a b < b c <= & = END");
    }

    #[test]
    fn both_assignment_operators_generate() {
        assert_eq!(rpn("x = 1;"), "MAIN x 1 = END");
        assert_eq!(rpn("x <- 1;"), "MAIN x 1 <- END");
    }

    #[test]
    fn character_constants_are_operands_with_delimiters() {
        assert_eq!(rpn("s = 'hi';"), "MAIN s 'hi' = END");
    }

    #[test]
    fn call_without_arguments_emits_the_seed_count() {
        assert_eq!(rpn("f();"), "MAIN f 2 FUNC END");
    }

    #[test]
    fn call_count_is_seed_plus_one_per_comma() {
        assert_eq!(rpn("f(a, b, c);"), "MAIN f a b c 4 FUNC END");
    }

    #[test]
    fn nested_calls_close_inner_first() {
        assert_eq!(rpn("f(a, g(b));"), "MAIN f a g b 2 FUNC 3 FUNC END");
    }

    #[test]
    fn commas_flush_argument_expressions() {
        assert_eq!(rpn("f(a + 1, b);"), "MAIN f a 1 + b 3 FUNC END");
    }

    #[test]
    fn function_keyword_is_a_call_target() {
        assert_eq!(rpn("function(x);"), "MAIN function x 2 FUNC END");
    }

    #[test]
    fn array_element_access() {
        assert_eq!(rpn("x[i + 1] = 0;"), "MAIN x i 1 + 2 AEM 0 = END");
        assert_eq!(rpn("m[i, j];"), "MAIN m i j 3 AEM END");
    }

    #[test]
    fn conditional_without_else_defines_its_label_at_the_boundary() {
        let instructions = rpn("if (a == b) x = 1;");
        assert_eq!(instructions, "MAIN a b == M1 UPL x 1 = M1: END");
        assert_labels_well_formed(&instructions);
    }

    #[test]
    fn conditional_with_else_blocks() {
        let instructions = rpn("if (a == b) { c; } else { d; }");
        assert_eq!(
            instructions,
            "MAIN a b == M1 UPL c 1 BLOCK M2 BP M1: d 1 BLOCK M2: END"
        );
        assert_labels_well_formed(&instructions);
    }

    #[test]
    fn conditional_with_else_single_statements() {
        let instructions = rpn("if (a) x = 1; else y = 2;");
        assert_eq!(instructions, "MAIN a M1 UPL x 1 = M2 BP M1: y 2 = M2: END");
        assert_labels_well_formed(&instructions);
    }

    #[test]
    fn while_loop_branches_back_and_defines_an_exit() {
        let instructions = rpn("while (a < 10) { a = a + 1; }");
        assert_eq!(
            instructions,
            "MAIN W1: a 10 < W2 UPL a a 1 + = 1 BLOCK W1 BP W2: END"
        );
        assert_labels_well_formed(&instructions);
    }

    #[test]
    fn while_with_single_statement_body() {
        let instructions = rpn("while (a) x = x - 1;");
        assert_eq!(instructions, "MAIN W1: a W2 UPL x x 1 - = W1 BP W2: END");
        assert_labels_well_formed(&instructions);
    }

    #[test]
    fn nested_constructs_keep_their_own_labels() {
        let instructions =
            rpn("if (a) { if (b) { c; } else { d; } } while (e) { f; }");
        assert_eq!(
            instructions,
            "MAIN a M1 UPL b M2 UPL c 1 BLOCK M3 BP M2: d 1 BLOCK M3: 0 BLOCK M1: \
             W1: e W2 UPL f 1 BLOCK W1 BP W2: END"
        );
        assert_labels_well_formed(&instructions);
    }

    #[test]
    fn nested_whiles() {
        let instructions = rpn("while (a) { while (b) { x; } }");
        assert_eq!(
            instructions,
            "MAIN W1: a W2 UPL W3: b W4 UPL x 1 BLOCK W3 BP W4: 0 BLOCK W1 BP W2: END"
        );
        assert_labels_well_formed(&instructions);
    }

    #[test]
    fn dangling_else_binds_to_the_nearest_conditional() {
        let instructions = rpn("if (a) if (b) x = 1; else y = 2;");
        assert_eq!(
            instructions,
            "MAIN a M1 UPL b M2 UPL x 1 = M3 BP M2: y 2 = M3: M1: END"
        );
        assert_labels_well_formed(&instructions);
    }

    #[test]
    fn conditional_inside_grouping_parentheses() {
        let instructions = rpn("(if (a) b)");
        assert_eq!(instructions, "MAIN a M1 UPL b M1: END");
        assert_labels_well_formed(&instructions);
    }

    #[test]
    fn blocks_count_their_statements() {
        assert_eq!(rpn("{ }"), "MAIN 0 BLOCK END");
        assert_eq!(rpn("{ a = 1; b = 2; }"), "MAIN a 1 = b 2 = 2 BLOCK END");
    }

    #[test]
    fn operations_without_priority_fail() {
        assert_matches!(
            rpn_error("a %% b;"),
            GenerationError::UnknownOperation { lexeme } if lexeme == "%%"
        );
        assert_matches!(
            rpn_error("return x;"),
            GenerationError::UnknownOperation { lexeme } if lexeme == "return"
        );
    }

    #[test]
    fn index_requires_a_base() {
        assert_matches!(rpn_error("[1];"), GenerationError::IndexWithoutBase);
        assert_matches!(rpn_error("(a)[0];"), GenerationError::IndexWithoutBase);
    }

    #[test]
    fn unclosed_bracket_is_a_stack_underflow() {
        assert_matches!(rpn_error("x[0"), GenerationError::StackUnderflow { .. });
    }

    #[test]
    fn unbalanced_closers_underflow() {
        assert_matches!(rpn_error("a);"), GenerationError::StackUnderflow { .. });
        assert_matches!(rpn_error("}"), GenerationError::StackUnderflow { .. });
        assert_matches!(rpn_error("x = (a;"), GenerationError::StackUnderflow { .. });
    }

    #[test]
    fn else_without_conditional_underflows() {
        assert_matches!(rpn_error("else x;"), GenerationError::StackUnderflow { .. });
    }

    #[test]
    fn comma_outside_call_or_index_underflows() {
        assert_matches!(rpn_error("a, b;"), GenerationError::StackUnderflow { .. });
    }

    #[test]
    fn generation_is_deterministic() {
        let source = "while (i < n) { s = s + v[i]; i = i + 1; }";
        assert_eq!(rpn(source), rpn(source));
    }

    #[test]
    fn generator_instance_resets_between_runs() {
        let mut lexer = Lexer::new();
        let stream = lexer.run("if (a) x = 1;").expect("lex");
        let mut generator = RpnGenerator::new(&stream, lexer.tables());
        let first = generator.generate().expect("first run");
        let second = generator.generate().expect("second run");
        assert_eq!(first, second);
        assert_eq!(generator.if_labels_allocated(), 1);
    }
}
