//! Symbol tables: bijective lexeme ↔ id interning, one table per category.
//!
//! Static tables (keywords, operators, separators) are built once from the
//! fixed vocabularies, ids assigned by declaration order. Dynamic tables
//! (identifiers, numeric constants, character constants) grow monotonically
//! within one run and are reset between runs.

use crate::grammar::vocabulary::{BOOLEAN_LITERALS, KEYWORDS, OPERATORS, SEPARATORS};
use crate::tokens::TokenCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

/// One interning table. `ids` answers lexeme → id; `lexemes` answers
/// id → lexeme and fixes the iteration order, so renderings and reverse
/// lookups never depend on hash order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    ids: HashMap<String, usize>,
    lexemes: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a static table from a fixed vocabulary, ids in declaration order.
    pub fn from_vocabulary(entries: &[&str]) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.intern(entry);
        }
        table
    }

    /// Return the id for `lexeme`, inserting it with the next sequential id
    /// on first sighting.
    pub fn intern(&mut self, lexeme: &str) -> usize {
        if let Some(&id) = self.ids.get(lexeme) {
            return id;
        }
        let id = self.lexemes.len();
        self.ids.insert(lexeme.to_string(), id);
        self.lexemes.push(lexeme.to_string());
        id
    }

    pub fn id_of(&self, lexeme: &str) -> Option<usize> {
        self.ids.get(lexeme).copied()
    }

    pub fn contains(&self, lexeme: &str) -> bool {
        self.ids.contains_key(lexeme)
    }

    pub fn lexeme(&self, id: usize) -> Option<&str> {
        self.lexemes.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lexemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexemes.is_empty()
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.lexemes
            .iter()
            .enumerate()
            .map(|(id, lexeme)| (lexeme.as_str(), id))
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.lexemes.clear();
    }

    /// Render as `lexeme: id` lines in id order.
    pub fn to_listing(&self) -> String {
        let mut out = String::new();
        for (lexeme, id) in self.iter() {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = write!(out, "{}: {}", lexeme, id);
        }
        out
    }
}

/// The six tables of one translator instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTables {
    pub keywords: SymbolTable,
    pub operators: SymbolTable,
    pub separators: SymbolTable,
    pub identifiers: SymbolTable,
    pub num_consts: SymbolTable,
    pub char_consts: SymbolTable,
}

impl SymbolTables {
    /// Build the static vocabularies and seed the dynamic tables.
    pub fn new() -> Self {
        let mut tables = Self {
            keywords: SymbolTable::from_vocabulary(&KEYWORDS),
            operators: SymbolTable::from_vocabulary(&OPERATORS),
            separators: SymbolTable::from_vocabulary(&SEPARATORS),
            identifiers: SymbolTable::new(),
            num_consts: SymbolTable::new(),
            char_consts: SymbolTable::new(),
        };
        tables.seed_identifiers();
        tables
    }

    fn seed_identifiers(&mut self) {
        for literal in BOOLEAN_LITERALS {
            self.identifiers.intern(literal);
        }
    }

    /// Clear the dynamic tables and re-seed the boolean literals. Static
    /// tables are untouched; each run starts from the same baseline.
    pub fn reset_dynamic(&mut self) {
        self.identifiers.clear();
        self.num_consts.clear();
        self.char_consts.clear();
        self.seed_identifiers();
    }

    /// Exhaustive category → table accessor.
    pub fn table(&self, category: TokenCategory) -> &SymbolTable {
        match category {
            TokenCategory::Keyword => &self.keywords,
            TokenCategory::Operator => &self.operators,
            TokenCategory::Separator => &self.separators,
            TokenCategory::Identifier => &self.identifiers,
            TokenCategory::NumConst => &self.num_consts,
            TokenCategory::CharConst => &self.char_consts,
        }
    }

    pub fn table_mut(&mut self, category: TokenCategory) -> &mut SymbolTable {
        match category {
            TokenCategory::Keyword => &mut self.keywords,
            TokenCategory::Operator => &mut self.operators,
            TokenCategory::Separator => &mut self.separators,
            TokenCategory::Identifier => &mut self.identifiers,
            TokenCategory::NumConst => &mut self.num_consts,
            TokenCategory::CharConst => &mut self.char_consts,
        }
    }

    /// Reverse lookup: the lexeme a token resolves to.
    pub fn lexeme(&self, category: TokenCategory, id: usize) -> Option<&str> {
        self.table(category).lexeme(id)
    }
}

impl Default for SymbolTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_ids_follow_declaration_order() {
        let tables = SymbolTables::new();
        assert_eq!(tables.keywords.id_of("if"), Some(0));
        assert_eq!(tables.keywords.id_of("else"), Some(1));
        assert_eq!(tables.keywords.id_of("while"), Some(2));
        assert_eq!(tables.keywords.id_of("function"), Some(3));
        assert_eq!(tables.keywords.id_of("return"), Some(4));
        assert_eq!(tables.operators.id_of("+"), Some(0));
        assert_eq!(tables.operators.id_of("<="), Some(8));
        assert_eq!(tables.operators.id_of(":"), Some(16));
        assert_eq!(tables.separators.id_of("{"), Some(0));
        assert_eq!(tables.separators.id_of("'"), Some(9));
    }

    #[test]
    fn identifier_table_is_seeded_with_boolean_literals() {
        let tables = SymbolTables::new();
        assert_eq!(tables.identifiers.id_of("TRUE"), Some(0));
        assert_eq!(tables.identifiers.id_of("FALSE"), Some(1));
        assert_eq!(tables.identifiers.len(), 2);
    }

    #[test]
    fn interning_reuses_ids_and_never_shares_them() {
        let mut table = SymbolTable::new();
        let a = table.intern("alpha");
        let b = table.intern("beta");
        let a_again = table.intern("alpha");
        assert_eq!(a, a_again);
        assert_ne!(a, b);
        assert_eq!(table.lexeme(b), Some("beta"));
    }

    #[test]
    fn reset_restores_the_seeded_baseline() {
        let mut tables = SymbolTables::new();
        tables.identifiers.intern("counter");
        tables.num_consts.intern("42");
        tables.char_consts.intern("'x'");
        tables.reset_dynamic();
        assert_eq!(tables.identifiers.len(), 2);
        assert!(tables.num_consts.is_empty());
        assert!(tables.char_consts.is_empty());
        assert_eq!(tables.identifiers.id_of("TRUE"), Some(0));
        assert_eq!(tables.identifiers.id_of("FALSE"), Some(1));
    }

    #[test]
    fn listing_is_id_ordered() {
        let mut table = SymbolTable::new();
        table.intern("zeta");
        table.intern("alpha");
        assert_eq!(table.to_listing(), "zeta: 0\nalpha: 1");
    }

    #[test]
    fn reverse_lookup_round_trips() {
        let tables = SymbolTables::new();
        for category in TokenCategory::all() {
            let table = tables.table(category);
            for (lexeme, id) in table.iter() {
                assert_eq!(tables.lexeme(category, id), Some(lexeme));
            }
        }
    }
}
