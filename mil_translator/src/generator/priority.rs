//! Operation priorities for the precedence-driven generator core.
//!
//! Priority 0 entries are the grouping and construct openers that only
//! their dedicated closer may remove; the priority-1 band holds closers and
//! statement punctuation, which are dispatched specially and never pushed.
//! Real operators start at 2. Equal priorities pop left-associatively; a
//! future right-associative operator (the reserved `^` slot) would need an
//! operator-specific tie-break flag, not a different global rule.
//!
//! `%%` and `:` are lexable operator vocabulary but have no entry here:
//! using them in an expression is the unknown-operation generation error.

/// Priorities in fixed declaration order.
pub const OPERATION_PRIORITIES: [(&str, u8); 27] = [
    ("(", 0),
    ("[", 0),
    ("{", 0),
    (",", 1),
    (";", 1),
    (")", 1),
    ("}", 1),
    ("]", 1),
    ("else", 1),
    ("if", 0),
    ("while", 0),
    ("=", 2),
    ("<-", 2),
    ("|", 3),
    ("&", 4),
    ("!", 5),
    (">", 6),
    ("<", 6),
    ("<=", 6),
    (">=", 6),
    ("==", 6),
    ("!=", 6),
    ("+", 7),
    ("-", 7),
    ("*", 8),
    ("/", 8),
    ("^", 9),
];

/// Look up the priority of an operation lexeme.
pub fn operation_priority(lexeme: &str) -> Option<u8> {
    OPERATION_PRIORITIES
        .iter()
        .find(|(entry, _)| *entry == lexeme)
        .map(|(_, priority)| *priority)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openers_have_priority_zero() {
        for opener in ["(", "[", "{", "if", "while"] {
            assert_eq!(operation_priority(opener), Some(0));
        }
    }

    #[test]
    fn precedence_ladder_matches_the_language() {
        assert!(operation_priority("=") < operation_priority("|"));
        assert!(operation_priority("|") < operation_priority("&"));
        assert!(operation_priority("&") < operation_priority("!"));
        assert!(operation_priority("!") < operation_priority("=="));
        assert!(operation_priority("==") < operation_priority("+"));
        assert!(operation_priority("+") < operation_priority("*"));
        assert!(operation_priority("*") < operation_priority("^"));
        assert_eq!(operation_priority("+"), operation_priority("-"));
    }

    #[test]
    fn unlisted_operations_have_no_priority() {
        assert_eq!(operation_priority("%%"), None);
        assert_eq!(operation_priority(":"), None);
        assert_eq!(operation_priority("return"), None);
        assert_eq!(operation_priority("function"), None);
    }
}
