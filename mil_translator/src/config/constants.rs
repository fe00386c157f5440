pub mod compile_time {
    pub mod lexical {
        /// Initial token buffer capacity per run
        /// PERFORMANCE: Avoids early reallocation on typical sources
        pub const TOKEN_BUFFER_CAPACITY: usize = 256;

        /// Initial lexeme accumulator capacity
        /// PERFORMANCE: Covers identifiers and literals without growth
        pub const LEXEME_BUFFER_CAPACITY: usize = 32;
    }

    pub mod generator {
        /// Initial generator stack capacity
        /// PERFORMANCE: Deep enough for realistic construct nesting
        pub const STACK_CAPACITY: usize = 64;

        /// Initial instruction buffer capacity
        /// PERFORMANCE: Matches the token buffer scale
        pub const OUTPUT_BUFFER_CAPACITY: usize = 256;
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time::*;

    #[test]
    fn capacities_are_nonzero() {
        assert!(lexical::TOKEN_BUFFER_CAPACITY > 0);
        assert!(lexical::LEXEME_BUFFER_CAPACITY > 0);
        assert!(generator::STACK_CAPACITY > 0);
        assert!(generator::OUTPUT_BUFFER_CAPACITY > 0);
    }
}
