//! The translation pipeline: lexical analysis, then RPN generation.

mod error;
pub mod output;
mod result;
mod stats;

// Re-export public types
pub use error::PipelineError;
pub use output::TranslationOutput;
pub use result::TranslationResult;
pub use stats::TranslationStats;

use crate::config::runtime::TranslatorPreferences;
use crate::generator::RpnGenerator;
use crate::lexical::Lexer;
use crate::log_info;
use std::time::Instant;

/// Run one source text through the complete pipeline
/// (source -> tokens + tables -> instructions).
pub fn translate_source(source: &str) -> Result<TranslationResult, PipelineError> {
    translate_source_with_preferences(source, &TranslatorPreferences::default())
}

/// As `translate_source`, with explicit runtime preferences. Preferences
/// only change observability, never ids or instruction text.
pub fn translate_source_with_preferences(
    source: &str,
    preferences: &TranslatorPreferences,
) -> Result<TranslationResult, PipelineError> {
    let start_time = Instant::now();

    log_info!("Starting MIL translation pipeline",
        "source_chars" => source.chars().count()
    );

    // Stage 1: Lexical analysis
    let mut lexer = Lexer::with_preferences(preferences.lexical.clone());
    let stream = lexer.run(source)?;

    // Stage 2: RPN generation
    let mut generator = RpnGenerator::new(&stream, lexer.tables());
    let instructions = generator.generate()?;

    let stats = TranslationStats {
        token_count: stream.len(),
        instruction_count: generator.instruction_count(),
        identifier_count: lexer.tables().identifiers.len(),
        num_const_count: lexer.tables().num_consts.len(),
        char_const_count: lexer.tables().char_consts.len(),
        if_labels_allocated: generator.if_labels_allocated(),
        while_labels_allocated: generator.while_labels_allocated(),
        processing_duration: start_time.elapsed(),
    };
    let lexical_metrics = lexer.metrics().clone();
    let output = TranslationOutput::new(&lexer, &stream, instructions);

    let result = TranslationResult::new(output, lexical_metrics, stats);
    result.log_success();

    Ok(result)
}
