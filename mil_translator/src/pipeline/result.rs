use crate::lexical::LexicalMetrics;
use crate::pipeline::output::TranslationOutput;
use crate::pipeline::stats::TranslationStats;

/// Complete result of one translation run.
#[derive(Debug, Clone)]
pub struct TranslationResult {
    pub output: TranslationOutput,
    pub lexical_metrics: LexicalMetrics,
    pub stats: TranslationStats,
}

impl TranslationResult {
    pub fn new(
        output: TranslationOutput,
        lexical_metrics: LexicalMetrics,
        stats: TranslationStats,
    ) -> Self {
        Self {
            output,
            lexical_metrics,
            stats,
        }
    }

    pub fn log_success(&self) {
        crate::log_success!(
            crate::logging::codes::success::TRANSLATION_COMPLETE,
            "Translation pipeline completed",
            "token_count" => self.stats.token_count,
            "instruction_count" => self.stats.instruction_count,
            "identifiers" => self.stats.identifier_count,
            "duration_ms" => format!("{:.2}", self.stats.processing_duration.as_secs_f64() * 1000.0),
            "tokens_per_sec" => format!("{:.0}", self.stats.tokens_per_second())
        );
    }
}
