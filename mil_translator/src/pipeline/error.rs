use crate::generator::GenerationError;
use crate::lexical::LexError;

/// Pipeline processing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexError),

    #[error("RPN generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn wraps_stage_errors() {
        let lex = LexError::InvalidCharacter {
            partial_lexeme: "@".to_string(),
            position: Position::start(),
        };
        let wrapped: PipelineError = lex.into();
        assert!(matches!(wrapped, PipelineError::LexicalAnalysis(_)));

        let generation = GenerationError::IndexWithoutBase;
        let wrapped: PipelineError = generation.into();
        assert!(matches!(wrapped, PipelineError::Generation(_)));
    }

    #[test]
    fn displays_the_inner_error() {
        let error = PipelineError::from(GenerationError::UnknownOperation {
            lexeme: "%%".to_string(),
        });
        assert!(error.to_string().contains("unknown operation '%%'"));
    }
}
