use crate::lexical::LexerError;
use crate::logging::Code;
use crate::syntax::{ParseError, SemanticError, SyntaxError};

/// Pipeline failures, one variant per stage that can reject an input
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("Lexical analysis failed: {0}")]
    Lexical(#[from] LexerError),

    #[error("Parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Validation failed: {0}")]
    Semantic(#[from] SemanticError),
}

impl From<SyntaxError> for PipelineError {
    fn from(error: SyntaxError) -> Self {
        match error {
            SyntaxError::Parse(error) => Self::Parse(error),
            SyntaxError::Semantic(error) => Self::Semantic(error),
        }
    }
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Lexical(error) => error.error_code(),
            Self::Parse(error) => error.error_code(),
            Self::Semantic(error) => error.error_code(),
        }
    }

    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Lexical(error) => error.offset(),
            Self::Parse(error) => Some(error.offset()),
            Self::Semantic(error) => Some(error.offset()),
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::Lexical(_) => "lexical",
            Self::Parse(_) => "parse",
            Self::Semantic(_) => "semantic",
        }
    }
}
