//! Error types for syntax transformation
//!
//! Structural failures (`ParseError`) and rule violations on a structurally
//! valid clause (`SemanticError`) are kept apart. Builders return both through
//! `SyntaxError` so `?` works across every production.

use crate::grammar::ast::nodes::{Component, RecoveryKind};
use crate::logging::{codes, Code};
use crate::tokens::{Token, TokenCategory};
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Structural errors; they carry the token actually found
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Unexpected token {category} '{lexeme}' at position {offset}: expected {expected}")]
    UnexpectedToken {
        category: TokenCategory,
        lexeme: String,
        offset: usize,
        expected: String,
    },

    #[error("Unexpected end of input at position {offset}: expected {expected}")]
    UnexpectedEndOfInput { offset: usize, expected: String },

    #[error("Invalid number '{lexeme}' at position {offset}")]
    InvalidNumber { lexeme: String, offset: usize },

    #[error("Too many sections: {count} at position {offset}")]
    TooManySections { count: usize, offset: usize },
}

impl ParseError {
    /// Error for `found` where `expected` should have been
    pub fn unexpected(found: &Token, expected: &str) -> Self {
        if found.is_eof() {
            Self::UnexpectedEndOfInput {
                offset: found.offset,
                expected: expected.to_string(),
            }
        } else {
            Self::UnexpectedToken {
                category: found.category,
                lexeme: found.lexeme.clone(),
                offset: found.offset,
                expected: expected.to_string(),
            }
        }
    }

    pub fn invalid_number(token: &Token) -> Self {
        Self::InvalidNumber {
            lexeme: token.lexeme.clone(),
            offset: token.offset,
        }
    }

    /// Category of the offending token
    pub fn found_category(&self) -> Option<TokenCategory> {
        match self {
            Self::UnexpectedToken { category, .. } => Some(*category),
            Self::UnexpectedEndOfInput { .. } => Some(TokenCategory::Eof),
            Self::InvalidNumber { .. } => Some(TokenCategory::Number),
            Self::TooManySections { .. } => None,
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            Self::UnexpectedToken { offset, .. }
            | Self::UnexpectedEndOfInput { offset, .. }
            | Self::InvalidNumber { offset, .. }
            | Self::TooManySections { offset, .. } => *offset,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { lexeme, offset, .. }
            | Self::InvalidNumber { lexeme, offset } => {
                Span::new(*offset, offset + lexeme.chars().count())
            }
            Self::UnexpectedEndOfInput { offset, .. } | Self::TooManySections { offset, .. } => {
                Span::empty(*offset)
            }
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::UnexpectedEndOfInput { .. } => codes::syntax::UNEXPECTED_END_OF_INPUT,
            Self::InvalidNumber { .. } => codes::syntax::INVALID_NUMBER,
            Self::TooManySections { .. } => codes::syntax::TOO_MANY_SECTIONS,
        }
    }
}

/// Digit-count rules for time expressions
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeFormatError {
    #[error("Time component '{lexeme}' at position {offset} must have exactly 2 digits")]
    ComponentDigits { lexeme: String, offset: usize },

    #[error("Time at position {offset} has {parts} colon-separated parts, expected 2 or 3")]
    PartCount { parts: usize, offset: usize },
}

impl TimeFormatError {
    pub fn offset(&self) -> usize {
        match self {
            Self::ComponentDigits { offset, .. } | Self::PartCount { offset, .. } => *offset,
        }
    }
}

/// Rule violations on a structurally valid clause
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SemanticError {
    #[error("Section component {found} at position {offset} cannot follow {previous}")]
    ComponentOrder {
        found: Component,
        previous: Component,
        offset: usize,
    },

    #[error("Empty section at position {offset}")]
    EmptySection { offset: usize },

    #[error("Section at position {offset} has a target but nothing to apply it to")]
    TargetOnlySection { offset: usize },

    #[error("{kind} recovery at position {offset} cannot have a target")]
    TargetNotAllowed { kind: RecoveryKind, offset: usize },

    #[error("Static recovery at position {offset} cannot be a distance")]
    StaticDistance { offset: usize },

    #[error("Multiplier at position {offset} must be at least 1")]
    ZeroMultiplier { offset: usize },

    #[error(transparent)]
    TimeFormat(#[from] TimeFormatError),
}

impl SemanticError {
    pub fn offset(&self) -> usize {
        match self {
            Self::ComponentOrder { offset, .. }
            | Self::EmptySection { offset }
            | Self::TargetOnlySection { offset }
            | Self::TargetNotAllowed { offset, .. }
            | Self::StaticDistance { offset }
            | Self::ZeroMultiplier { offset } => *offset,
            Self::TimeFormat(error) => error.offset(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::ComponentOrder { .. } => codes::semantic::COMPONENT_ORDER,
            Self::EmptySection { .. } => codes::semantic::EMPTY_SECTION,
            Self::TargetOnlySection { .. } => codes::semantic::TARGET_ONLY_SECTION,
            Self::TargetNotAllowed { .. } => codes::semantic::RECOVERY_TARGET_NOT_ALLOWED,
            Self::StaticDistance { .. } => codes::semantic::STATIC_RECOVERY_DISTANCE,
            Self::ZeroMultiplier { .. } => codes::semantic::ZERO_MULTIPLIER,
            Self::TimeFormat(_) => codes::semantic::TIME_FORMAT,
        }
    }
}

/// Anything a grammar builder can fail with
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

impl From<TimeFormatError> for SyntaxError {
    fn from(error: TimeFormatError) -> Self {
        Self::Semantic(SemanticError::TimeFormat(error))
    }
}

impl SyntaxError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Parse(error) => error.error_code(),
            Self::Semantic(error) => error.error_code(),
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            Self::Parse(error) => error.offset(),
            Self::Semantic(error) => error.offset(),
        }
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self, Self::Semantic(_))
    }

    /// Get error description
    pub fn description(&self) -> &'static str {
        codes::get_description(self.error_code().as_str())
    }

    /// Get recommended action
    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}
