//! Syntax analysis: tokens to a validated workout AST

pub mod error;
mod parser;

pub use crate::grammar::ast::nodes::Workout;
pub use error::{ParseError, SemanticError, SyntaxError, SyntaxResult, TimeFormatError};
pub use parser::{create_parser, WorkoutParser};

use crate::config::runtime::SyntaxPreferences;
use crate::tokens::Token;

/// Parse a lexed token sequence with default preferences
pub fn parse_tokens(tokens: Vec<Token>) -> SyntaxResult<Workout> {
    WorkoutParser::new(tokens).parse()
}

pub fn parse_tokens_with_preferences(
    tokens: Vec<Token>,
    preferences: SyntaxPreferences,
) -> SyntaxResult<Workout> {
    WorkoutParser::with_preferences(tokens, preferences).parse()
}
