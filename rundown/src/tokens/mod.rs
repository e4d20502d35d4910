//! Token catalog and the cursor the parsers share
//!
//! - [`TokenCategory`] is the closed, ordered catalog of lexical categories.
//!   Each category has a literal or pattern [`MatchRule`].
//! - [`TokenGroup`] names the category sets the grammar matches against.
//! - [`Token`] is one lexed token: category, lexeme and character offset.
//! - [`Cursor`] is the backtracking position over a token sequence.

pub mod cursor;
pub mod token;

pub use cursor::{Cursor, Mark};
pub use token::{MatchRule, Token, TokenCategory, TokenGroup};
