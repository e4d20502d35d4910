//! Backtracking cursor over a lexed token sequence
//!
//! Every sub-parser borrows the same `Cursor` mutably. Speculative attempts
//! take a `Mark`, try their production, and `reset` on failure so the caller
//! sees the position it started from.
//!
//! Rule violations found on the way are not raised at once. The earliest one is
//! kept on the cursor and reported only once the whole input has parsed, so a
//! structural error later in the text always takes precedence.

use crate::syntax::error::{ParseError, SemanticError};
use crate::tokens::token::{Token, TokenCategory, TokenGroup};

/// Saved cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark {
    position: usize,
    has_violation: bool,
}

#[derive(Debug, Clone)]
pub struct Cursor {
    tokens: Vec<Token>,
    position: usize,
    violation: Option<SemanticError>,
}

impl Cursor {
    /// Build a cursor; a missing trailing EOF token is appended
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let end = tokens
                .last()
                .map(|t| t.offset + t.lexeme.chars().count())
                .unwrap_or(0);
            tokens.push(Token::eof(end));
        }

        Self {
            tokens,
            position: 0,
            violation: None,
        }
    }

    /// Current token without consuming it
    pub fn peek(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    /// Token after the current one, used for one-token lookahead
    pub fn peek_next(&self) -> &Token {
        &self.tokens[(self.position + 1).min(self.tokens.len() - 1)]
    }

    /// Most recently consumed token
    pub fn previous(&self) -> Option<&Token> {
        self.position.checked_sub(1).map(|i| &self.tokens[i])
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    pub fn check(&self, category: TokenCategory) -> bool {
        !self.is_at_end() && self.peek().category == category
    }

    pub fn check_group(&self, group: TokenGroup) -> bool {
        !self.is_at_end() && self.peek().category.is_in(group)
    }

    /// Consume and return the current token; EOF is never consumed
    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !token.is_eof() {
            self.position += 1;
        }
        token
    }

    /// Consume the current token if it is one of `categories`
    pub fn match_any(&mut self, categories: &[TokenCategory]) -> Option<Token> {
        if categories.iter().any(|c| self.check(*c)) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub fn match_one(&mut self, category: TokenCategory) -> Option<Token> {
        self.match_any(&[category])
    }

    pub fn match_group(&mut self, group: TokenGroup) -> Option<Token> {
        self.match_any(group.members())
    }

    /// Consume an optional token, reporting whether it was there
    pub fn skip(&mut self, category: TokenCategory) -> bool {
        self.match_one(category).is_some()
    }

    /// Consume one of `categories` or fail with the token actually found
    pub fn match_or_fail(
        &mut self,
        categories: &[TokenCategory],
        expected: &str,
    ) -> Result<Token, ParseError> {
        self.match_any(categories)
            .ok_or_else(|| ParseError::unexpected(self.peek(), expected))
    }

    pub fn match_group_or_fail(
        &mut self,
        group: TokenGroup,
        expected: &str,
    ) -> Result<Token, ParseError> {
        self.match_or_fail(group.members(), expected)
    }

    pub fn mark(&self) -> Mark {
        Mark {
            position: self.position,
            has_violation: self.violation.is_some(),
        }
    }

    /// Rewind; a violation recorded after `mark` is discarded with the tokens
    pub fn reset(&mut self, mark: Mark) {
        self.position = mark.position;
        if !mark.has_violation {
            self.violation = None;
        }
    }

    /// Record a rule violation; only the earliest one in the text is kept
    pub fn defer(&mut self, violation: impl Into<SemanticError>) {
        let violation = violation.into();
        match &self.violation {
            Some(kept) if kept.offset() <= violation.offset() => {}
            _ => self.violation = Some(violation),
        }
    }

    pub fn violation(&self) -> Option<&SemanticError> {
        self.violation.as_ref()
    }

    pub fn take_violation(&mut self) -> Option<SemanticError> {
        self.violation.take()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}
