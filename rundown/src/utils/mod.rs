//! Shared primitive types used by the lexer, parser and logging

pub mod span;

pub use span::Span;
