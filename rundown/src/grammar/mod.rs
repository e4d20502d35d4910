//! Grammar for workout shorthand: AST nodes and the builders producing them

pub mod ast;
pub mod builders;

pub use ast::nodes::*;
pub use builders::*;
