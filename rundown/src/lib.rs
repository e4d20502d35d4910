//! Parser for the rundown running-workout shorthand
//!
//! Text goes through the lexer (`lexical`), the recursive-descent builders
//! (`grammar::builders`, driven by `syntax`) and comes out as a validated
//! `Workout`. `pipeline` wires the stages together and `batch` runs many
//! independent inputs.

// Internal modules
#[macro_use]
pub mod logging;
pub mod batch;
pub mod config;
pub mod grammar;
pub mod lexical;
pub mod pipeline;
pub mod render;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchInput, BatchResults};
pub use grammar::ast::nodes::Workout;
pub use pipeline::{parse, parse_workout, ParseMetrics, PipelineError, PipelineResult};
pub use render::outline;
