pub mod nodes;

pub use nodes::Workout;
