//! **perfect_mazes** carves random perfect mazes, mazes with exactly one route between any two
//! cells, and picks an entrance and exit for them.

pub mod builder;
pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_dimensions;
pub mod grid_displays;
pub mod grid_iterators;
pub mod pathing;
pub mod renderers;
pub mod units;

pub use crate::builder::{BuildState, EndpointPolicy, MazeBuilder, MazeParameters};
pub use crate::errors::{MazeError, MazeResult, PreconditionError, ValidationError};
