pub mod array;
pub mod dims;
pub mod generator;
pub mod grid;
pub mod search;

pub use dims::Dims;
pub use generator::{GeneratorError, MazeGenerator};
pub use grid::{Block, FormatError, Grid, GridError};
pub use search::{Outcome, SearchEngine, SearchState, SolveError, Strategy};
