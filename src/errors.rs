use std::error::Error;
use std::fmt;

use crate::cells::GridCoordinate;

/// Maze parameters rejected at construction time.
#[derive(PartialEq, Copy, Clone, Debug)]
pub enum ValidationError {
    TooFewRows(usize),
    TooFewColumns(usize),
    /// Cell coordinates are `u32` and the grid is one allocation, so both sides must fit a `u32`
    /// and their product a `usize`.
    TooManyCells { rows: usize, cols: usize },
    CellSizeNotPositive,
    /// The rendered image side, cells times cell size plus one border pixel, must fit a `u32`.
    CellSizeTooLarge(u32),
    ComplexityOutOfRange(f64),
    DifficultyOutOfRange(f64),
}

/// An operation was asked of a builder that has not reached the state it needs.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum PreconditionError {
    /// No passages have been carved yet.
    NotCarved,
    /// The start and end cells are only known after `generate`.
    NotGenerated,
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum MazeError {
    Validation(ValidationError),
    Precondition(PreconditionError),
    InvalidCoordinate(GridCoordinate),
}

pub type MazeResult<T> = Result<T, MazeError>;

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ValidationError::TooFewRows(rows) => {
                write!(f, "a maze needs at least 2 rows, got {}", rows)
            }
            ValidationError::TooFewColumns(cols) => {
                write!(f, "a maze needs at least 2 columns, got {}", cols)
            }
            ValidationError::TooManyCells { rows, cols } => {
                write!(f, "a {} by {} maze has too many cells", rows, cols)
            }
            ValidationError::CellSizeNotPositive => write!(f, "cell size must be positive"),
            ValidationError::CellSizeTooLarge(cell_size) => {
                write!(f, "cell size {} makes the maze image too large", cell_size)
            }
            ValidationError::ComplexityOutOfRange(complexity) => {
                write!(f, "complexity must be between 0 and 1, got {}", complexity)
            }
            ValidationError::DifficultyOutOfRange(difficulty) => {
                write!(f, "difficulty must be between 0 and 1, got {}", difficulty)
            }
        }
    }
}

impl fmt::Display for PreconditionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PreconditionError::NotCarved => write!(f, "the maze has not been carved yet"),
            PreconditionError::NotGenerated => {
                write!(f, "start and end cells are unset until the maze is generated")
            }
        }
    }
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MazeError::Validation(ref e) => write!(f, "invalid maze parameters: {}", e),
            MazeError::Precondition(ref e) => write!(f, "{}", e),
            MazeError::InvalidCoordinate(coord) => {
                write!(f, "cell {} is outside the maze", coord)
            }
        }
    }
}

impl Error for ValidationError {}
impl Error for PreconditionError {}

impl Error for MazeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            MazeError::Validation(ref e) => Some(e),
            MazeError::Precondition(ref e) => Some(e),
            MazeError::InvalidCoordinate(_) => None,
        }
    }
}

impl From<ValidationError> for MazeError {
    fn from(e: ValidationError) -> MazeError {
        MazeError::Validation(e)
    }
}

impl From<PreconditionError> for MazeError {
    fn from(e: PreconditionError) -> MazeError {
        MazeError::Precondition(e)
    }
}
