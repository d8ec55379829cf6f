use std::convert::From;
use std::fmt;

use smallvec::SmallVec;

use crate::grid_dimensions::RectGridDimensions;
use crate::units::{ColumnIndex, ColumnsCount, RowIndex};

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;
pub type CoordinateOptionSmallVec = SmallVec<[Option<GridCoordinate>; 4]>;

/// A cell position on the grid, `row` counting down from the north edge and `col` counting
/// across from the west edge.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub row: u32,
    pub col: u32,
}

impl GridCoordinate {
    pub fn new(row: u32, col: u32) -> GridCoordinate {
        GridCoordinate { row, col }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, columns: ColumnsCount) -> GridCoordinate {
        let ColumnsCount(width) = columns;
        let row = index / width;
        let col = index % width;

        GridCoordinate::new(row as u32, col as u32)
    }

    #[inline]
    pub fn from_row_column_indices(row_index: RowIndex, col_index: ColumnIndex) -> GridCoordinate {
        let (RowIndex(row), ColumnIndex(col)) = (row_index, col_index);
        GridCoordinate::new(row as u32, col as u32)
    }

    /// The coordinate one step away in `dir`, or None if the step would leave the grid.
    pub fn offset(self, dir: CompassPrimary, dimensions: &RectGridDimensions) -> Option<GridCoordinate> {
        let (row_delta, col_delta) = dir.offset();
        let row = i64::from(self.row) + row_delta;
        let col = i64::from(self.col) + col_delta;
        if row < 0 || col < 0 {
            return None;
        }

        let coord = GridCoordinate::new(row as u32, col as u32);
        if dimensions.is_valid_coordinate(coord) {
            Some(coord)
        } else {
            None
        }
    }
}

impl From<(u32, u32)> for GridCoordinate {
    fn from(row_col_pair: (u32, u32)) -> GridCoordinate {
        GridCoordinate::new(row_col_pair.0, row_col_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    /// Neighbour enumeration order used everywhere a cell's surroundings are listed.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    /// (row, column) step for one cell in this direction.
    #[inline]
    pub fn offset(self) -> (i64, i64) {
        match self {
            CompassPrimary::North => (-1, 0),
            CompassPrimary::South => (1, 0),
            CompassPrimary::East => (0, 1),
            CompassPrimary::West => (0, -1),
        }
    }

    #[inline]
    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }
}

/// The four wall flags of a single cell. `true` means the wall is standing.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub struct Walls {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl Walls {
    pub fn all_standing() -> Walls {
        Walls {
            north: true,
            south: true,
            east: true,
            west: true,
        }
    }

    #[inline]
    pub fn has_wall(&self, dir: CompassPrimary) -> bool {
        match dir {
            CompassPrimary::North => self.north,
            CompassPrimary::South => self.south,
            CompassPrimary::East => self.east,
            CompassPrimary::West => self.west,
        }
    }

    #[inline]
    pub(crate) fn set_wall(&mut self, dir: CompassPrimary, standing: bool) {
        match dir {
            CompassPrimary::North => self.north = standing,
            CompassPrimary::South => self.south = standing,
            CompassPrimary::East => self.east = standing,
            CompassPrimary::West => self.west = standing,
        }
    }

    /// How many of the four walls have been knocked down.
    pub fn open_count(&self) -> usize {
        CompassPrimary::ALL.iter().filter(|dir| !self.has_wall(**dir)).count()
    }
}

impl Default for Walls {
    fn default() -> Walls {
        Walls::all_standing()
    }
}
