use std::cmp;

use crate::cells::GridCoordinate;
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};


#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RectGridDimensions {
    rows: RowsCount,
    columns: ColumnsCount,
}

impl RectGridDimensions {
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> RectGridDimensions {
        RectGridDimensions { rows, columns }
    }

    #[inline(always)]
    pub fn size(&self) -> NodesCount {
        NodesCount(self.rows.0 * self.columns.0)
    }

    #[inline(always)]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline(always)]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    /// Capacity hints for a graph holding every cell and the most passages a grid of this size
    /// could have.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let cells_count = self.size();
        let edges_count_hint = 2 * cells_count.0 - cmp::min(self.rows.0 + self.columns.0, 2 * cells_count.0);
        (cells_count, EdgesCount(edges_count_hint))
    }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        (coord.row as usize) < self.rows.0 && (coord.col as usize) < self.columns.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row as usize * self.columns.0 + coord.col as usize)
        } else {
            None
        }
    }
}
