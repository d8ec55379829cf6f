use std::fmt;

use crate::cells::GridCoordinate;
use crate::grid_dimensions::RectGridDimensions;
use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};

/// Row-major iteration over every cell of a grid.
#[derive(Copy, Clone)]
pub struct RectGridCellIter {
    columns: ColumnsCount,
    current_cell_number: usize,
    cells_count: usize,
}

impl RectGridCellIter {
    pub fn new(dimensions: &RectGridDimensions) -> RectGridCellIter {
        RectGridCellIter {
            columns: dimensions.columns(),
            current_cell_number: 0,
            cells_count: dimensions.size().0,
        }
    }
}

impl fmt::Debug for RectGridCellIter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "CellIter :: current_cell_number: {:?}, cells_count: {:?}",
               self.current_cell_number,
               self.cells_count)
    }
}

impl ExactSizeIterator for RectGridCellIter {} // default impl using size_hint()
impl Iterator for RectGridCellIter {
    type Item = GridCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = GridCoordinate::from_row_major_index(self.current_cell_number, self.columns);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

/// Iteration over the grid one whole row at a time, north to south.
#[derive(Debug, Copy, Clone)]
pub struct RectRowIter {
    current_index: usize,
    rows_size: RowsCount,
    row_length: ColumnsCount,
}

impl RectRowIter {
    pub fn new(dimensions: &RectGridDimensions) -> RectRowIter {
        RectRowIter {
            current_index: 0,
            rows_size: dimensions.rows(),
            row_length: dimensions.columns(),
        }
    }
}

impl ExactSizeIterator for RectRowIter {}
impl Iterator for RectRowIter {
    type Item = Vec<GridCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        let RowsCount(count) = self.rows_size;
        if self.current_index < count {
            let ColumnsCount(length) = self.row_length;
            let coords = (0..length)
                .map(|i: usize| {
                    GridCoordinate::from_row_column_indices(RowIndex(self.current_index),
                                                            ColumnIndex(i))
                })
                .collect();
            self.current_index += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.rows_size.0 - self.current_index;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
