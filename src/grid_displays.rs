use std::fmt;

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::grid::Grid;
use fnv::FnvHashSet;

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: GridCoordinate) -> String {
        String::from("   ")
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start: GridCoordinate,
    end: GridCoordinate,
}
impl StartEndPointsDisplay {
    pub fn new(start: GridCoordinate, end: GridCoordinate) -> StartEndPointsDisplay {
        StartEndPointsDisplay { start, end }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if coord == self.start {
            String::from(" S ")
        } else if coord == self.end {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}

/// Marks every cell on a path, with the path's first and last cells shown as start and end.
#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<GridCoordinate>,
    end_points: Option<StartEndPointsDisplay>,
}
impl PathDisplay {
    pub fn new(path: &[GridCoordinate]) -> Self {
        let mut on_path_coordinates =
            FnvHashSet::with_capacity_and_hasher(path.len(), Default::default());
        on_path_coordinates.extend(path.iter().cloned());
        let end_points = match (path.first(), path.last()) {
            (Some(start), Some(end)) => Some(StartEndPointsDisplay::new(*start, *end)),
            _ => None,
        };
        PathDisplay {
            on_path_coordinates,
            end_points,
        }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        let end_point_body = self.end_points
            .as_ref()
            .map(|end_points| end_points.render_cell_body(coord))
            .filter(|body| body.trim() != "");
        if let Some(body) = end_point_body {
            body
        } else if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

/// A grid drawn with box drawing characters, cell bodies filled in by an optional `GridDisplay`.
pub struct GridText<'a> {
    grid: &'a Grid,
    grid_display: Option<&'a dyn GridDisplay>,
}

impl<'a> GridText<'a> {
    pub fn new(grid: &'a Grid, grid_display: Option<&'a dyn GridDisplay>) -> GridText<'a> {
        GridText { grid, grid_display }
    }

    /// Is there a wall on the vertical line `column_line` (0 ..= columns) within `row`?
    /// The outer border always counts as a wall.
    fn vertical_wall(&self, row: u32, column_line: u32) -> bool {
        let last_column = (self.grid.columns().0 as u32).saturating_sub(1);
        if column_line <= last_column {
            self.grid.has_wall(GridCoordinate::new(row, column_line), CompassPrimary::West)
        } else {
            self.grid.has_wall(GridCoordinate::new(row, last_column), CompassPrimary::East)
        }
    }

    /// Is there a wall on the horizontal line `row_line` (0 ..= rows) within `column`?
    fn horizontal_wall(&self, row_line: u32, column: u32) -> bool {
        let last_row = (self.grid.rows().0 as u32).saturating_sub(1);
        if row_line <= last_row {
            self.grid.has_wall(GridCoordinate::new(row_line, column), CompassPrimary::North)
        } else {
            self.grid.has_wall(GridCoordinate::new(last_row, column), CompassPrimary::South)
        }
    }

    /// The glyph where grid lines cross at (`row_line`, `column_line`), one arm per wall that
    /// meets there.
    fn junction(&self, row_line: u32, column_line: u32) -> &'static str {
        let rows = self.grid.rows().0 as u32;
        let columns = self.grid.columns().0 as u32;

        let left = column_line > 0 && self.horizontal_wall(row_line, column_line - 1);
        let right = column_line < columns && self.horizontal_wall(row_line, column_line);
        let up = row_line > 0 && self.vertical_wall(row_line - 1, column_line);
        let down = row_line < rows && self.vertical_wall(row_line, column_line);

        match (left, right, up, down) {
            (true, true, true, true) => "┼",
            (true, true, true, false) => "┴",
            (true, true, false, true) => "┬",
            (true, false, true, true) => "┤",
            (false, true, true, true) => "├",
            (true, true, false, false) => "─",
            (false, false, true, true) => "│",
            (false, true, true, false) => "└",
            (true, false, false, true) => "┐",
            (true, false, true, false) => "┘",
            (false, true, false, true) => "┌",
            (true, false, false, false) => "╴",
            (false, true, false, false) => "╶",
            (false, false, true, false) => "╵",
            (false, false, false, true) => "╷",
            (false, false, false, false) => " ",
        }
    }
}

impl<'a> fmt::Display for GridText<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rows = self.grid.rows().0 as u32;
        let columns = self.grid.columns().0 as u32;

        // Each row of cells is a line of junctions and horizontal walls followed by a line of
        // vertical walls and cell bodies. One more junction line closes the south border.
        for row_line in 0..=rows {
            for column_line in 0..=columns {
                f.write_str(self.junction(row_line, column_line))?;
                if column_line < columns {
                    let wall = self.horizontal_wall(row_line, column_line);
                    f.write_str(if wall { "───" } else { "   " })?;
                }
            }
            f.write_str("\n")?;

            if row_line == rows {
                break;
            }
            for column_line in 0..=columns {
                let wall = self.vertical_wall(row_line, column_line);
                f.write_str(if wall { "│" } else { " " })?;
                if column_line < columns {
                    let coord = GridCoordinate::new(row_line, column_line);
                    let body = self.grid_display
                        .map_or_else(|| String::from("   "), |display| display.render_cell_body(coord));
                    f.write_str(&body)?;
                }
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", GridText::new(self, None))
    }
}
