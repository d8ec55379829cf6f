use std::convert::TryFrom;

use image::{Rgb, RgbImage};

use crate::builder::MazeBuilder;
use crate::cells::{CompassPrimary, GridCoordinate};
use crate::errors::{MazeResult, PreconditionError, ValidationError};
use crate::grid::Grid;
use crate::units::{CellSize, ColumnsCount, RowsCount};

pub const WHITE: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const GREEN: Rgb<u8> = Rgb([0, 0xff, 0]);
pub const RED: Rgb<u8> = Rgb([0xff, 0, 0]);
pub const PALE_BLUE: Rgb<u8> = Rgb([0xbb, 0xdd, 0xff]);

#[derive(Debug, Copy, Clone)]
pub struct RenderOptions<'path> {
    background_colour: Rgb<u8>,
    wall_colour: Rgb<u8>,
    start_colour: Rgb<u8>,
    end_colour: Rgb<u8>,
    path_colour: Rgb<u8>,
    mark_start_end: bool,
    path: Option<&'path [GridCoordinate]>,
}

#[derive(Debug)]
pub struct RenderOptionsBuilder<'path> {
    options: RenderOptions<'path>,
}

impl<'path> RenderOptionsBuilder<'path> {
    pub fn new() -> RenderOptionsBuilder<'path> {
        RenderOptionsBuilder {
            options: RenderOptions {
                background_colour: WHITE,
                wall_colour: BLACK,
                start_colour: GREEN,
                end_colour: RED,
                path_colour: PALE_BLUE,
                mark_start_end: true,
                path: None,
            },
        }
    }
    pub fn wall_colour(mut self, colour: Rgb<u8>) -> Self {
        self.options.wall_colour = colour;
        self
    }
    pub fn background_colour(mut self, colour: Rgb<u8>) -> Self {
        self.options.background_colour = colour;
        self
    }
    pub fn mark_start_end(mut self, on: bool) -> Self {
        self.options.mark_start_end = on;
        self
    }
    pub fn path(mut self, path: Option<&'path [GridCoordinate]>) -> Self {
        self.options.path = path;
        self
    }
    pub fn path_colour(mut self, colour: Rgb<u8>) -> Self {
        self.options.path_colour = colour;
        self
    }
    pub fn build(self) -> RenderOptions<'path> {
        self.options
    }
}

impl<'path> Default for RenderOptionsBuilder<'path> {
    fn default() -> Self {
        RenderOptionsBuilder::new()
    }
}

/// Draw a carved maze, one `cell_size` pixel square per cell.
///
/// Marking the start and end needs a generated maze.
pub fn render_maze_image(maze: &MazeBuilder, options: &RenderOptions) -> MazeResult<RgbImage> {
    let grid = maze.grid()?;
    let end_points = if options.mark_start_end {
        Some(maze.endpoints().map_err(|_| PreconditionError::NotGenerated)?)
    } else {
        None
    };
    let img = render_grid_image(grid, maze.cell_size(), end_points, options)?;
    Ok(img)
}

/// Pixel (width, height) of a maze image, or None if either side overflows a `u32`.
pub fn image_dimensions(rows: RowsCount,
                        columns: ColumnsCount,
                        cell_size: CellSize)
                        -> Option<(u32, u32)> {
    let CellSize(cell_side) = cell_size;
    let side = |cells: usize| {
        u32::try_from(cells).ok()
            .and_then(|cells| cells.checked_mul(cell_side))
            .and_then(|pixels| pixels.checked_add(1))
    };
    Some((side(columns.0)?, side(rows.0)?))
}

/// Every standing wall becomes a line; the image is one pixel wider and taller than the cells
/// so the east and south border lines fit.
pub fn render_grid_image(grid: &Grid,
                         cell_size: CellSize,
                         end_points: Option<(GridCoordinate, GridCoordinate)>,
                         options: &RenderOptions)
                         -> Result<RgbImage, ValidationError> {

    let CellSize(cell_side) = cell_size;
    let (img_width, img_height) = image_dimensions(grid.rows(), grid.columns(), cell_size)
        .ok_or(ValidationError::CellSizeTooLarge(cell_side))?;
    let mut img = RgbImage::from_pixel(img_width, img_height, options.background_colour);

    if let Some(path) = options.path {
        for coord in path.iter().filter(|coord| grid.is_valid_coordinate(**coord)) {
            let (x, y) = cell_origin(*coord, cell_side);
            fill_rect(&mut img, x, y, cell_side, cell_side, options.path_colour);
        }
    }

    let last_row = grid.rows().0 as u32 - 1;
    let last_column = grid.columns().0 as u32 - 1;
    for cell in grid.iter() {
        let (x1, y1) = cell_origin(cell, cell_side);
        let (x2, y2) = (x1 + cell_side, y1 + cell_side);

        // Shared walls are drawn once, from the cell south or east of them.
        if grid.has_wall(cell, CompassPrimary::North) {
            draw_horizontal(&mut img, x1, x2, y1, options.wall_colour);
        }
        if grid.has_wall(cell, CompassPrimary::West) {
            draw_vertical(&mut img, x1, y1, y2, options.wall_colour);
        }
        if cell.row == last_row && grid.has_wall(cell, CompassPrimary::South) {
            draw_horizontal(&mut img, x1, x2, y2, options.wall_colour);
        }
        if cell.col == last_column && grid.has_wall(cell, CompassPrimary::East) {
            draw_vertical(&mut img, x2, y1, y2, options.wall_colour);
        }
    }

    if let Some((start, end)) = end_points {
        for &(coord, colour) in &[(start, options.start_colour), (end, options.end_colour)] {
            if grid.is_valid_coordinate(coord) {
                mark_cell(&mut img, coord, cell_side, colour);
            }
        }
    }

    Ok(img)
}

#[inline]
fn cell_origin(coord: GridCoordinate, cell_side: u32) -> (u32, u32) {
    (coord.col * cell_side, coord.row * cell_side)
}

/// A filled square half the cell's size in the middle of the cell.
fn mark_cell(img: &mut RgbImage, coord: GridCoordinate, cell_side: u32, colour: Rgb<u8>) {
    let (x, y) = cell_origin(coord, cell_side);
    let side = (cell_side / 2).max(1);
    let inset = (cell_side - side) / 2;
    fill_rect(img, x + inset, y + inset, side, side, colour);
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, colour: Rgb<u8>) {
    let x_end = x.saturating_add(width).min(img.width());
    let y_end = y.saturating_add(height).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, colour);
        }
    }
}

fn draw_horizontal(img: &mut RgbImage, x1: u32, x2: u32, y: u32, colour: Rgb<u8>) {
    fill_rect(img, x1, y, x2 - x1 + 1, 1, colour);
}

fn draw_vertical(img: &mut RgbImage, x: u32, y1: u32, y2: u32, colour: Rgb<u8>) {
    fill_rect(img, x, y1, 1, y2 - y1 + 1, colour);
}
