use std::fmt;

use petgraph::graph::UnGraph;
use rand::Rng;

use crate::cells::{CompassPrimary, CoordinateOptionSmallVec, CoordinateSmallVec, GridCoordinate,
                   Walls};
use crate::grid_dimensions::RectGridDimensions;
use crate::grid_iterators::{RectGridCellIter, RectRowIter};
use crate::units::{ColumnsCount, NodesCount, RowsCount};

/// Directions that reach every passage exactly once when scanned from each cell.
static FORWARD_DIRECTIONS: [CompassPrimary; 2] = [CompassPrimary::East, CompassPrimary::South];

/// Fixed size rectangular grid of cells, each cell holding its own four wall flags.
///
/// Walls between two cells are stored on both sides and are only ever changed in pairs, so a
/// cell's wall towards a neighbour always agrees with the neighbour's wall back towards it.
#[derive(Clone, Eq, PartialEq)]
pub struct Grid {
    dimensions: RectGridDimensions,
    walls: Vec<Walls>,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    NotAdjacent,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: links: {:?}, rows: {:?}, columns: {:?}",
               self.links_count(), self.rows(), self.columns())
    }
}

impl Grid {
    pub fn new(dimensions: RectGridDimensions) -> Grid {
        let NodesCount(nodes) = dimensions.size();
        Grid {
            dimensions,
            walls: vec![Walls::all_standing(); nodes],
        }
    }

    /// Stand every wall back up.
    pub fn reset(&mut self) {
        for walls in self.walls.iter_mut() {
            *walls = Walls::all_standing();
        }
    }

    #[inline]
    pub fn dimensions(&self) -> &RectGridDimensions {
        &self.dimensions
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.dimensions.size().0
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.dimensions.rows()
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.dimensions.columns()
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> GridCoordinate {
        let index = rng.gen_range(0..self.size());
        GridCoordinate::from_row_major_index(index, self.columns())
    }

    /// Wall flags of one cell, or None if the coordinate is off the grid.
    #[inline]
    pub fn walls(&self, coord: GridCoordinate) -> Option<Walls> {
        self.grid_coordinate_to_index(coord).map(|index| self.walls[index])
    }

    /// Is there a wall on the `dir` side of the cell? Coordinates off the grid are solid rock.
    #[inline]
    pub fn has_wall(&self, coord: GridCoordinate, dir: CompassPrimary) -> bool {
        self.walls(coord).map_or(true, |walls| walls.has_wall(dir))
    }

    /// Knock down the wall on the `dir` side of `coord` and the matching wall of the neighbour.
    ///
    /// Returns the neighbour now reachable through the opening.
    pub fn knock_down_wall(&mut self,
                           coord: GridCoordinate,
                           dir: CompassPrimary)
                           -> Result<GridCoordinate, CellLinkError> {
        let here = self.grid_coordinate_to_index(coord)
            .ok_or(CellLinkError::InvalidGridCoordinate)?;
        let neighbour = self.neighbour_at_direction(coord, dir)
            .ok_or(CellLinkError::InvalidGridCoordinate)?;
        let there = self.grid_coordinate_to_index(neighbour)
            .ok_or(CellLinkError::InvalidGridCoordinate)?;

        self.walls[here].set_wall(dir, false);
        self.walls[there].set_wall(dir.opposite(), false);
        Ok(neighbour)
    }

    /// Link two adjacent cells by removing the wall they share.
    pub fn link(&mut self, a: GridCoordinate, b: GridCoordinate) -> Result<(), CellLinkError> {
        if !self.is_valid_coordinate(a) || !self.is_valid_coordinate(b) {
            return Err(CellLinkError::InvalidGridCoordinate);
        }
        let dir = self.direction_between(a, b).ok_or(CellLinkError::NotAdjacent)?;
        self.knock_down_wall(a, dir).map(|_| ())
    }

    /// Cells that are linked to a particular cell by a passage.
    pub fn links(&self, coord: GridCoordinate) -> Option<CoordinateSmallVec> {
        self.walls(coord).map(|walls| {
            CompassPrimary::ALL.iter()
                .filter(|dir| !walls.has_wall(**dir))
                .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                .collect()
        })
    }

    /// Cells that are to the North, South, East or West of a particular cell, but not
    /// necessarily linked by a passage. Listed in `CompassPrimary::ALL` order.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL.iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    pub fn neighbours_at_directions(&self,
                                    coord: GridCoordinate,
                                    dirs: &[CompassPrimary])
                                    -> CoordinateOptionSmallVec {
        dirs.iter()
            .map(|direction| self.neighbour_at_direction(coord, *direction))
            .collect()
    }

    #[inline]
    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<GridCoordinate> {
        if self.is_valid_coordinate(coord) {
            coord.offset(direction, &self.dimensions)
        } else {
            None
        }
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: GridCoordinate, b: GridCoordinate) -> bool {
        self.direction_between(a, b)
            .map_or(false, |dir| !self.has_wall(a, dir))
    }

    pub fn is_neighbour_linked(&self, coord: GridCoordinate, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(coord, direction).is_some() && !self.has_wall(coord, direction)
    }

    /// Number of passages (open wall pairs) in the grid.
    pub fn links_count(&self) -> usize {
        self.iter_links().count()
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        self.dimensions.grid_coordinate_to_index(coord)
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        self.dimensions.is_valid_coordinate(coord)
    }

    #[inline]
    pub fn iter(&self) -> RectGridCellIter {
        RectGridCellIter::new(&self.dimensions)
    }

    #[inline]
    pub fn iter_row(&self) -> RectRowIter {
        RectRowIter::new(&self.dimensions)
    }

    /// Every passage in the grid once, as (cell, east or south neighbour) pairs in row-major
    /// order of the first cell.
    pub fn iter_links<'a>(&'a self) -> impl Iterator<Item = (GridCoordinate, GridCoordinate)> + 'a {
        self.iter().flat_map(move |coord| {
            FORWARD_DIRECTIONS.iter()
                .filter(move |dir| self.is_neighbour_linked(coord, **dir))
                .filter_map(move |dir| self.neighbour_at_direction(coord, *dir))
                .map(move |neighbour| (coord, neighbour))
        })
    }

    /// The maze as an undirected graph: one node per cell, weighted by its coordinate, with node
    /// indices matching `grid_coordinate_to_index`, and one edge per passage.
    pub fn passage_graph(&self) -> UnGraph<GridCoordinate, ()> {
        let (NodesCount(nodes), edges_hint) = self.dimensions.graph_size();
        let mut graph = UnGraph::with_capacity(nodes, edges_hint.0);
        let node_indices = self.iter().map(|coord| graph.add_node(coord)).collect::<Vec<_>>();

        for (a, b) in self.iter_links() {
            if let (Some(a_index), Some(b_index)) = (self.grid_coordinate_to_index(a),
                                                     self.grid_coordinate_to_index(b)) {
                graph.add_edge(node_indices[a_index], node_indices[b_index], ());
            }
        }
        graph
    }

    fn direction_between(&self, a: GridCoordinate, b: GridCoordinate) -> Option<CompassPrimary> {
        CompassPrimary::ALL.iter()
            .cloned()
            .find(|dir| self.neighbour_at_direction(a, *dir) == Some(b))
    }
}
