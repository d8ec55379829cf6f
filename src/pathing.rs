// Breadth first flood fill over the passages of a maze.
//
// Every passage is one step long so the first time the fill reaches a cell is along a shortest
// route; in a perfect maze that route is also the only one.

use crate::cells::GridCoordinate;
use crate::grid::Grid;


#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: GridCoordinate,
    distances: Vec<Option<u32>>,
    parents: Vec<Option<GridCoordinate>>,
    max_distance: u32,
    furthest_coordinate: GridCoordinate,
    columns: usize,
}

impl Distances {
    /// Flood fill the grid's passages from `start_coordinate`.
    /// Returns None if the start is not on the grid.
    pub fn new(grid: &Grid, start_coordinate: GridCoordinate) -> Option<Distances> {

        let start_index = grid.grid_coordinate_to_index(start_coordinate)?;

        let cells_count = grid.size();
        let mut distances = vec![None; cells_count];
        let mut parents = vec![None; cells_count];
        distances[start_index] = Some(0);

        let mut max = 0;
        let mut furthest = start_coordinate;

        // The frontier is processed in discovery order, so among equally distant cells the one
        // found first is kept as the furthest.
        let mut frontier = vec![start_coordinate];
        let mut distance_to_frontier = 0;
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {

                if distance_to_frontier > max {
                    max = distance_to_frontier;
                    furthest = *cell_coord;
                }

                let links = grid.links(*cell_coord).unwrap_or_default();
                for link_coordinate in &*links {
                    if let Some(link_index) = grid.grid_coordinate_to_index(*link_coordinate) {
                        if distances[link_index].is_none() {
                            distances[link_index] = Some(distance_to_frontier + 1);
                            parents[link_index] = Some(*cell_coord);
                            new_frontier.push(*link_coordinate);
                        }
                    }
                }
            }
            frontier = new_frontier;
            distance_to_frontier += 1;
        }

        Some(Distances {
            start_coordinate,
            distances,
            parents,
            max_distance: max,
            furthest_coordinate: furthest,
            columns: grid.columns().0,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// The first discovered of the cells furthest from the start.
    #[inline(always)]
    pub fn furthest_point(&self) -> GridCoordinate {
        self.furthest_coordinate
    }

    /// Steps from the start to `coord`, None if unreachable or not on the grid.
    pub fn distance_from_start_to(&self, coord: GridCoordinate) -> Option<u32> {
        self.index(coord).and_then(|i| self.distances[i])
    }

    /// The cell one step closer to the start on the way to `coord`.
    pub fn parent_of(&self, coord: GridCoordinate) -> Option<GridCoordinate> {
        self.index(coord).and_then(|i| self.parents[i])
    }

    /// Every cell the flood fill reached.
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_some()).count()
    }

    /// The cells from the start to `end_point` inclusive, following the flood fill back from
    /// the end. None if `end_point` cannot be reached.
    pub fn path_to(&self, end_point: GridCoordinate) -> Option<Vec<GridCoordinate>> {

        let end_distance = self.distance_from_start_to(end_point)?;

        let mut path = Vec::with_capacity(end_distance as usize + 1);
        let mut current_coord = end_point;
        path.push(current_coord);
        while current_coord != self.start_coordinate {
            current_coord = self.parent_of(current_coord)?;
            path.push(current_coord);
        }

        path.reverse();
        Some(path)
    }

    fn index(&self, coord: GridCoordinate) -> Option<usize> {
        let index = coord.row as usize * self.columns + coord.col as usize;
        if (coord.col as usize) < self.columns && index < self.distances.len() {
            Some(index)
        } else {
            None
        }
    }
}

/// The two ends of a longest path through a perfect maze.
///
/// The cell furthest from an arbitrary start, here the north west corner, is always one end of
/// some longest path in a tree; the cell furthest from that is the other end.
pub fn diameter_endpoints(grid: &Grid) -> Option<(GridCoordinate, GridCoordinate)> {
    let first_distances = Distances::new(grid, GridCoordinate::new(0, 0))?;
    let end_a = first_distances.furthest_point();

    let distances_from_a = Distances::new(grid, end_a)?;
    let end_b = distances_from_a.furthest_point();

    Some((end_a, end_b))
}
