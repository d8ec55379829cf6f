use bit_set::BitSet;
use rand::Rng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::grid::{CellLinkError, Grid};

/// A cell next to the current one together with the direction taken to reach it.
pub type NeighbourSmallVec = SmallVec<[(GridCoordinate, CompassPrimary); 4]>;

/// Apply the recursive backtracker maze generation algorithm to the grid.
///
/// The grid is walled up completely first, then carved by a depth first walk from `start`. The
/// walk keeps an explicit stack rather than recursing, so grid size is not limited by the
/// thread's stack. Each step looks at the cell on top of the stack: if it has unvisited
/// neighbours one is chosen, the wall to it knocked down and the neighbour pushed; otherwise the
/// cell is popped and the walk backtracks.
///
/// `complexity` (0 to 1) is the chance that the next neighbour is picked at random rather than
/// taking the first one in north, south, east, west order. Low values give long straight
/// tunnels, high values many short twisty branches.
///
/// Every cell is visited exactly once so the passages form a spanning tree: a perfect maze.
pub fn recursive_backtracker<R: Rng>(grid: &mut Grid,
                                     start: GridCoordinate,
                                     complexity: f64,
                                     rng: &mut R)
                                     -> Result<(), CellLinkError> {

    let start_index = grid.grid_coordinate_to_index(start)
        .ok_or(CellLinkError::InvalidGridCoordinate)?;
    grid.reset();

    let mut visited = BitSet::with_capacity(grid.size());
    visited.insert(start_index);
    let mut stack = vec![start];

    while let Some(&current) = stack.last() {

        let neighbours = unvisited_neighbours(grid, current, &visited, complexity, rng);
        if neighbours.is_empty() {
            let _ = stack.pop();
            continue;
        }

        let (next, dir) = if rng.gen::<f64>() < complexity {
            neighbours[rng.gen_range(0..neighbours.len())]
        } else {
            neighbours[0]
        };

        grid.knock_down_wall(current, dir)?;
        if let Some(next_index) = grid.grid_coordinate_to_index(next) {
            visited.insert(next_index);
        }
        stack.push(next);
    }

    Ok(())
}

/// In-bound neighbours of `coord` that the walk has not reached yet, in north, south, east, west
/// order with the leading `floor(len * complexity)` entries shuffled.
fn unvisited_neighbours<R: Rng>(grid: &Grid,
                                coord: GridCoordinate,
                                visited: &BitSet,
                                complexity: f64,
                                rng: &mut R)
                                -> NeighbourSmallVec {

    let mut neighbours = CompassPrimary::ALL.iter()
        .filter_map(|dir| grid.neighbour_at_direction(coord, *dir).map(|n| (n, *dir)))
        .filter(|&(neighbour, _)| {
            grid.grid_coordinate_to_index(neighbour)
                .map_or(false, |index| !visited.contains(index))
        })
        .collect::<NeighbourSmallVec>();

    let shuffle_portion = (neighbours.len() as f64 * complexity).floor() as usize;
    neighbours[..shuffle_portion].shuffle(rng);

    neighbours
}
