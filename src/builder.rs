//! Perfect maze construction: carving, entrance/exit placement and the read-only view handed to
//! renderers.

use std::convert::TryFrom;

use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use tracing::{debug, span, trace, Level};

use crate::cells::{GridCoordinate, Walls};
use crate::errors::{MazeError, MazeResult, PreconditionError, ValidationError};
use crate::generators;
use crate::grid::Grid;
use crate::grid_dimensions::RectGridDimensions;
use crate::pathing::{self, Distances};
use crate::renderers;
use crate::units::{CellSize, ColumnsCount, RowsCount};

/// Difficulty below which the start and end sit next to each other in the north west corner.
const ADJACENT_ENDPOINTS_BELOW: f64 = 0.1;
/// Difficulty below which the start and end are opposite corners of the grid.
const CORNER_ENDPOINTS_BELOW: f64 = 0.5;

/// Everything needed to describe a maze before it is carved.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MazeParameters {
    pub rows: usize,
    pub cols: usize,
    /// Pixels per cell side. Only renderers look at it.
    pub cell_size: u32,
    /// 0 gives long tunnels, 1 many short twisty branches.
    pub complexity: f64,
    /// 0 puts the start and end next to each other, 1 at the two ends of the longest path.
    pub difficulty: f64,
}

impl Default for MazeParameters {
    fn default() -> MazeParameters {
        MazeParameters {
            rows: 20,
            cols: 20,
            cell_size: 20,
            complexity: 0.75,
            difficulty: 0.75,
        }
    }
}

impl MazeParameters {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.rows < 2 {
            return Err(ValidationError::TooFewRows(self.rows));
        }
        if self.cols < 2 {
            return Err(ValidationError::TooFewColumns(self.cols));
        }
        let coordinates_fit = u32::try_from(self.rows).is_ok() && u32::try_from(self.cols).is_ok();
        if !coordinates_fit || self.rows.checked_mul(self.cols).is_none() {
            return Err(ValidationError::TooManyCells { rows: self.rows, cols: self.cols });
        }
        if self.cell_size == 0 {
            return Err(ValidationError::CellSizeNotPositive);
        }
        let (rows, cols) = (RowsCount(self.rows), ColumnsCount(self.cols));
        if renderers::image_dimensions(rows, cols, CellSize(self.cell_size)).is_none() {
            return Err(ValidationError::CellSizeTooLarge(self.cell_size));
        }
        if !(0.0..=1.0).contains(&self.complexity) {
            return Err(ValidationError::ComplexityOutOfRange(self.complexity));
        }
        if !(0.0..=1.0).contains(&self.difficulty) {
            return Err(ValidationError::DifficultyOutOfRange(self.difficulty));
        }
        Ok(())
    }
}

/// How far apart the start and end cells are placed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EndpointPolicy {
    /// Start (0, 0), end (1, 1).
    Adjacent,
    /// Start in the north west corner, end in the south east corner.
    OppositeCorners,
    /// The two ends of the maze's longest path.
    Diameter,
}

impl EndpointPolicy {
    pub fn from_difficulty(difficulty: f64) -> EndpointPolicy {
        if difficulty < ADJACENT_ENDPOINTS_BELOW {
            EndpointPolicy::Adjacent
        } else if difficulty < CORNER_ENDPOINTS_BELOW {
            EndpointPolicy::OppositeCorners
        } else {
            EndpointPolicy::Diameter
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuildState {
    /// Every wall is standing.
    Unbuilt,
    /// Passages form a spanning tree but no start or end has been chosen.
    Carved,
    Built {
        start: GridCoordinate,
        end: GridCoordinate,
    },
}

/// Owns a maze grid and the random source used to carve it.
///
/// ```
/// use perfect_mazes::builder::{MazeBuilder, MazeParameters};
///
/// let params = MazeParameters { rows: 8, cols: 12, ..MazeParameters::default() };
/// let mut maze = MazeBuilder::with_seed(params, 7).unwrap();
/// maze.generate().unwrap();
/// assert_eq!(maze.grid().unwrap().links_count(), 8 * 12 - 1);
/// ```
#[derive(Debug, Clone)]
pub struct MazeBuilder {
    params: MazeParameters,
    grid: Grid,
    rng: XorShiftRng,
    seed: u64,
    state: BuildState,
}

impl MazeBuilder {
    /// A builder whose random source is seeded from system entropy. The seed is kept so the same
    /// maze can be built again with `with_seed`.
    pub fn new(params: MazeParameters) -> MazeResult<MazeBuilder> {
        MazeBuilder::with_seed(params, rand::random())
    }

    pub fn with_seed(params: MazeParameters, seed: u64) -> MazeResult<MazeBuilder> {
        params.validate()?;
        debug!(seed = seed, rows = params.rows, cols = params.cols, "new maze builder");

        let dimensions = RectGridDimensions::new(RowsCount(params.rows), ColumnsCount(params.cols));
        Ok(MazeBuilder {
            params,
            grid: Grid::new(dimensions),
            rng: XorShiftRng::seed_from_u64(seed),
            seed,
            state: BuildState::Unbuilt,
        })
    }

    #[inline]
    pub fn parameters(&self) -> &MazeParameters {
        &self.params
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn state(&self) -> BuildState {
        self.state
    }

    #[inline]
    pub fn dimensions(&self) -> (RowsCount, ColumnsCount) {
        (self.grid.rows(), self.grid.columns())
    }

    #[inline]
    pub fn cell_size(&self) -> CellSize {
        CellSize(self.params.cell_size)
    }

    /// Carve a fresh set of passages starting from `start`, replacing any earlier maze.
    ///
    /// Any previously chosen start and end cells are forgotten.
    pub fn carve(&mut self, start: GridCoordinate) -> MazeResult<()> {
        generators::recursive_backtracker(&mut self.grid, start, self.params.complexity, &mut self.rng)
            .map_err(|_| MazeError::InvalidCoordinate(start))?;
        trace!(start = %start, links = self.grid.links_count(), "carved passages");

        self.state = BuildState::Carved;
        Ok(())
    }

    /// The two ends of a longest path through the carved maze.
    pub fn find_diameter_endpoints(&self) -> MazeResult<(GridCoordinate, GridCoordinate)> {
        self.require_carved()?;
        pathing::diameter_endpoints(&self.grid)
            .ok_or(MazeError::Precondition(PreconditionError::NotCarved))
    }

    /// Carve a new maze from a random cell and place the start and end according to the
    /// difficulty. May be called again to replace the maze with a new one.
    pub fn generate(&mut self) -> MazeResult<()> {
        let span = span!(Level::DEBUG, "generate", rows = self.params.rows, cols = self.params.cols);
        let _guard = span.enter();

        let carve_start = self.grid.random_cell(&mut self.rng);
        self.carve(carve_start)?;

        let policy = EndpointPolicy::from_difficulty(self.params.difficulty);
        let (start, end) = match policy {
            EndpointPolicy::Adjacent => (GridCoordinate::new(0, 0), GridCoordinate::new(1, 1)),
            EndpointPolicy::OppositeCorners => {
                (GridCoordinate::new(0, 0),
                 GridCoordinate::new(self.params.rows as u32 - 1, self.params.cols as u32 - 1))
            }
            EndpointPolicy::Diameter => self.find_diameter_endpoints()?,
        };
        debug!(carve_start = %carve_start, start = %start, end = %end, policy = ?policy,
               "maze generated");

        self.state = BuildState::Built { start, end };
        Ok(())
    }

    pub fn start_cell(&self) -> MazeResult<GridCoordinate> {
        self.endpoints().map(|(start, _)| start)
    }

    pub fn end_cell(&self) -> MazeResult<GridCoordinate> {
        self.endpoints().map(|(_, end)| end)
    }

    pub fn endpoints(&self) -> MazeResult<(GridCoordinate, GridCoordinate)> {
        match self.state {
            BuildState::Built { start, end } => Ok((start, end)),
            _ => Err(PreconditionError::NotGenerated.into()),
        }
    }

    /// Wall flags of the cell at (`row`, `col`).
    pub fn walls(&self, row: u32, col: u32) -> MazeResult<Walls> {
        self.require_carved()?;
        let coord = GridCoordinate::new(row, col);
        self.grid.walls(coord).ok_or(MazeError::InvalidCoordinate(coord))
    }

    /// The carved grid, for renderers and analysis that want more than single cell lookups.
    pub fn grid(&self) -> MazeResult<&Grid> {
        self.require_carved()?;
        Ok(&self.grid)
    }

    /// The cells walked from the start to the end, both included.
    pub fn solution_path(&self) -> MazeResult<Vec<GridCoordinate>> {
        let (start, end) = self.endpoints()?;
        Distances::new(&self.grid, start)
            .and_then(|distances| distances.path_to(end))
            .ok_or(MazeError::InvalidCoordinate(end))
    }

    fn require_carved(&self) -> MazeResult<()> {
        match self.state {
            BuildState::Unbuilt => Err(PreconditionError::NotCarved.into()),
            BuildState::Carved | BuildState::Built { .. } => Ok(()),
        }
    }
}


#[cfg(test)]
mod tests {

    use petgraph::algo::{connected_components, is_cyclic_undirected};
    use quickcheck::{quickcheck, TestResult};

    use super::*;
    use crate::cells::CompassPrimary;

    fn params(rows: usize, cols: usize, complexity: f64, difficulty: f64) -> MazeParameters {
        MazeParameters {
            rows,
            cols,
            complexity,
            difficulty,
            ..MazeParameters::default()
        }
    }

    fn generated(p: MazeParameters, seed: u64) -> MazeBuilder {
        let mut maze = MazeBuilder::with_seed(p, seed).expect("valid parameters");
        maze.generate().expect("generate failed");
        maze
    }

    fn gc(row: u32, col: u32) -> GridCoordinate {
        GridCoordinate::new(row, col)
    }

    fn is_spanning_tree(maze: &MazeBuilder) -> bool {
        let grid = maze.grid().expect("carved");
        let graph = grid.passage_graph();
        graph.edge_count() == grid.size() - 1 &&
        connected_components(&graph) == 1 &&
        !is_cyclic_undirected(&graph)
    }

    fn walls_are_symmetric_and_contained(maze: &MazeBuilder) -> bool {
        let grid = maze.grid().expect("carved");
        grid.iter().all(|coord| {
            CompassPrimary::ALL.iter().all(|dir| {
                match grid.neighbour_at_direction(coord, *dir) {
                    Some(neighbour) => {
                        grid.is_valid_coordinate(neighbour) &&
                        grid.has_wall(coord, *dir) == grid.has_wall(neighbour, dir.opposite())
                    }
                    None => grid.has_wall(coord, *dir),
                }
            })
        })
    }

    #[test]
    fn construction_rejects_bad_parameters() {
        assert_eq!(MazeBuilder::new(params(1, 5, 0.5, 0.5)).unwrap_err(),
                   MazeError::Validation(ValidationError::TooFewRows(1)));
        assert_eq!(MazeBuilder::new(params(5, 1, 0.5, 0.5)).unwrap_err(),
                   MazeError::Validation(ValidationError::TooFewColumns(1)));
        assert_eq!(MazeBuilder::new(params(5, 5, 1.5, 0.5)).unwrap_err(),
                   MazeError::Validation(ValidationError::ComplexityOutOfRange(1.5)));
        assert_eq!(MazeBuilder::new(params(5, 5, 0.5, -0.1)).unwrap_err(),
                   MazeError::Validation(ValidationError::DifficultyOutOfRange(-0.1)));

        let no_pixels = MazeParameters { cell_size: 0, ..MazeParameters::default() };
        assert_eq!(MazeBuilder::new(no_pixels).unwrap_err(),
                   MazeError::Validation(ValidationError::CellSizeNotPositive));

        let too_many_cells = params(1 << 33, 1 << 33, 0.5, 0.5);
        assert_eq!(too_many_cells.validate(),
                   Err(ValidationError::TooManyCells { rows: 1 << 33, cols: 1 << 33 }));
        let too_wide = params(2, u32::MAX as usize + 1, 0.5, 0.5);
        assert_eq!(MazeBuilder::new(too_wide).unwrap_err(),
                   MazeError::Validation(ValidationError::TooManyCells {
                       rows: 2,
                       cols: u32::MAX as usize + 1,
                   }));

        match MazeBuilder::new(params(5, 5, std::f64::NAN, 0.5)) {
            Err(MazeError::Validation(ValidationError::ComplexityOutOfRange(_))) => (),
            other => panic!("NaN complexity accepted: {:?}", other),
        }
    }

    #[test]
    fn cell_size_must_keep_the_image_side_in_u32() {
        let huge_cells = MazeParameters { rows: 2, cols: 2, cell_size: 3_000_000_000,
                                          ..MazeParameters::default() };
        assert_eq!(MazeBuilder::with_seed(huge_cells, 1).unwrap_err(),
                   MazeError::Validation(ValidationError::CellSizeTooLarge(3_000_000_000)));

        // 3 * 1_431_655_764 + 1 is two short of u32::MAX, one more column overflows.
        let widest = MazeParameters { rows: 2, cols: 3, cell_size: 1_431_655_764,
                                      ..MazeParameters::default() };
        assert_eq!(widest.validate(), Ok(()));
        let one_pixel_more = MazeParameters { cols: 4, ..widest };
        assert_eq!(one_pixel_more.validate(),
                   Err(ValidationError::CellSizeTooLarge(1_431_655_764)));
    }

    #[test]
    fn range_limits_are_inclusive() {
        assert!(MazeBuilder::new(params(2, 2, 0.0, 0.0)).is_ok());
        assert!(MazeBuilder::new(params(2, 2, 1.0, 1.0)).is_ok());
    }

    #[test]
    fn fresh_builder_is_fully_walled_and_unqueryable() {
        let maze = MazeBuilder::with_seed(params(4, 4, 0.5, 0.5), 1).unwrap();
        assert_eq!(maze.state(), BuildState::Unbuilt);
        assert_eq!(maze.start_cell(), Err(MazeError::Precondition(PreconditionError::NotGenerated)));
        assert_eq!(maze.end_cell(), Err(MazeError::Precondition(PreconditionError::NotGenerated)));
        assert_eq!(maze.walls(0, 0), Err(MazeError::Precondition(PreconditionError::NotCarved)));
        assert_eq!(maze.find_diameter_endpoints(),
                   Err(MazeError::Precondition(PreconditionError::NotCarved)));
        assert!(maze.grid().is_err());
        assert!(maze.solution_path().is_err());
    }

    #[test]
    fn carve_alone_does_not_place_endpoints() {
        let mut maze = MazeBuilder::with_seed(params(4, 4, 0.5, 0.5), 1).unwrap();
        maze.carve(gc(2, 2)).unwrap();
        assert_eq!(maze.state(), BuildState::Carved);
        assert!(maze.walls(0, 0).is_ok());
        assert!(maze.find_diameter_endpoints().is_ok());
        assert_eq!(maze.start_cell(), Err(MazeError::Precondition(PreconditionError::NotGenerated)));
        assert!(is_spanning_tree(&maze));
    }

    #[test]
    fn carve_rejects_cells_off_the_grid() {
        let mut maze = MazeBuilder::with_seed(params(4, 4, 0.5, 0.5), 1).unwrap();
        assert_eq!(maze.carve(gc(4, 0)), Err(MazeError::InvalidCoordinate(gc(4, 0))));
        assert_eq!(maze.state(), BuildState::Unbuilt);
    }

    #[test]
    fn wall_queries_off_the_grid_fail() {
        let maze = generated(params(3, 3, 0.5, 0.5), 5);
        assert_eq!(maze.walls(3, 0), Err(MazeError::InvalidCoordinate(gc(3, 0))));
        assert_eq!(maze.walls(0, 3), Err(MazeError::InvalidCoordinate(gc(0, 3))));
    }

    #[test]
    fn dimensions_and_cell_size() {
        let p = MazeParameters { rows: 6, cols: 9, cell_size: 12, ..MazeParameters::default() };
        let maze = MazeBuilder::with_seed(p, 0).unwrap();
        assert_eq!(maze.dimensions(), (RowsCount(6), ColumnsCount(9)));
        assert_eq!(maze.cell_size(), CellSize(12));
        assert_eq!(maze.parameters(), &p);
        assert_eq!(maze.seed(), 0);
    }

    #[test]
    fn low_difficulty_places_endpoints_side_by_side() {
        for seed in 0..20 {
            let maze = generated(params(7, 5, 0.8, 0.05), seed);
            assert_eq!(maze.start_cell(), Ok(gc(0, 0)));
            assert_eq!(maze.end_cell(), Ok(gc(1, 1)));
        }
    }

    #[test]
    fn medium_difficulty_uses_opposite_corners() {
        let maze = generated(params(7, 5, 0.8, 0.3), 9);
        assert_eq!(maze.endpoints(), Ok((gc(0, 0), gc(6, 4))));

        let boundary = generated(params(7, 5, 0.8, 0.1), 9);
        assert_eq!(boundary.endpoints(), Ok((gc(0, 0), gc(6, 4))));
    }

    #[test]
    fn high_difficulty_uses_diameter_endpoints() {
        let maze = generated(params(5, 5, 0.75, 0.9), 31);
        let independent = pathing::diameter_endpoints(maze.grid().unwrap()).unwrap();
        assert_eq!(maze.endpoints(), Ok(independent));
        assert_eq!(maze.find_diameter_endpoints(), Ok(independent));

        let boundary = generated(params(5, 5, 0.75, 0.5), 31);
        assert_eq!(boundary.endpoints(), boundary.find_diameter_endpoints());
    }

    #[test]
    fn policy_thresholds() {
        assert_eq!(EndpointPolicy::from_difficulty(0.0), EndpointPolicy::Adjacent);
        assert_eq!(EndpointPolicy::from_difficulty(0.099), EndpointPolicy::Adjacent);
        assert_eq!(EndpointPolicy::from_difficulty(0.1), EndpointPolicy::OppositeCorners);
        assert_eq!(EndpointPolicy::from_difficulty(0.499), EndpointPolicy::OppositeCorners);
        assert_eq!(EndpointPolicy::from_difficulty(0.5), EndpointPolicy::Diameter);
        assert_eq!(EndpointPolicy::from_difficulty(1.0), EndpointPolicy::Diameter);
    }

    #[test]
    fn straight_corridors_without_complexity() {
        let maze = generated(params(3, 3, 0.0, 0.0), 17);
        assert!(is_spanning_tree(&maze));
        assert_eq!(maze.endpoints(), Ok((gc(0, 0), gc(1, 1))));

        // From the corner the walk always heads south, then east, then north.
        let mut corner = MazeBuilder::with_seed(params(3, 3, 0.0, 0.0), 17).unwrap();
        corner.carve(gc(0, 0)).unwrap();
        let grid = corner.grid().unwrap();
        assert!(grid.is_linked(gc(0, 0), gc(1, 0)) && grid.is_linked(gc(1, 0), gc(2, 0)));
        assert!(grid.is_linked(gc(0, 2), gc(1, 2)) && grid.is_linked(gc(1, 2), gc(2, 2)));
        assert!(!grid.is_linked(gc(0, 0), gc(0, 1)));
    }

    #[test]
    fn regenerating_replaces_the_maze() {
        let mut maze = MazeBuilder::with_seed(params(10, 10, 0.75, 0.9), 4).unwrap();
        maze.generate().unwrap();
        let first = maze.grid().unwrap().clone();
        maze.generate().unwrap();
        assert!(is_spanning_tree(&maze));
        assert_ne!(&first, maze.grid().unwrap());

        maze.carve(gc(0, 0)).unwrap();
        assert_eq!(maze.state(), BuildState::Carved);
        assert!(maze.start_cell().is_err());
    }

    #[test]
    fn solution_path_joins_start_and_end() {
        let maze = generated(params(8, 11, 0.6, 0.9), 77);
        let (start, end) = maze.endpoints().unwrap();
        let path = maze.solution_path().unwrap();
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        let grid = maze.grid().unwrap();
        assert!(path.windows(2).all(|pair| grid.is_linked(pair[0], pair[1])));
    }

    #[test]
    fn every_cell_has_a_single_way_back() {
        // Each cell other than the fill's start must have exactly one passage leading one step
        // closer to it, otherwise there would be two distinct routes.
        let maze = generated(params(9, 13, 0.5, 0.5), 123);
        let grid = maze.grid().unwrap();
        let distances = Distances::new(grid, gc(0, 0)).unwrap();
        assert_eq!(distances.reachable_count(), grid.size());

        for coord in grid.iter().filter(|c| *c != gc(0, 0)) {
            let d = distances.distance_from_start_to(coord).unwrap();
            let closer = grid.links(coord).unwrap()
                .iter()
                .filter(|link| distances.distance_from_start_to(**link) == Some(d - 1))
                .count();
            assert_eq!(closer, 1, "{:?}", coord);
        }
    }

    #[test]
    fn quickcheck_generated_mazes_are_perfect() {
        fn prop(seed: u64, rows: u8, cols: u8, complexity: u8, difficulty: u8) -> TestResult {
            let p = params(2 + rows as usize % 14,
                           2 + cols as usize % 14,
                           f64::from(complexity % 101) / 100.0,
                           f64::from(difficulty % 101) / 100.0);
            let maze = generated(p, seed);

            let (start, end) = maze.endpoints().unwrap();
            let grid = maze.grid().unwrap();
            TestResult::from_bool(is_spanning_tree(&maze) &&
                                  walls_are_symmetric_and_contained(&maze) &&
                                  grid.is_valid_coordinate(start) &&
                                  grid.is_valid_coordinate(end))
        }
        quickcheck(prop as fn(u64, u8, u8, u8, u8) -> TestResult);
    }

    #[test]
    fn quickcheck_same_seed_same_maze() {
        fn prop(seed: u64, rows: u8, cols: u8, complexity: u8) -> bool {
            let p = params(2 + rows as usize % 12,
                           2 + cols as usize % 12,
                           f64::from(complexity % 101) / 100.0,
                           0.9);
            let a = generated(p, seed);
            let b = generated(p, seed);
            a.grid().unwrap() == b.grid().unwrap() && a.endpoints() == b.endpoints()
        }
        quickcheck(prop as fn(u64, u8, u8, u8) -> bool);
    }

    #[test]
    fn quickcheck_diameter_beats_sampled_pairs() {
        fn prop(seed: u64, samples: Vec<(u8, u8)>) -> bool {
            let maze = generated(params(7, 9, 0.75, 0.9), seed);
            let grid = maze.grid().unwrap();
            let (a, b) = maze.endpoints().unwrap();
            let diameter = Distances::new(grid, a).unwrap().distance_from_start_to(b).unwrap();

            samples.iter().all(|&(x, y)| {
                let from = grid.iter().nth(x as usize % grid.size()).unwrap();
                let to = grid.iter().nth(y as usize % grid.size()).unwrap();
                let d = Distances::new(grid, from).unwrap().distance_from_start_to(to).unwrap();
                d <= diameter
            })
        }
        quickcheck(prop as fn(u64, Vec<(u8, u8)>) -> bool);
    }
}
