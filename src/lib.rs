//! # maze_pathfinding
//!
//! Lowest-cost pathfinding on a fixed-size maze of blocked and open cells. Implements
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) on a 4-connected grid with unit step
//! cost and the [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) as
//! heuristic, which is admissible and consistent here so the first settled goal is optimal.
//!
//! Besides the path, a search reports every cell it settled in pop order, which is what
//! step-by-step visualisations consume. Marking the found path on the maze is a separate step
//! ([mark_path]) so the search itself never writes to the maze.
//!
//! Points are [grid_util::point::Point] values where `x` is the column and `y` the row.
pub mod error;
pub mod maze;
pub mod search;

pub use error::{Endpoint, Result, SearchError};
pub use maze::Maze;
pub use search::{
    manhattan_distance, PathFinder, PathResult, SearchOutcome, TieBreak, VisitedStep,
};

use grid_util::point::Point;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Cost of a single orthogonal step.
pub const STEP_COST: i32 = 1;

/// Offsets `(dx, dy)` of the 4-neighbourhood in the order successors are generated. The order
/// only decides which of several equally short paths is returned.
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Contents of a single maze cell. The discriminants are the integer encoding renderers use.
///
/// Only [Cell::Blocked] is impassable, the other markers are overlays on open cells.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Blocked = 1,
    Goal = 2,
    Start = 3,
    Path = 4,
}

impl Cell {
    /// Whether a search may step onto this cell.
    pub fn passable(self) -> bool {
        self != Cell::Blocked
    }

    /// Symbol used in the text form of a [Maze].
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Blocked => 'X',
            Cell::Goal => 'G',
            Cell::Start => 'S',
            Cell::Path => 'P',
        }
    }

    pub fn from_symbol(symbol: char) -> Result<Cell> {
        match symbol {
            '.' => Ok(Cell::Empty),
            'X' => Ok(Cell::Blocked),
            'G' => Ok(Cell::Goal),
            'S' => Ok(Cell::Start),
            'P' => Ok(Cell::Path),
            other => Err(SearchError::UnknownSymbol(other)),
        }
    }
}

/// Finds a lowest-cost path from start to goal with the default [PathFinder]. Returns `Ok(None)`
/// if the goal cannot be reached and an error if either endpoint is outside the maze or blocked.
pub fn find_path(maze: &Maze, start: Point, goal: Point) -> Result<Option<PathResult>> {
    PathFinder::new().find_path(maze, start, goal)
}

/// Overlays [Cell::Path] on every point of `path`. See [Maze::mark_path].
pub fn mark_path(maze: &mut Maze, path: &[Point]) -> Result<()> {
    maze.mark_path(path)
}
