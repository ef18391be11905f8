use crate::error::{Result, SearchError};
use crate::{Cell, NEIGHBOUR_OFFSETS};
use core::fmt;
use core::str::FromStr;
use grid_util::grid::{SimpleValueGrid, ValueGrid};
use grid_util::point::Point;
use itertools::Itertools;
use log::{debug, info};
use petgraph::unionfind::UnionFind;

/// [Maze] maintains information about components using a [UnionFind] structure in addition to
/// the raw [Cell] values in the [SimpleValueGrid]. Only [Cell::Blocked] separates components.
/// Implements [ValueGrid] by building on [SimpleValueGrid].
#[derive(Clone, Debug)]
pub struct Maze {
    pub grid: SimpleValueGrid<Cell>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Default for Maze {
    fn default() -> Maze {
        Maze {
            grid: SimpleValueGrid::default(),
            components: UnionFind::new(0),
            components_dirty: false,
        }
    }
}

impl Maze {
    fn from_grid(grid: SimpleValueGrid<Cell>) -> Maze {
        let mut maze = Maze {
            components: UnionFind::new(grid.width * grid.height),
            grid,
            components_dirty: false,
        };
        maze.generate_components();
        maze
    }

    fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Maze> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        if width == 0 {
            return Err(SearchError::EmptyMaze);
        }
        let mut values = Vec::with_capacity(width * height);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != width {
                return Err(SearchError::RaggedRow {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            values.extend(cells);
        }
        Ok(Maze::from_grid(SimpleValueGrid {
            width,
            height,
            values,
        }))
    }

    /// Builds a maze from rows of integer cell codes (see [Cell]).
    pub fn from_codes<R: AsRef<[u8]>>(rows: &[R]) -> Result<Maze> {
        let rows = rows
            .iter()
            .map(|row| {
                row.as_ref()
                    .iter()
                    .map(|&code| Cell::try_from(code).map_err(|_| SearchError::UnknownCode(code)))
                    .collect::<Result<Vec<Cell>>>()
            })
            .collect::<Result<Vec<Vec<Cell>>>>()?;
        Maze::from_rows(rows)
    }

    /// The cell at `point`, or [None] outside the maze.
    pub fn cell(&self, point: &Point) -> Option<Cell> {
        if self.point_in_bounds(*point) {
            Some(self.get_point(*point))
        } else {
            None
        }
    }

    pub fn passable(&self, point: &Point) -> bool {
        self.cell(point).is_some_and(Cell::passable)
    }

    /// Passable orthogonal neighbours of `point` in [NEIGHBOUR_OFFSETS] order.
    pub fn neighbours<'a>(&'a self, point: &Point) -> impl Iterator<Item = Point> + 'a {
        let (x, y) = (point.x, point.y);
        NEIGHBOUR_OFFSETS
            .into_iter()
            .filter_map(move |(dx, dy)| Some(Point::new(x.checked_add(dx)?, y.checked_add(dy)?)))
            .filter(move |p| self.passable(p))
    }

    /// First point holding `cell` in row-major order.
    pub fn find_cell(&self, cell: Cell) -> Option<Point> {
        let w = self.width() as i32;
        (0..self.height() as i32)
            .flat_map(|y| (0..w).map(move |x| Point::new(x, y)))
            .find(|p| self.get_point(*p) == cell)
    }

    /// Overlays [Cell::Path] on every point of `path`, leaving all other cells unchanged. Every
    /// point is checked before anything is written, so a rejected path leaves the maze untouched.
    pub fn mark_path(&mut self, path: &[Point]) -> Result<()> {
        for p in path {
            match self.cell(p) {
                None => return Err(SearchError::PathOutOfBounds(*p)),
                Some(Cell::Blocked) => return Err(SearchError::PathBlocked(*p)),
                Some(_) => {}
            }
        }
        for p in path {
            self.set_point(*p, Cell::Path);
        }
        debug!("Marked {} path cells", path.len());
        Ok(())
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> usize {
        self.components.find(self.get_ix_point(point))
    }

    /// Checks if start and goal are passable and on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component of passable cells.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.passable(start) && self.passable(goal) {
            !self
                .components
                .equiv(self.get_ix_point(start), self.get_ix_point(goal))
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up passable grid neighbours to the same
    /// components. Linking right and down from every cell covers all 4-neighbour pairs.
    pub fn generate_components(&mut self) {
        let w = self.width();
        let h = self.height();
        self.components = UnionFind::new(w * h);
        self.components_dirty = false;
        for x in 0..w as i32 {
            for y in 0..h as i32 {
                let point = Point::new(x, y);
                if !self.passable(&point) {
                    continue;
                }
                let parent_ix = self.get_ix_point(&point);
                let linked = [Point::new(x + 1, y), Point::new(x, y + 1)]
                    .into_iter()
                    .filter(|p| self.passable(p))
                    .map(|p| self.get_ix_point(&p))
                    .collect::<Vec<usize>>();
                for ix in linked {
                    self.components.union(parent_ix, ix);
                }
            }
        }
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height() as i32 {
            let symbols = (0..self.width() as i32)
                .map(|x| self.get(x, y).symbol())
                .join(" ");
            writeln!(f, "{}", symbols)?;
        }
        Ok(())
    }
}

impl FromStr for Maze {
    type Err = SearchError;

    /// Parses the text form written by [Display](fmt::Display). Whitespace between symbols is
    /// ignored and blank lines are skipped.
    fn from_str(s: &str) -> Result<Maze> {
        let rows = s
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(Cell::from_symbol)
                    .collect::<Result<Vec<Cell>>>()
            })
            .collect::<Result<Vec<Vec<Cell>>>>()?;
        Maze::from_rows(rows)
    }
}

impl ValueGrid<Cell> for Maze {
    fn new(width: usize, height: usize, default_value: Cell) -> Self {
        Maze::from_grid(SimpleValueGrid::new(width, height, default_value))
    }
    fn get(&self, x: i32, y: i32) -> Cell {
        self.grid.get(x, y)
    }
    /// Updates a position on the grid. Joins newly connected components and flags the components
    /// as dirty if components are (potentially) broken apart into multiple.
    fn set(&mut self, x: i32, y: i32, cell: Cell) {
        let p = Point::new(x, y);
        let was_passable = self.grid.get(x, y).passable();
        self.grid.set(x, y, cell);
        if !cell.passable() {
            if was_passable {
                self.components_dirty = true;
            }
        } else {
            let p_ix = self.get_ix_point(&p);
            let linked = self
                .neighbours(&p)
                .map(|n| self.get_ix_point(&n))
                .collect::<Vec<usize>>();
            for n_ix in linked {
                self.components.union(p_ix, n_ix);
            }
        }
    }
    fn width(&self) -> usize {
        self.grid.width()
    }
    fn height(&self) -> usize {
        self.grid.height()
    }
}
