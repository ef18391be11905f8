//! Best-first search over a [Maze]. Nodes live in an arena and refer to their parent by index,
//! the frontier is a [BinaryHeap] of arena indices ordered by f-score, and positions are settled
//! at most once. Stale frontier entries for settled positions are skipped when popped.
use crate::error::{Endpoint, Result, SearchError};
use crate::maze::Maze;
use crate::STEP_COST;
use core::fmt;
use grid_util::grid::{BoolGrid, ValueGrid};
use grid_util::point::Point;
use itertools::Itertools;
use log::{debug, trace, warn};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Admissible estimate of the remaining cost on a 4-connected unit-cost grid.
pub fn manhattan_distance(p1: &Point, p2: &Point) -> i32 {
    p1.manhattan_distance(p2) * STEP_COST
}

/// Rule used to order frontier nodes with equal f-score.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TieBreak {
    /// Prefer the node with the larger accumulated cost (and so the smaller heuristic), then
    /// the node inserted first.
    #[default]
    Deepest,
    /// Prefer the node inserted first.
    Insertion,
}

#[derive(Clone, Copy, Debug)]
struct SearchNode {
    position: Point,
    cost: i32,
    heuristic: i32,
    parent: Option<usize>,
}

struct FrontierEntry {
    estimated_cost: i32,
    tie: i32,
    index: usize,
}

impl Eq for FrontierEntry {}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the greatest entry: lowest f-score, then highest tie key, then the
        // lowest arena index, which is the insertion order.
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => self
                .tie
                .cmp(&other.tie)
                .then_with(|| other.index.cmp(&self.index)),
            s => s,
        }
    }
}

/// A position settled by the search, with the cost and heuristic it was settled at.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VisitedStep {
    /// Zero-based settle order.
    pub level: usize,
    pub position: Point,
    pub cost: i32,
    pub heuristic: i32,
}

impl fmt::Display for VisitedStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Level: {}, Position: ({}, {}), Cost: {}, Heuristic: {}",
            self.level, self.position.y, self.position.x, self.cost, self.heuristic
        )
    }
}

/// Everything a finished search produced. `visited` is filled whether or not a path was found;
/// when one was, the goal is the last visited entry.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub visited: Vec<VisitedStep>,
    pub path: Option<Vec<Point>>,
}

impl SearchOutcome {
    pub fn into_path_result(self) -> Option<PathResult> {
        let cost = self.visited.last().map_or(0, |step| step.cost);
        let visited = self.visited;
        self.path.map(|path| PathResult {
            path,
            cost,
            visited,
        })
    }
}

/// A lowest-cost path from start to goal, both inclusive.
#[derive(Clone, Debug)]
pub struct PathResult {
    pub path: Vec<Point>,
    /// Total step cost, one less than the number of points on the path.
    pub cost: i32,
    /// Settled positions in pop order.
    pub visited: Vec<VisitedStep>,
}

impl PathResult {
    /// Checks that consecutive points are exactly one orthogonal step apart.
    pub fn is_contiguous(&self) -> bool {
        self.path
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.manhattan_distance(b) == 1)
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let points = self
            .path
            .iter()
            .map(|p| format!("({}, {})", p.y, p.x))
            .join(" ");
        write!(f, "{}", points)
    }
}

fn reconstruct_path(nodes: &[SearchNode], index: usize) -> Vec<Point> {
    let mut path: Vec<Point> = std::iter::successors(Some(index), |&i| nodes[i].parent)
        .map(|i| nodes[i].position)
        .collect();
    path.reverse();
    path
}

fn check_endpoint(maze: &Maze, point: Point, endpoint: Endpoint) -> Result<()> {
    if !maze.point_in_bounds(point) {
        return Err(SearchError::OutOfBounds {
            endpoint,
            point,
            width: maze.width(),
            height: maze.height(),
        });
    }
    if !maze.passable(&point) {
        return Err(SearchError::Blocked { endpoint, point });
    }
    Ok(())
}

/// A* with the [manhattan_distance] heuristic and unit step cost over the passable cells of a
/// [Maze].
#[derive(Clone, Debug, Default)]
pub struct PathFinder {
    pub tie_break: TieBreak,
}

impl PathFinder {
    pub fn new() -> PathFinder {
        PathFinder {
            tie_break: TieBreak::Deepest,
        }
    }

    fn entry(&self, node: &SearchNode, index: usize) -> FrontierEntry {
        FrontierEntry {
            estimated_cost: node.cost + node.heuristic,
            tie: match self.tie_break {
                TieBreak::Deepest => node.cost,
                TieBreak::Insertion => 0,
            },
            index,
        }
    }

    /// Computes a lowest-cost path from start to goal. Returns `Ok(None)` if the goal is not
    /// reachable and an error if either endpoint lies outside the maze or on a blocked cell.
    pub fn find_path(&self, maze: &Maze, start: Point, goal: Point) -> Result<Option<PathResult>> {
        Ok(self.search(maze, start, goal)?.into_path_result())
    }

    /// Runs the search to completion and keeps the visited sequence even if no path exists.
    pub fn search(&self, maze: &Maze, start: Point, goal: Point) -> Result<SearchOutcome> {
        self.search_with(maze, start, goal, |_| {})
    }

    /// Like [search](Self::search), calling `on_settle` every time a position is settled. This
    /// is where a caller can pace or draw the search while it runs.
    pub fn search_with<F>(
        &self,
        maze: &Maze,
        start: Point,
        goal: Point,
        mut on_settle: F,
    ) -> Result<SearchOutcome>
    where
        F: FnMut(&VisitedStep),
    {
        check_endpoint(maze, start, Endpoint::Start)?;
        check_endpoint(maze, goal, Endpoint::Goal)?;

        let mut nodes = vec![SearchNode {
            position: start,
            cost: 0,
            heuristic: manhattan_distance(&start, &goal),
            parent: None,
        }];
        let mut frontier = BinaryHeap::new();
        frontier.push(self.entry(&nodes[0], 0));
        let mut explored = BoolGrid::new(maze.width(), maze.height(), false);
        let mut visited: Vec<VisitedStep> = Vec::new();

        while let Some(FrontierEntry { index, .. }) = frontier.pop() {
            let node = nodes[index];
            let pos = node.position;
            if explored.get(pos.x, pos.y) {
                continue;
            }
            explored.set(pos.x, pos.y, true);

            let step = VisitedStep {
                level: visited.len(),
                position: pos,
                cost: node.cost,
                heuristic: node.heuristic,
            };
            trace!("{}", step);
            on_settle(&step);
            visited.push(step);

            if pos == goal {
                debug!(
                    "Reached {} from {} at cost {} after settling {} cells",
                    goal,
                    start,
                    node.cost,
                    visited.len()
                );
                return Ok(SearchOutcome {
                    visited,
                    path: Some(reconstruct_path(&nodes, index)),
                });
            }

            for successor in maze.neighbours(&pos) {
                if explored.get(successor.x, successor.y) {
                    continue;
                }
                let child = SearchNode {
                    position: successor,
                    cost: node.cost + STEP_COST,
                    heuristic: manhattan_distance(&successor, &goal),
                    parent: Some(index),
                };
                frontier.push(self.entry(&child, nodes.len()));
                nodes.push(child);
            }
        }

        debug!(
            "{} is not reachable from {}, settled {} cells",
            goal,
            start,
            visited.len()
        );
        if !maze.components_dirty && maze.reachable(&start, &goal) {
            warn!("Reachable goal could not be pathed to, is the component structure correct?");
        }
        Ok(SearchOutcome {
            visited,
            path: None,
        })
    }
}
