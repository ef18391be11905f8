//! Error types for maze construction and search input validation.

use core::fmt;
use grid_util::point::Point;
use thiserror::Error;

/// Which end of a search a rejected point was supplied as.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Goal => write!(f, "goal"),
        }
    }
}

/// Errors raised before a search runs or while building a [Maze](crate::maze::Maze).
///
/// An unreachable goal is not an error: searches report it as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("{endpoint} {point} lies outside the {width}x{height} maze")]
    OutOfBounds {
        endpoint: Endpoint,
        point: Point,
        width: usize,
        height: usize,
    },

    #[error("{endpoint} {point} is on a blocked cell")]
    Blocked { endpoint: Endpoint, point: Point },

    #[error("unknown cell code {0}")]
    UnknownCode(u8),

    #[error("unknown cell symbol {0:?}")]
    UnknownSymbol(char),

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("maze has no cells")]
    EmptyMaze,

    #[error("path point {0} lies outside the maze")]
    PathOutOfBounds(Point),

    #[error("path point {0} is on a blocked cell")]
    PathBlocked(Point),
}

pub type Result<T> = std::result::Result<T, SearchError>;
