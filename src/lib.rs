//! # grid_replan
//!
//! The pathfinding and replanning core of a grid path visualizer. An agent
//! follows an [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) path from a
//! start cell to a goal cell on a 4-connected, uniform-cost grid while static
//! obstacles are painted in and moving obstacles bounce between the top and
//! bottom rows. Every agent step checks whether a moving obstacle will land on
//! the agent's cell one tick ahead and replans if so.
//!
//! The crate is organised leaves first:
//! - [grid] holds the obstacle field and answers occupancy queries,
//! - [solver] implements A* over any validity predicate,
//! - [dynamics] moves the obstacles,
//! - [session] owns the agent and performs one execution step at a time,
//! - [controller] drives both periodic activities on a virtual clock and reports
//!   [Event]s to an [EventSink].
//!
//! Cells are [Point]s from [grid_util].
pub mod config;
pub mod controller;
pub mod dynamics;
pub mod error;
pub mod grid;
pub mod session;
pub mod solver;
mod timer;

pub use config::{SessionConfig, SolverKind};
pub use controller::{Controller, Event, EventSink, RunState};
pub use error::{ConfigError, PathError};
pub use grid::ObstacleGrid;
pub use grid_util::point::Point;
pub use session::{Replan, Session, StepOutcome};

use smallvec::SmallVec;

/// Offsets of the von Neumann neighbourhood in expansion order: up, right, down, left.
/// Search results depend on this order when several shortest paths exist.
pub const NEUMANN_OFFSETS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// The four orthogonal neighbours of a cell in [NEUMANN_OFFSETS] order. Bounds are not checked.
/// Unlike [Point::neumann_neighborhood_smallvec] the order is fixed here, since the search's
/// tie-break depends on it.
pub fn neumann_neighborhood(point: &Point) -> SmallVec<[Point; 4]> {
    NEUMANN_OFFSETS
        .iter()
        .map(|(dx, dy)| Point::new(point.x + dx, point.y + dy))
        .collect()
}

/// Whether two cells are orthogonally adjacent, i.e. a single legal move apart.
pub fn is_unit_step(p1: &Point, p2: &Point) -> bool {
    p1.manhattan_distance(p2) == 1
}
