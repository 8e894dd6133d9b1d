use crate::config::SolverKind;
use grid_util::point::Point;

pub mod astar;
pub mod indexed;

use astar::AstarSolver;
use indexed::IndexedAstarSolver;

/// A shortest-path search over a 4-connected grid with unit step cost. The grid is only
/// seen through the `is_valid` predicate, which is queried afresh for every neighbour so
/// that the caller's current obstacle state is used.
pub trait GridSolver {
    /// Computes a path from `start` to `goal`, both inclusive. The start cell is never
    /// checked against `is_valid`; the goal must satisfy it. `start == goal` gives `[start]`.
    fn find_path<F>(&self, start: Point, goal: Point, is_valid: F) -> Option<Vec<Point>>
    where
        F: Fn(&Point) -> bool;

    /// The Manhattan distance, admissible and consistent for orthogonal unit moves.
    fn heuristic(&self, p1: &Point, p2: &Point) -> i32 {
        p1.manhattan_distance(p2)
    }

    /// Number of unit moves along a path.
    fn get_path_cost(&self, path: &[Point]) -> usize {
        path.len().saturating_sub(1)
    }
}

/// Runs the solver selected by `kind`.
pub fn find_path<F>(kind: SolverKind, start: Point, goal: Point, is_valid: F) -> Option<Vec<Point>>
where
    F: Fn(&Point) -> bool,
{
    match kind {
        SolverKind::Scan => AstarSolver::new().find_path(start, goal, is_valid),
        SolverKind::Indexed => IndexedAstarSolver::new().find_path(start, goal, is_valid),
    }
}
