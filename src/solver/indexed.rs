//! A* over an insertion-ordered node table with a binary heap frontier, in the manner of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html).
//!
//! Stale heap entries are skipped when popped instead of being removed when a cheaper route is
//! found. The heap breaks `f` ties towards the larger `g`, so among several shortest paths it may
//! return a different one than [AstarSolver](super::astar::AstarSolver).
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::trace;
use num_traits::Zero;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

use crate::{neumann_neighborhood, solver::GridSolver};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

struct SmallestCostHolder<K> {
    estimated_cost: K,
    cost: K,
    index: usize,
}

impl<K: PartialEq> Eq for SmallestCostHolder<K> {}

impl<K: PartialEq> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.cost.eq(&other.cost)
    }
}

impl<K: Ord> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest estimated cost first, then largest cost (deepest node) first
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => self.cost.cmp(&other.cost),
            s => s,
        }
    }
}

fn reverse_path<N, C>(parents: &FxIndexMap<N, (usize, C)>, start: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
{
    let mut path: Vec<N> = std::iter::successors(Some(start), |&i| {
        parents.get_index(i).map(|(_, &(parent, _))| parent)
    })
    .map_while(|i| parents.get_index(i).map(|(node, _)| node.clone()))
    .collect();
    path.reverse();
    path
}

/// Generic A* returning the path and its cost. `successors` yields neighbours with their move
/// cost; nodes are identified by their position in an [IndexMap] so that parents are plain
/// indices.
pub fn astar_indexed<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
) -> Option<(Vec<N>, C)>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let mut to_see = BinaryHeap::new();
    to_see.push(SmallestCostHolder {
        estimated_cost: Zero::zero(),
        cost: Zero::zero(),
        index: 0,
    });
    let mut parents: FxIndexMap<N, (usize, C)> = FxIndexMap::default();
    parents.insert(start.clone(), (usize::MAX, Zero::zero()));
    while let Some(SmallestCostHolder { cost, index, .. }) = to_see.pop() {
        let successors = {
            let (node, &(_, c)) = parents.get_index(index)?;
            if success(node) {
                let path = reverse_path(&parents, index);
                trace!("Reached goal with {} indexed nodes", parents.len());
                return Some((path, cost));
            }
            // A node may sit in the heap several times if a cheaper route was found later;
            // only the entry matching the recorded cost is expanded.
            if cost > c {
                continue;
            }
            successors(node)
        };
        for (successor, move_cost) in successors {
            let new_cost = cost + move_cost;
            let h;
            let n;
            match parents.entry(successor) {
                Vacant(e) => {
                    h = heuristic(e.key());
                    n = e.index();
                    e.insert((index, new_cost));
                }
                Occupied(mut e) => {
                    if e.get().1 > new_cost {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert((index, new_cost));
                    } else {
                        continue;
                    }
                }
            }

            to_see.push(SmallestCostHolder {
                estimated_cost: new_cost + h,
                cost: new_cost,
                index: n,
            });
        }
    }
    trace!("Frontier exhausted after indexing {} nodes", parents.len());
    None
}

/// A* backed by [astar_indexed]. Faster than the linear scan on large grids.
#[derive(Clone, Debug, Default)]
pub struct IndexedAstarSolver;

impl IndexedAstarSolver {
    pub fn new() -> IndexedAstarSolver {
        IndexedAstarSolver
    }
}

impl GridSolver for IndexedAstarSolver {
    fn find_path<F>(&self, start: Point, goal: Point, is_valid: F) -> Option<Vec<Point>>
    where
        F: Fn(&Point) -> bool,
    {
        let is_valid = &is_valid;
        astar_indexed(
            &start,
            move |node| {
                neumann_neighborhood(node)
                    .into_iter()
                    .filter(move |p| is_valid(p))
                    .map(|p| (p, 1))
            },
            |point| self.heuristic(point, &goal),
            |point| *point == goal,
        )
        .map(|(path, _cost)| path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ObstacleGrid;
    use crate::solver::astar::AstarSolver;

    fn solve(grid: &ObstacleGrid, start: Point, goal: Point) -> Option<Vec<Point>> {
        IndexedAstarSolver::new().find_path(start, goal, |p| grid.is_valid(p))
    }

    #[test]
    fn equal_start_goal() {
        let grid = ObstacleGrid::new(2, 2);
        let start = Point::new(1, 1);
        assert_eq!(solve(&grid, start, start), Some(vec![start]));
    }

    #[test]
    fn reports_cost() {
        let grid = &ObstacleGrid::new(10, 8);
        let (path, cost) = astar_indexed(
            &Point::new(1, 6),
            move |node| {
                neumann_neighborhood(node)
                    .into_iter()
                    .filter(move |p| grid.is_valid(p))
                    .map(|p| (p, 1))
            },
            |p| p.manhattan_distance(&Point::new(8, 1)),
            |p| *p == Point::new(8, 1),
        )
        .unwrap();
        assert_eq!(cost, 12);
        assert_eq!(path.len(), 13);
    }

    #[test]
    fn matches_scan_solver_length() {
        //  ______
        // |S  #  |
        // | # # #|
        // | #   G|
        //  ______
        let mut grid = ObstacleGrid::new(6, 3);
        for p in [(3, 0), (1, 1), (3, 1), (5, 1), (1, 2)] {
            grid.add_static(Point::new(p.0, p.1));
        }
        let start = Point::new(0, 0);
        let goal = Point::new(5, 2);
        let indexed = solve(&grid, start, goal).unwrap();
        let scan = AstarSolver::new()
            .find_path(start, goal, |p| grid.is_valid(p))
            .unwrap();
        assert_eq!(indexed.len(), scan.len());
        assert_eq!(indexed.first(), Some(&start));
        assert_eq!(indexed.last(), Some(&goal));
    }

    #[test]
    fn enclosed_goal_is_not_found() {
        let mut grid = ObstacleGrid::new(3, 3);
        grid.add_static(Point::new(1, 0));
        grid.add_static(Point::new(1, 1));
        grid.add_static(Point::new(1, 2));
        assert!(solve(&grid, Point::new(0, 0), Point::new(2, 2)).is_none());
    }
}
