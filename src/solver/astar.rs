use fxhash::{FxHashMap, FxHashSet};
use grid_util::point::Point;
use itertools::Itertools;
use log::trace;

use crate::{neumann_neighborhood, solver::GridSolver};

struct SearchNode {
    point: Point,
    g: i32,
    f: i32,
    parent: Option<usize>,
}

/// A* with an open list scanned linearly for the node of smallest `f`. Among nodes of equal
/// `f` the one that entered the open list first wins, which fixes the path returned when
/// several shortest paths exist.
#[derive(Clone, Debug, Default)]
pub struct AstarSolver;

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver
    }
}

fn reverse_path(nodes: &[SearchNode], end: usize) -> Vec<Point> {
    let mut path: Vec<Point> = std::iter::successors(Some(end), |&ix| nodes[ix].parent)
        .map(|ix| nodes[ix].point)
        .collect();
    path.reverse();
    path
}

impl GridSolver for AstarSolver {
    fn find_path<F>(&self, start: Point, goal: Point, is_valid: F) -> Option<Vec<Point>>
    where
        F: Fn(&Point) -> bool,
    {
        // Node arena; parents are indices into it
        let mut nodes = vec![SearchNode {
            point: start,
            g: 0,
            f: self.heuristic(&start, &goal),
            parent: None,
        }];
        // Open list in insertion order, plus a lookup from cell to arena index
        let mut open: Vec<usize> = vec![0];
        let mut open_lookup: FxHashMap<Point, usize> = FxHashMap::default();
        open_lookup.insert(start, 0);
        let mut closed: FxHashSet<Point> = FxHashSet::default();

        loop {
            let Some(pos) = open.iter().position_min_by_key(|&&ix| nodes[ix].f) else {
                break;
            };
            let current = open.remove(pos);
            let point = nodes[current].point;
            open_lookup.remove(&point);
            if point == goal {
                trace!(
                    "Reached {} after closing {} of {} nodes",
                    goal,
                    closed.len(),
                    nodes.len()
                );
                return Some(reverse_path(&nodes, current));
            }
            closed.insert(point);

            let tentative_g = nodes[current].g + 1;
            for neighbour in neumann_neighborhood(&point) {
                if !is_valid(&neighbour) || closed.contains(&neighbour) {
                    continue;
                }
                let h = self.heuristic(&neighbour, &goal);
                match open_lookup.get(&neighbour) {
                    None => {
                        let ix = nodes.len();
                        nodes.push(SearchNode {
                            point: neighbour,
                            g: tentative_g,
                            f: tentative_g + h,
                            parent: Some(current),
                        });
                        open.push(ix);
                        open_lookup.insert(neighbour, ix);
                    }
                    Some(&ix) if tentative_g < nodes[ix].g => {
                        let node = &mut nodes[ix];
                        node.g = tentative_g;
                        node.f = tentative_g + h;
                        node.parent = Some(current);
                    }
                    Some(_) => {}
                }
            }
        }
        trace!("Open list exhausted after closing {} nodes", closed.len());
        None
    }
}
