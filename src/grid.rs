use crate::dynamics::MovingObstacle;
use crate::neumann_neighborhood;
use core::fmt;
use grid_util::grid::{BoolGrid, Grid};
use grid_util::point::Point;
use log::debug;
use petgraph::unionfind::UnionFind;

/// [ObstacleGrid] is the fixed-size obstacle field. Static obstacles are stored as the raw [bool]
/// values of a [BoolGrid] that mark a cell as occupied ([true]) or empty ([false]); moving
/// obstacles are kept as an ordered list whose current positions are also occupied.
#[derive(Clone, Debug)]
pub struct ObstacleGrid {
    cols: i32,
    rows: i32,
    statics: BoolGrid,
    static_count: usize,
    pub moving: Vec<MovingObstacle>,
}

impl ObstacleGrid {
    pub fn new(cols: i32, rows: i32) -> ObstacleGrid {
        ObstacleGrid {
            cols,
            rows,
            statics: BoolGrid::new(cols.max(0) as usize, rows.max(0) as usize, false),
            static_count: 0,
            moving: Vec::new(),
        }
    }
    pub fn cols(&self) -> i32 {
        self.cols
    }
    pub fn rows(&self) -> i32 {
        self.rows
    }
    pub fn in_bounds(&self, point: &Point) -> bool {
        point.x >= 0 && point.y >= 0 && point.x < self.cols && point.y < self.rows
    }
    pub fn is_static(&self, point: &Point) -> bool {
        self.in_bounds(point) && self.statics.get(point.x as usize, point.y as usize)
    }
    pub fn is_moving(&self, point: &Point) -> bool {
        self.moving.iter().any(|o| o.position == *point)
    }
    /// Whether a static or moving obstacle currently sits on the cell.
    pub fn is_occupied(&self, point: &Point) -> bool {
        self.is_static(point) || self.is_moving(point)
    }
    /// A cell can be entered if it lies on the grid and holds no obstacle right now.
    pub fn is_valid(&self, point: &Point) -> bool {
        self.in_bounds(point) && !self.is_occupied(point)
    }
    /// Marks a cell as a static obstacle. Returns [false] if the cell is out of bounds or was
    /// already blocked.
    pub fn add_static(&mut self, point: Point) -> bool {
        if !self.in_bounds(&point) || self.is_static(&point) {
            return false;
        }
        self.statics.set(point.x as usize, point.y as usize, true);
        self.static_count += 1;
        true
    }
    pub fn clear_static(&mut self) {
        self.statics = BoolGrid::new(self.cols.max(0) as usize, self.rows.max(0) as usize, false);
        self.static_count = 0;
    }
    /// Removes every static and moving obstacle.
    pub fn clear(&mut self) {
        self.clear_static();
        self.moving.clear();
    }
    pub fn static_count(&self) -> usize {
        self.static_count
    }
    /// Static obstacle cells in row-major order.
    pub fn static_obstacles(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.rows)
            .flat_map(move |y| (0..self.cols).map(move |x| Point::new(x, y)))
            .filter(move |p| self.statics.get(p.x as usize, p.y as usize))
    }
    fn ix(&self, point: &Point) -> usize {
        (point.y * self.cols + point.x) as usize
    }
    /// Links up orthogonally adjacent free cells of the current snapshot into connected
    /// components. Moving obstacles count as blocked at their current positions.
    pub fn components(&self) -> UnionFind<usize> {
        let mut components = UnionFind::new((self.cols * self.rows).max(0) as usize);
        for y in 0..self.rows {
            for x in 0..self.cols {
                let point = Point::new(x, y);
                if !self.is_valid(&point) {
                    continue;
                }
                let parent_ix = self.ix(&point);
                // Right and down neighbours suffice to visit every edge once
                for n in [Point::new(x + 1, y), Point::new(x, y + 1)] {
                    if self.is_valid(&n) {
                        components.union(parent_ix, self.ix(&n));
                    }
                }
            }
        }
        components
    }
    /// Checks if the goal can be reached from the start over free cells. The start cell itself
    /// may be occupied (the agent may be standing next to or under an obstacle), but at least
    /// one of its free neighbours must share a component with a free goal. A cell is always
    /// reachable from itself, occupied or not, as the solvers return `[start]` in that case.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        if !self.in_bounds(start) {
            return false;
        }
        if start == goal {
            return true;
        }
        if !self.is_valid(goal) {
            return false;
        }
        let components = self.components();
        let goal_ix = self.ix(goal);
        let reachable = neumann_neighborhood(start)
            .iter()
            .any(|n| self.is_valid(n) && components.equiv(self.ix(n), goal_ix));
        if !reachable {
            debug!("{} is not reachable from {}", goal, start);
        }
        reachable
    }
}

impl fmt::Display for ObstacleGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.rows {
            let row = (0..self.cols)
                .map(|x| {
                    let p = Point::new(x, y);
                    if self.is_moving(&p) {
                        'M'
                    } else if self.is_static(&p) {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{astar::AstarSolver, GridSolver};

    #[test]
    fn validity_covers_bounds_and_both_obstacle_kinds() {
        let mut grid = ObstacleGrid::new(4, 3);
        grid.add_static(Point::new(1, 1));
        grid.moving.push(MovingObstacle::new(Point::new(2, 2)));
        assert!(grid.is_valid(&Point::new(0, 0)));
        assert!(!grid.is_valid(&Point::new(1, 1)));
        assert!(!grid.is_valid(&Point::new(2, 2)));
        assert!(!grid.is_valid(&Point::new(-1, 0)));
        assert!(!grid.is_valid(&Point::new(4, 0)));
        assert!(!grid.is_valid(&Point::new(0, 3)));
    }

    #[test]
    fn is_valid_is_idempotent() {
        let mut grid = ObstacleGrid::new(5, 5);
        grid.add_static(Point::new(2, 2));
        for y in -1..6 {
            for x in -1..6 {
                let p = Point::new(x, y);
                let first = grid.is_valid(&p);
                assert_eq!(first, grid.is_valid(&p));
                assert_eq!(first, grid.is_valid(&p));
            }
        }
    }

    #[test]
    fn add_static_rejects_duplicates() {
        let mut grid = ObstacleGrid::new(3, 3);
        assert!(grid.add_static(Point::new(0, 1)));
        assert!(!grid.add_static(Point::new(0, 1)));
        assert!(!grid.add_static(Point::new(3, 1)));
        assert_eq!(grid.static_count(), 1);
        assert_eq!(grid.static_obstacles().collect::<Vec<_>>(), vec![Point::new(0, 1)]);
        grid.clear();
        assert_eq!(grid.static_count(), 0);
        assert_eq!(grid.static_obstacles().count(), 0);
    }

    /// Tests whether cells are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // Corresponds to the following 3x2 grid:
        //  ___
        // | # |
        // | # |
        //  ___
        let mut grid = ObstacleGrid::new(3, 2);
        grid.add_static(Point::new(1, 0));
        grid.add_static(Point::new(1, 1));
        let components = grid.components();
        assert!(components.equiv(0, 3));
        assert!(!components.equiv(0, 2));
        assert!(components.equiv(2, 5));
        assert!(!grid.reachable(&Point::new(0, 0), &Point::new(2, 0)));
        assert!(grid.reachable(&Point::new(0, 0), &Point::new(0, 1)));
    }

    #[test]
    fn moving_obstacles_split_components() {
        // |S.M.G|
        let mut grid = ObstacleGrid::new(5, 1);
        let start = Point::new(0, 0);
        let goal = Point::new(4, 0);
        assert!(grid.reachable(&start, &goal));
        grid.moving.push(MovingObstacle::new(Point::new(2, 0)));
        assert!(!grid.reachable(&start, &goal));
    }

    #[test]
    fn occupied_cell_is_reachable_from_itself() {
        let mut grid = ObstacleGrid::new(3, 3);
        let cell = Point::new(1, 1);
        grid.add_static(cell);
        assert!(grid.reachable(&cell, &cell));
        let path = AstarSolver::new().find_path(cell, cell, |p| grid.is_valid(p));
        assert_eq!(path, Some(vec![cell]));
        // Any other occupied goal stays unreachable
        grid.add_static(Point::new(0, 0));
        assert!(!grid.reachable(&cell, &Point::new(0, 0)));
    }

    #[test]
    fn display_marks_obstacles() {
        let mut grid = ObstacleGrid::new(3, 2);
        grid.add_static(Point::new(0, 0));
        grid.moving.push(MovingObstacle::new(Point::new(2, 1)));
        assert_eq!(grid.to_string(), "#..\n..M\n");
    }
}
