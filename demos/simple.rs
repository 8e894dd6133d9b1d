use grid_replan::solver::{astar::AstarSolver, GridSolver};
use grid_replan::{ObstacleGrid, Point};

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Nodes have a 4-neighborhood

fn main() {
    let mut grid = ObstacleGrid::new(3, 3);
    grid.add_static(Point::new(1, 1));
    println!("{}", grid);
    let start = Point::new(0, 0);
    let end = Point::new(2, 2);
    let path = AstarSolver::new()
        .find_path(start, end, |p| grid.is_valid(p))
        .unwrap();
    println!("Path:");
    for p in path {
        println!("{:?}", p);
    }
}
