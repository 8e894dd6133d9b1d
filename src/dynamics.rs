//! Moving obstacles bounce vertically between the top and bottom rows of the grid.
use grid_util::point::Point;
use log::trace;

/// Vertical heading of a [MovingObstacle]. Grid rows grow downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Down,
    Up,
}

impl Heading {
    /// The change in `y` per tick.
    pub fn delta(self) -> i32 {
        match self {
            Heading::Down => 1,
            Heading::Up => -1,
        }
    }

    pub fn reversed(self) -> Heading {
        match self {
            Heading::Down => Heading::Up,
            Heading::Up => Heading::Down,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovingObstacle {
    pub position: Point,
    pub heading: Heading,
}

impl MovingObstacle {
    /// A new obstacle, initially heading down.
    pub fn new(position: Point) -> MovingObstacle {
        MovingObstacle {
            position,
            heading: Heading::Down,
        }
    }

    /// Where the obstacle would be one tick from now if it kept its heading. No clamping or
    /// bounce is applied: the heading is already reversed on the boundary rows, but an obstacle
    /// placed outside the bouncing range (e.g. on a grid with fewer than three rows) is
    /// predicted to leave the grid.
    pub fn predicted(&self) -> Point {
        Point::new(self.position.x, self.position.y + self.heading.delta())
    }

    /// Moves one row along the heading and reverses once the top or bottom row is reached.
    pub fn advance(&mut self, rows: i32) {
        self.position.y += self.heading.delta();
        if self.position.y <= 0 || self.position.y >= rows - 1 {
            self.heading = self.heading.reversed();
        }
    }
}

/// Advances every obstacle by one tick.
pub fn tick(obstacles: &mut [MovingObstacle], rows: i32) {
    for obstacle in obstacles.iter_mut() {
        obstacle.advance(rows);
    }
    trace!("Advanced {} moving obstacles", obstacles.len());
}

/// Places `count` obstacles on the middle row, evenly spaced at multiples of
/// `cols / (count + 1)`. On grids narrower than `count + 1` columns the spacing is zero and
/// the obstacles stack in column 0.
pub fn spawn_row(count: usize, cols: i32, rows: i32) -> Vec<MovingObstacle> {
    let row = rows / 2;
    let spacing = cols / (count as i32 + 1);
    (1..=count as i32)
        .map(|i| MovingObstacle::new(Point::new(i * spacing, row)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounces_between_boundary_rows() {
        let rows = 5;
        let mut obstacle = MovingObstacle::new(Point::new(0, 2));
        let mut ys = vec![];
        for _ in 0..8 {
            obstacle.advance(rows);
            ys.push(obstacle.position.y);
        }
        assert_eq!(ys, vec![3, 4, 3, 2, 1, 0, 1, 2]);
    }

    #[test]
    fn heading_flips_on_reaching_edge() {
        let mut obstacle = MovingObstacle::new(Point::new(3, 3));
        obstacle.advance(5);
        assert_eq!(obstacle.position, Point::new(3, 4));
        assert_eq!(obstacle.heading, Heading::Up);
    }

    #[test]
    fn prediction_matches_next_position_inside_grid() {
        let rows = 6;
        let mut obstacle = MovingObstacle::new(Point::new(1, 3));
        for _ in 0..20 {
            let predicted = obstacle.predicted();
            obstacle.advance(rows);
            assert_eq!(predicted, obstacle.position);
        }
    }

    #[test]
    fn prediction_is_not_clamped() {
        let obstacle = MovingObstacle {
            position: Point::new(1, 0),
            heading: Heading::Up,
        };
        assert_eq!(obstacle.predicted(), Point::new(1, -1));
    }

    #[test]
    fn spawn_evenly_spaced_row() {
        let obstacles = spawn_row(5, 20, 15);
        let xs: Vec<i32> = obstacles.iter().map(|o| o.position.x).collect();
        assert_eq!(xs, vec![3, 6, 9, 12, 15]);
        assert!(obstacles
            .iter()
            .all(|o| o.position.y == 7 && o.heading == Heading::Down));
    }

    #[test]
    fn tick_moves_all() {
        let mut obstacles = spawn_row(2, 9, 9);
        tick(&mut obstacles, 9);
        assert_eq!(obstacles[0].position, Point::new(3, 5));
        assert_eq!(obstacles[1].position, Point::new(6, 5));
    }
}
