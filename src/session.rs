//! The mutable state of one visualizer session and the single-step execution rule.
//!
//! A [Session] owns the obstacle field, the agent, its remaining path and the cells it has
//! already visited. It knows nothing about time: the [Controller](crate::Controller) decides
//! when [Session::step] and [Session::tick_obstacles] run.
use crate::config::{SessionConfig, SolverKind};
use crate::dynamics::{self, MovingObstacle};
use crate::error::PathError;
use crate::grid::ObstacleGrid;
use crate::solver;
use core::fmt;
use grid_util::point::Point;
use log::{debug, info, warn};
use rand::Rng;
use std::collections::VecDeque;

/// What happened to the path during a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Replan {
    /// No moving obstacle threatened the agent's cell.
    NotNeeded,
    /// A collision was predicted and a fresh path replaced the old one.
    Rerouted,
    /// A collision was predicted but no path exists from the current cell; the old path is kept.
    KeptStale,
}

/// Result of a step that did not end in a collision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The agent moved and has path left to follow.
    Moved { to: Point, replan: Replan },
    /// The agent consumed the last cell of its path.
    GoalReached { at: Point },
}

#[derive(Clone, Debug)]
pub struct Session {
    pub grid: ObstacleGrid,
    start: Point,
    goal: Point,
    agent: Point,
    path: VecDeque<Point>,
    traveled: Vec<Point>,
    solver: SolverKind,
    density_divisor: usize,
}

impl Session {
    pub fn new(config: &SessionConfig) -> Session {
        let start = config.start();
        Session {
            grid: ObstacleGrid::new(config.cols(), config.rows()),
            start,
            goal: config.goal(),
            agent: start,
            path: VecDeque::new(),
            traveled: Vec::new(),
            solver: config.search.solver,
            density_divisor: config.obstacles.density_divisor.max(1),
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }
    pub fn goal(&self) -> Point {
        self.goal
    }
    pub fn agent(&self) -> Point {
        self.agent
    }
    /// The cells still to be visited, the next one first.
    pub fn path(&self) -> &VecDeque<Point> {
        &self.path
    }
    pub fn traveled(&self) -> &[Point] {
        &self.traveled
    }
    pub fn moving_obstacles(&self) -> &[MovingObstacle] {
        &self.grid.moving
    }
    pub fn is_valid(&self, point: &Point) -> bool {
        self.grid.is_valid(point)
    }

    /// Places a static obstacle unless the cell is invalid or is the start or goal cell.
    /// Rejected placements are silently ignored.
    pub fn add_obstacle(&mut self, point: Point) -> bool {
        if point == self.start || point == self.goal || !self.grid.is_valid(&point) {
            return false;
        }
        self.grid.add_static(point)
    }

    /// Replaces all obstacles with `rows * cols / density_divisor` distinct random static
    /// obstacles that avoid the start and goal, then resets the agent and plans a path.
    pub fn randomize_obstacles<R: Rng>(&mut self, rng: &mut R) -> Result<(), PathError> {
        self.grid.clear();
        let cols = self.grid.cols();
        let rows = self.grid.rows();
        let cells = (cols * rows) as usize;
        let target = (cells / self.density_divisor).min(cells.saturating_sub(2));
        while self.grid.static_count() < target {
            let p = Point::new(rng.gen_range(0..cols), rng.gen_range(0..rows));
            if p != self.start && p != self.goal {
                self.grid.add_static(p);
            }
        }
        info!("Placed {} random static obstacles", target);
        self.reset_agent();
        self.plan()
    }

    /// Replaces all obstacles with a row of `count` moving obstacles, then resets the agent and
    /// plans a path.
    pub fn spawn_moving_obstacles(&mut self, count: usize) -> Result<(), PathError> {
        self.grid.clear();
        self.grid.moving = dynamics::spawn_row(count, self.grid.cols(), self.grid.rows());
        info!("Spawned {} moving obstacles", self.grid.moving.len());
        self.reset_agent();
        self.plan()
    }

    /// Removes every obstacle, forgets the path and resets the agent.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.path.clear();
        self.reset_agent();
    }

    /// Moves the agent back to the start cell and forgets where it has been.
    pub fn reset_agent(&mut self) {
        self.agent = self.start;
        self.traveled.clear();
    }

    /// Prepares a new run from wherever the agent stands.
    pub fn begin_run(&mut self) {
        self.traveled.clear();
    }

    fn search(&self, from: Point) -> Option<Vec<Point>> {
        solver::find_path(self.solver, from, self.goal, |p| self.grid.is_valid(p))
    }

    /// Plans a path from the agent to the goal, replacing the current path. On failure the
    /// path is left empty.
    pub fn plan(&mut self) -> Result<(), PathError> {
        match self.search(self.agent) {
            Some(path) => {
                info!(
                    "Planned {} steps from {} to {}",
                    path.len().saturating_sub(1),
                    self.agent,
                    self.goal
                );
                self.path = path.into();
                Ok(())
            }
            None => {
                info!("{} is not reachable from {}", self.goal, self.agent);
                self.path.clear();
                Err(PathError::Unreachable {
                    start: self.agent,
                    goal: self.goal,
                })
            }
        }
    }

    /// Whether some moving obstacle will be on the agent's cell after the next obstacle tick.
    pub fn collision_predicted(&self) -> bool {
        self.grid
            .moving
            .iter()
            .any(|o| o.predicted() == self.agent)
    }

    /// Advances the agent by one cell:
    /// 1. the next cell is taken from the path, recorded as traveled and becomes the agent cell,
    /// 2. if that cell holds an obstacle the agent is reset and [PathError::Collision] returned,
    /// 3. if a moving obstacle is predicted to enter the cell, the path is replanned from it; the
    ///    new path starts with the neighbour to move to, so the agent leaves the threatened cell
    ///    on the next step,
    /// 4. if no path remains the goal has been reached.
    pub fn step(&mut self) -> Result<StepOutcome, PathError> {
        let next = self.path.pop_front().ok_or(PathError::NoPath)?;
        self.traveled.push(next);
        self.agent = next;

        if self.grid.is_occupied(&next) {
            warn!("Agent collided with an obstacle at {}", next);
            self.reset_agent();
            return Err(PathError::Collision { cell: next });
        }

        let mut replan = Replan::NotNeeded;
        if self.collision_predicted() {
            debug!("Collision predicted at {}, replanning", next);
            replan = match self.search(next) {
                Some(path) => {
                    self.path = path.into_iter().skip(1).collect();
                    Replan::Rerouted
                }
                None => {
                    warn!(
                        "No detour from {}; continuing on the previous path of {} cells",
                        next,
                        self.path.len()
                    );
                    Replan::KeptStale
                }
            };
        }

        if self.path.is_empty() {
            info!("Goal reached at {}", next);
            return Ok(StepOutcome::GoalReached { at: next });
        }
        Ok(StepOutcome::Moved { to: next, replan })
    }

    /// Moves every moving obstacle by one row.
    pub fn tick_obstacles(&mut self) {
        let rows = self.grid.rows();
        dynamics::tick(&mut self.grid.moving, rows);
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.grid.rows() {
            let row = (0..self.grid.cols())
                .map(|x| {
                    let p = Point::new(x, y);
                    if p == self.agent {
                        'D'
                    } else if self.traveled.contains(&p) {
                        '*'
                    } else if self.grid.is_moving(&p) {
                        'M'
                    } else if self.grid.is_static(&p) {
                        '#'
                    } else if p == self.goal {
                        'G'
                    } else if self.path.contains(&p) {
                        '+'
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
