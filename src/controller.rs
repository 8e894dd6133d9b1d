//! The controller ties a [Session] to time and to the outside world.
//!
//! Two periodic activities share one virtual clock: agent steps every `path_speed` and obstacle
//! moves every `obstacle_interval`. [Controller::advance] fires whatever falls due, one callback
//! at a time and in due-time order; when both are due at the same instant the obstacles move
//! first. Every user operation that resets or restarts state stops both timers before touching
//! anything, so no stale tick can mutate a fresh session.
use crate::config::SessionConfig;
use crate::error::{ConfigError, PathError};
use crate::session::{Replan, Session, StepOutcome};
use crate::timer::Timer;
use grid_util::point::Point;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// Notifications for the rendering collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new path was planned; cells from the agent's position to the goal.
    PathUpdated(Vec<Point>),
    AgentMoved(Point),
    GoalReached(Point),
    /// The agent stepped onto an obstacle at this cell and was sent back to the start.
    Collided(Point),
    Unreachable { start: Point, goal: Point },
    /// State changed and the grid should be redrawn.
    GridRepainted,
}

/// Receives [Event]s as they happen.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

/// Settled state of the execution loop between callbacks. Planning and replanning happen inside
/// a single callback and are never observed from outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Moving,
    GoalReached,
    Collided,
    Unreachable,
}

pub struct Controller<S: EventSink> {
    config: SessionConfig,
    session: Session,
    sink: S,
    rng: StdRng,
    now: Duration,
    agent_timer: Timer,
    obstacle_timer: Timer,
    state: RunState,
}

impl<S: EventSink> Controller<S> {
    /// Builds a controller for a validated configuration. Zero intervals or a grid without room
    /// for distinct start and goal cells are refused with [ConfigError::Invalid].
    pub fn new(config: SessionConfig, sink: S) -> Result<Controller<S>, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Controller {
            session: Session::new(&config),
            agent_timer: Timer::new(config.path_speed()),
            obstacle_timer: Timer::new(config.obstacle_interval()),
            config,
            sink,
            rng,
            now: Duration::ZERO,
            state: RunState::Idle,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
    pub fn session(&self) -> &Session {
        &self.session
    }
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
    pub fn sink(&self) -> &S {
        &self.sink
    }
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
    pub fn into_sink(self) -> S {
        self.sink
    }
    pub fn state(&self) -> RunState {
        self.state
    }
    /// Time on the virtual clock.
    pub fn now(&self) -> Duration {
        self.now
    }
    /// Whether the agent loop is scheduled.
    pub fn agent_running(&self) -> bool {
        self.agent_timer.is_armed()
    }
    /// Whether the obstacles are being moved.
    pub fn obstacles_running(&self) -> bool {
        self.obstacle_timer.is_armed()
    }

    /// Cancels both periodic activities.
    pub fn stop(&mut self) {
        self.agent_timer.cancel();
        self.obstacle_timer.cancel();
    }

    fn repaint(&mut self) {
        self.sink.emit(Event::GridRepainted);
    }

    fn emit_path(&mut self) {
        let path = self.session.path().iter().copied().collect();
        self.sink.emit(Event::PathUpdated(path));
    }

    fn start_obstacles(&mut self) {
        if self.obstacle_timer.start(self.now) {
            debug!("Obstacle timer started at {:?}", self.now);
        }
    }

    /// Reports the outcome of planning that does not start a run.
    fn report_plan(&mut self, planned: Result<(), PathError>) {
        match planned {
            Ok(()) => self.emit_path(),
            Err(err) => debug!("Planning without a run: {}", err),
        }
    }

    fn finish(&mut self, state: RunState) {
        self.stop();
        self.state = state;
        info!("Run finished: {:?}", state);
    }

    /// Adds a static obstacle on user request. Occupied, out of bounds, start and goal cells are
    /// ignored.
    pub fn on_user_adds_obstacle(&mut self, point: Point) -> bool {
        let added = self.session.add_obstacle(point);
        if added {
            self.repaint();
        }
        added
    }

    /// Stops everything and scatters a fresh set of static obstacles.
    pub fn on_randomize(&mut self) {
        self.stop();
        self.state = RunState::Idle;
        let planned = self.session.randomize_obstacles(&mut self.rng);
        self.report_plan(planned);
        self.repaint();
    }

    /// Stops everything, replaces the obstacles by a row of `count` moving obstacles and sets
    /// them in motion.
    pub fn on_create_moving_obstacles(&mut self, count: usize) {
        self.stop();
        self.state = RunState::Idle;
        let planned = self.session.spawn_moving_obstacles(count);
        self.report_plan(planned);
        self.repaint();
        self.start_obstacles();
    }

    /// [on_create_moving_obstacles](Self::on_create_moving_obstacles) with the configured count.
    pub fn on_create_default_moving_obstacles(&mut self) {
        self.on_create_moving_obstacles(self.config.obstacles.moving_count);
    }

    /// Starts a run: obstacles start moving, a path is planned from the agent's cell and the
    /// first step is taken right away.
    pub fn on_start(&mut self) {
        self.stop();
        self.start_obstacles();
        self.session.begin_run();
        match self.session.plan() {
            Ok(()) => {
                self.emit_path();
                self.state = RunState::Moving;
                self.drive_agent();
                if self.state == RunState::Moving {
                    self.agent_timer.start(self.now);
                }
            }
            Err(PathError::Unreachable { start, goal }) => {
                self.sink.emit(Event::Unreachable { start, goal });
                self.finish(RunState::Unreachable);
            }
            Err(err) => {
                warn!("Could not start: {}", err);
                self.finish(RunState::Idle);
            }
        }
    }

    /// Stops everything and empties the grid.
    pub fn on_clear(&mut self) {
        self.stop();
        self.session.clear();
        self.state = RunState::Idle;
        self.repaint();
    }

    /// Stops everything and puts the agent back on the start cell.
    pub fn on_reset_position(&mut self) {
        self.stop();
        self.session.reset_agent();
        self.state = RunState::Idle;
        self.repaint();
    }

    /// Runs the virtual clock forward, firing every timer that falls due on the way.
    pub fn advance(&mut self, elapsed: Duration) {
        let target = self.now + elapsed;
        loop {
            let obstacle_due = self.obstacle_timer.next_due().filter(|&t| t <= target);
            let agent_due = self.agent_timer.next_due().filter(|&t| t <= target);
            match (obstacle_due, agent_due) {
                (Some(o), Some(a)) if o <= a => self.fire_obstacles(o),
                (Some(o), None) => self.fire_obstacles(o),
                (_, Some(a)) => self.fire_agent(a),
                (None, None) => break,
            }
        }
        self.now = target;
    }

    fn fire_obstacles(&mut self, at: Duration) {
        self.now = at;
        self.obstacle_timer.reschedule();
        self.session.tick_obstacles();
        self.repaint();
    }

    fn fire_agent(&mut self, at: Duration) {
        self.now = at;
        self.agent_timer.reschedule();
        self.drive_agent();
    }

    fn drive_agent(&mut self) {
        match self.session.step() {
            Ok(StepOutcome::Moved { to, replan }) => {
                self.sink.emit(Event::AgentMoved(to));
                if replan == Replan::Rerouted {
                    debug!("Rerouted at {}", to);
                    self.emit_path();
                }
                self.repaint();
            }
            Ok(StepOutcome::GoalReached { at }) => {
                self.sink.emit(Event::AgentMoved(at));
                self.repaint();
                self.sink.emit(Event::GoalReached(at));
                self.finish(RunState::GoalReached);
            }
            Err(PathError::Collision { cell }) => {
                self.sink.emit(Event::Collided(cell));
                self.repaint();
                self.finish(RunState::Collided);
            }
            Err(err) => {
                warn!("Agent loop halted: {}", err);
                self.finish(RunState::Idle);
            }
        }
    }
}
