//! Error types for planning, execution and configuration.

use grid_util::point::Point;
use thiserror::Error;

/// Failures of planning or of a single execution step. None of these are fatal to the
/// process: the controller reports them as events and returns to a settled state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The search exhausted its open set without reaching the goal.
    #[error("no path from {start} to {goal}")]
    Unreachable { start: Point, goal: Point },

    /// The agent's realized cell holds an obstacle.
    #[error("agent collided with an obstacle at {cell}")]
    Collision { cell: Point },

    /// A step was requested while no path is loaded.
    #[error("no path is loaded")]
    NoPath,
}

/// Errors raised while loading or validating a [SessionConfig](crate::SessionConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
