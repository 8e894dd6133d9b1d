//! Session configuration loaded from TOML.
//!
//! Every section and field is optional; missing values fall back to the
//! defaults of the visualizer (an 800x600 canvas with 40 pixel cells, both
//! timers at 100 ms, five moving obstacles).

use crate::error::ConfigError;
use grid_util::point::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Which A* implementation plans paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Open and closed lists with a first-minimal linear scan.
    #[default]
    Scan,
    /// Binary heap frontier over an indexed node table. Returns equally short paths but may
    /// pick a different one among several shortest paths.
    Indexed,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub obstacles: ObstacleConfig,
    #[serde(default)]
    pub search: SearchConfig,
    /// Seed for obstacle randomization. Drawn from the OS when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Display geometry the grid dimensions are derived from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Interval between agent steps (milliseconds)
    #[serde(default = "default_interval_ms")]
    pub path_speed_ms: u64,
    /// Interval between obstacle moves (milliseconds)
    #[serde(default = "default_interval_ms")]
    pub obstacle_interval_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    /// Number of moving obstacles created by default
    #[serde(default = "default_moving_count")]
    pub moving_count: usize,
    /// Randomization fills `rows * cols / density_divisor` cells
    #[serde(default = "default_density_divisor")]
    pub density_divisor: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub solver: SolverKind,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            cell_size: default_cell_size(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            path_speed_ms: default_interval_ms(),
            obstacle_interval_ms: default_interval_ms(),
        }
    }
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            moving_count: default_moving_count(),
            density_divisor: default_density_divisor(),
        }
    }
}

fn default_canvas_width() -> u32 {
    800
}
fn default_canvas_height() -> u32 {
    600
}
fn default_cell_size() -> u32 {
    40
}
fn default_interval_ms() -> u64 {
    100
}
fn default_moving_count() -> usize {
    5
}
fn default_density_divisor() -> usize {
    4
}

impl SessionConfig {
    /// Configuration for a `cols` x `rows` grid with one-pixel cells and default timing.
    pub fn with_grid(cols: u32, rows: u32) -> Self {
        Self {
            display: DisplayConfig {
                canvas_width: cols,
                canvas_height: rows,
                cell_size: 1,
            },
            ..Self::default()
        }
    }

    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.cell_size == 0 {
            return Err(ConfigError::Invalid("cell_size must be positive".into()));
        }
        if self.cols() < 3 || self.rows() < 3 {
            return Err(ConfigError::Invalid(format!(
                "grid of {}x{} cells is smaller than 3x3",
                self.cols(),
                self.rows()
            )));
        }
        if self.start() == self.goal() {
            return Err(ConfigError::Invalid(format!(
                "start and goal coincide at {}",
                self.start()
            )));
        }
        if self.timing.path_speed_ms == 0 || self.timing.obstacle_interval_ms == 0 {
            return Err(ConfigError::Invalid("timer intervals must be positive".into()));
        }
        if self.obstacles.density_divisor == 0 {
            return Err(ConfigError::Invalid("density_divisor must be positive".into()));
        }
        Ok(())
    }

    pub fn cols(&self) -> i32 {
        (self.display.canvas_width / self.display.cell_size.max(1)) as i32
    }

    pub fn rows(&self) -> i32 {
        (self.display.canvas_height / self.display.cell_size.max(1)) as i32
    }

    /// Initial agent cell, one in from the bottom-left corner.
    pub fn start(&self) -> Point {
        Point::new(1, self.rows() - 2)
    }

    /// Goal cell, one in from the top-right corner.
    pub fn goal(&self) -> Point {
        Point::new(self.cols() - 2, 1)
    }

    pub fn path_speed(&self) -> Duration {
        Duration::from_millis(self.timing.path_speed_ms)
    }

    pub fn obstacle_interval(&self) -> Duration {
        Duration::from_millis(self.timing.obstacle_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_visualizer() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cols(), 20);
        assert_eq!(config.rows(), 15);
        assert_eq!(config.start(), Point::new(1, 13));
        assert_eq!(config.goal(), Point::new(18, 1));
        assert_eq!(config.path_speed(), Duration::from_millis(100));
        assert_eq!(config.search.solver, SolverKind::Scan);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config = SessionConfig::from_toml_str(
            r#"
            seed = 7

            [display]
            canvas_width = 400

            [search]
            solver = "indexed"
            "#,
        )
        .unwrap();
        assert_eq!(config.cols(), 10);
        assert_eq!(config.rows(), 15);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.search.solver, SolverKind::Indexed);
        assert_eq!(config.obstacles.moving_count, 5);
    }

    #[test]
    fn rejects_degenerate_grids() {
        let err = SessionConfig::from_toml_str("[display]\ncell_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(SessionConfig::with_grid(2, 8).validate().is_err());
        // 3x3 puts start and goal on the same cell
        assert!(SessionConfig::with_grid(3, 3).validate().is_err());
        assert!(SessionConfig::with_grid(10, 8).validate().is_ok());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = SessionConfig::from_toml_str("[timing]\npath_speed_ms = \"fast\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
