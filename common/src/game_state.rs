use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::{Direction, Position};

/// Tunables for one game session. `Default` gives the classic 20x20 game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub grid_size: u16,
    pub start: Position,
    pub food_reward: u32,
    pub speed_up_threshold: u32,
    pub initial_tick_interval_ms: u64,
    pub tick_interval_step_ms: u64,
    pub min_tick_interval_ms: u64,
    pub food_spawn_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_size: GRID_SIZE,
            start: START_CELL.into(),
            food_reward: FOOD_REWARD,
            speed_up_threshold: SPEED_UP_SCORE_THRESHOLD,
            initial_tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            tick_interval_step_ms: TICK_INTERVAL_STEP_MS,
            min_tick_interval_ms: MIN_TICK_INTERVAL_MS,
            food_spawn_attempts: FOOD_SPAWN_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid size must be positive")]
    EmptyGrid,
    #[error("grid size {grid_size} exceeds the maximum of {max}")]
    GridTooLarge { grid_size: u16, max: u16 },
    #[error("start cell ({x}, {y}) lies outside a {grid_size}x{grid_size} grid")]
    StartOutOfBounds { x: i16, y: i16, grid_size: u16 },
    #[error("tick intervals must be positive")]
    ZeroInterval,
    #[error("minimum tick interval {min}ms exceeds the initial interval {initial}ms")]
    MinimumAboveInitial { min: u64, initial: u64 },
}

impl GameConfig {
    /// A default config on a grid of a different size, starting in its centre.
    pub fn with_grid_size(grid_size: u16) -> Self {
        let centre = (grid_size / 2) as i16;
        GameConfig {
            grid_size,
            start: Position::new(centre, centre),
            ..GameConfig::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                grid_size: self.grid_size,
                max: MAX_GRID_SIZE,
            });
        }
        if !self.start.in_bounds(self.grid_size) {
            return Err(ConfigError::StartOutOfBounds {
                x: self.start.x,
                y: self.start.y,
                grid_size: self.grid_size,
            });
        }
        if self.initial_tick_interval_ms == 0 || self.min_tick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.min_tick_interval_ms > self.initial_tick_interval_ms {
            return Err(ConfigError::MinimumAboveInitial {
                min: self.min_tick_interval_ms,
                initial: self.initial_tick_interval_ms,
            });
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.grid_size as usize * self.grid_size as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TerminationReason {
    WallCollision,
    SelfCollision,
    /// The snake covers every cell, so there is nowhere left to put food.
    BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Termination {
    pub final_score: u32,
    pub reason: TerminationReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SessionStatus {
    Running,
    Terminated(Termination),
}

/// Public view of the engine after a step, for rendering and hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub grid_size: u16,
    /// Head first
    pub snake: Vec<Position>,
    /// `None` only once the board is full
    pub food: Option<Position>,
    pub heading: Direction,
    pub score: u32,
    pub tick_interval_ms: u64,
    pub status: SessionStatus,
}

impl GameSnapshot {
    pub fn is_terminated(&self) -> bool {
        matches!(self.status, SessionStatus::Terminated(_))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}

/// Result of a single `step()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub snapshot: GameSnapshot,
    pub ate_food: bool,
    /// New tick interval in milliseconds when it changed during this step
    pub reschedule_ms: Option<u64>,
    pub terminated: Option<Termination>,
}

impl StepOutcome {
    pub fn reschedule(&self) -> Option<Duration> {
        self.reschedule_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.start, Position::new(10, 10));
        assert_eq!(config.cell_count(), 400);
    }

    #[test]
    fn rejects_bad_configs() {
        let config = GameConfig { grid_size: 0, ..GameConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::EmptyGrid));

        let config = GameConfig { start: Position::new(20, 3), ..GameConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::StartOutOfBounds { .. })));

        let config = GameConfig { min_tick_interval_ms: 0, ..GameConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));

        let config = GameConfig { min_tick_interval_ms: 200, ..GameConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::MinimumAboveInitial { .. })));
    }

    #[test]
    fn rejects_grids_beyond_i16_coordinates() {
        let config = GameConfig::with_grid_size(40000);
        assert_eq!(
            config.validate(),
            Err(ConfigError::GridTooLarge { grid_size: 40000, max: MAX_GRID_SIZE })
        );
        assert_eq!(GameConfig::with_grid_size(MAX_GRID_SIZE).validate(), Ok(()));
    }

    #[test]
    fn small_grid_starts_in_centre() {
        let config = GameConfig::with_grid_size(5);
        assert_eq!(config.start, Position::new(2, 2));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn snapshot_json_shape() {
        let snapshot = GameSnapshot {
            grid_size: 20,
            snake: vec![Position::new(10, 10)],
            food: Some(Position::new(3, 4)),
            heading: Direction::Right,
            score: 0,
            tick_interval_ms: 150,
            status: SessionStatus::Running,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["tickIntervalMs"], 150);
        assert_eq!(json["status"]["state"], "running");
        assert_eq!(json["snake"][0]["x"], 10);
    }
}
