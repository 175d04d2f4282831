use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result, bail, ensure};
use log::{debug, info, trace};

use crate::util::{PseudoRandom, RandomSource};
use crate::{
    ConfigError, Direction, GameConfig, GameSnapshot, Position, SessionStatus, Snake, StepOutcome,
    Termination, TerminationReason,
};

/// Single-player snake simulation. Owns the whole session state and advances it
/// one tick at a time; the host decides when ticks happen.
#[derive(Debug, Clone)]
pub struct SimulationEngine<R = PseudoRandom> {
    config: GameConfig,
    snake: Snake,
    food: Option<Position>,
    heading: Direction,
    pending_heading: Direction,
    score: u32,
    tick_interval_ms: u64,
    status: SessionStatus,
    rng: R,
}

impl SimulationEngine<PseudoRandom> {
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        SimulationEngine::new(config, PseudoRandom::new(seed))
    }
}

impl<R: RandomSource> SimulationEngine<R> {
    pub fn new(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut engine = SimulationEngine {
            snake: Snake::new(config.start),
            food: None,
            heading: Direction::Right,
            pending_heading: Direction::Right,
            score: 0,
            tick_interval_ms: config.initial_tick_interval_ms,
            status: SessionStatus::Running,
            config,
            rng,
        };
        engine.food = engine.spawn_food();
        Ok(engine)
    }

    /// Restore a mid-game position. The snake is given head first and must be
    /// non-empty, in bounds and free of duplicates; the food must be a free cell.
    pub fn from_parts(
        config: GameConfig,
        snake: impl IntoIterator<Item = Position>,
        heading: Direction,
        food: Position,
        rng: R,
    ) -> Result<Self> {
        config.validate().context("Invalid game config")?;
        let snake = Snake::from_cells(snake);
        ensure!(!snake.is_empty(), "Snake must have at least one cell");

        let mut seen = HashSet::with_capacity(snake.len());
        for cell in snake.iter() {
            ensure!(
                cell.in_bounds(config.grid_size),
                "Snake cell ({}, {}) is outside the grid",
                cell.x,
                cell.y
            );
            if !seen.insert(*cell) {
                bail!("Snake overlaps itself at ({}, {})", cell.x, cell.y);
            }
        }
        ensure!(food.in_bounds(config.grid_size), "Food is outside the grid");
        ensure!(!snake.contains_point(&food), "Food is on the snake");

        Ok(SimulationEngine {
            tick_interval_ms: config.initial_tick_interval_ms,
            config,
            snake,
            food: Some(food),
            heading,
            pending_heading: heading,
            score: 0,
            status: SessionStatus::Running,
            rng,
        })
    }

    /// Start a fresh session with the same config and random source.
    pub fn restart(&mut self) {
        self.snake = Snake::new(self.config.start);
        self.heading = Direction::Right;
        self.pending_heading = Direction::Right;
        self.score = 0;
        self.tick_interval_ms = self.config.initial_tick_interval_ms;
        self.status = SessionStatus::Running;
        self.food = self.spawn_food();
        debug!("Session restarted");
    }

    /// Queue a turn for the next step. A request to reverse onto the current
    /// heading is dropped. Returns whether the request was accepted.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.is_terminated() {
            return false;
        }
        if direction == self.heading.opposite() {
            trace!("Dropping reversal from {} to {}", self.heading, direction);
            return false;
        }
        self.pending_heading = direction;
        true
    }

    /// Advance the session by one tick. A terminated engine is left untouched.
    pub fn step(&mut self) -> StepOutcome {
        if self.is_terminated() {
            return self.outcome(false, None);
        }

        self.heading = self.pending_heading;
        let Some(head) = self.snake.head() else {
            return self.outcome(false, None);
        };
        let candidate = head.offset(self.heading);

        if !candidate.in_bounds(self.config.grid_size) {
            return self.terminate(TerminationReason::WallCollision);
        }
        if self.snake.contains_point(&candidate) {
            return self.terminate(TerminationReason::SelfCollision);
        }

        let ate_food = self.food == Some(candidate);
        self.snake.advance(candidate, ate_food);
        if !ate_food {
            return self.outcome(false, None);
        }

        let previous_score = self.score;
        self.score += self.config.food_reward;
        debug!("Food eaten at ({}, {}), score {}", candidate.x, candidate.y, self.score);

        let reschedule = self.apply_speed_up(previous_score);

        self.food = self.spawn_food();
        if self.food.is_none() {
            let mut outcome = self.terminate(TerminationReason::BoardFull);
            outcome.ate_food = true;
            outcome.reschedule_ms = reschedule;
            return outcome;
        }

        self.outcome(true, reschedule)
    }

    /// Shrink the tick interval when the score crosses a threshold multiple.
    fn apply_speed_up(&mut self, previous_score: u32) -> Option<u64> {
        let threshold = self.config.speed_up_threshold;
        if threshold == 0 || previous_score / threshold == self.score / threshold {
            return None;
        }

        let faster = self
            .tick_interval_ms
            .saturating_sub(self.config.tick_interval_step_ms)
            .max(self.config.min_tick_interval_ms);
        if faster == self.tick_interval_ms {
            return None;
        }

        debug!("Tick interval {}ms -> {}ms", self.tick_interval_ms, faster);
        self.tick_interval_ms = faster;
        Some(faster)
    }

    /// Pick a free cell for food: a bounded number of uniform random draws,
    /// then a uniform choice among the remaining free cells.
    fn spawn_food(&mut self) -> Option<Position> {
        let size = self.config.grid_size as u32;
        if self.snake.len() >= self.config.cell_count() {
            return None;
        }

        for _ in 0..self.config.food_spawn_attempts {
            let candidate = Position::new(
                self.rng.next_below(size) as i16,
                self.rng.next_below(size) as i16,
            );
            if !self.snake.contains_point(&candidate) {
                return Some(candidate);
            }
        }

        debug!(
            "Random food placement failed {} times, scanning free cells",
            self.config.food_spawn_attempts
        );
        let occupied: HashSet<Position> = self.snake.iter().copied().collect();
        let free: Vec<Position> = (0..size as i16)
            .flat_map(|y| (0..size as i16).map(move |x| Position::new(x, y)))
            .filter(|cell| !occupied.contains(cell))
            .collect();
        if free.is_empty() {
            return None;
        }
        let index = self.rng.next_below(free.len() as u32) as usize;
        free.get(index).copied()
    }

    fn terminate(&mut self, reason: TerminationReason) -> StepOutcome {
        let termination = Termination {
            final_score: self.score,
            reason,
        };
        info!("Game over ({:?}) with score {}", reason, self.score);
        self.status = SessionStatus::Terminated(termination);
        self.outcome(false, None)
    }

    fn outcome(&self, ate_food: bool, reschedule_ms: Option<u64>) -> StepOutcome {
        StepOutcome {
            snapshot: self.snapshot(),
            ate_food,
            reschedule_ms,
            terminated: self.termination(),
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid_size: self.config.grid_size,
            snake: self.snake.iter().copied().collect(),
            food: self.food,
            heading: self.heading,
            score: self.score,
            tick_interval_ms: self.tick_interval_ms,
            status: self.status,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn pending_heading(&self) -> Direction {
        self.pending_heading
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn termination(&self) -> Option<Termination> {
        match self.status {
            SessionStatus::Terminated(termination) => Some(termination),
            SessionStatus::Running => None,
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.termination().is_some()
    }
}
