/// Side length of the square play field, in cells
pub const GRID_SIZE: u16 = 20;

/// Largest grid whose cells and their neighbours all fit in `i16` coordinates
pub const MAX_GRID_SIZE: u16 = i16::MAX as u16;

/// Cell the snake's head occupies when a session starts
pub const START_CELL: (i16, i16) = (10, 10);

/// Points awarded for each food eaten
pub const FOOD_REWARD: u32 = 10;

/// Every time the score reaches a multiple of this, the game speeds up
pub const SPEED_UP_SCORE_THRESHOLD: u32 = 50;

/// Default tick interval in milliseconds at the start of a session
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 150;

/// Amount the tick interval shrinks on each speed-up
pub const TICK_INTERVAL_STEP_MS: u64 = 10;

/// The tick interval never goes below this
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

/// Random food placement attempts before falling back to a full grid scan
pub const FOOD_SPAWN_ATTEMPTS: u32 = 64;
