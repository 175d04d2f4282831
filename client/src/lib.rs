mod render;

pub use render::*;

use common::{Direction, GameConfig, SimulationEngine};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// One game session exposed to JavaScript. The page owns the timer: after each
/// `step()` it reprograms its timeout when the outcome has `rescheduleMs`, and
/// stops when `terminated` is set.
#[wasm_bindgen]
pub struct WasmGame {
    engine: SimulationEngine,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> Result<WasmGame, JsValue> {
        Self::create(GameConfig::default(), seed)
    }

    pub fn with_grid_size(seed: f64, grid_size: u16) -> Result<WasmGame, JsValue> {
        Self::create(GameConfig::with_grid_size(grid_size), seed)
    }

    /// Accepts `UP`/`down`/`ArrowLeft`-style names. Unknown names and
    /// reversals are ignored; returns whether the turn was queued.
    pub fn request_direction(&mut self, direction: &str) -> bool {
        match direction.parse::<Direction>() {
            Ok(direction) => self.engine.request_direction(direction),
            Err(e) => {
                log::debug!("Ignoring input: {}", e);
                false
            }
        }
    }

    /// Advance one tick and return the step outcome as JSON.
    pub fn step(&mut self) -> Result<String, JsValue> {
        let outcome = self.engine.step();
        serde_json::to_string(&outcome)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize step: {}", e)))
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.snapshot())
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize game state: {}", e)))
    }

    pub fn restart(&mut self) {
        self.engine.restart();
    }

    pub fn tick_interval_ms(&self) -> u32 {
        self.engine.tick_interval().as_millis() as u32
    }

    pub fn score(&self) -> u32 {
        self.engine.score()
    }

    pub fn grid_size(&self) -> u16 {
        self.engine.config().grid_size
    }

    pub fn is_terminated(&self) -> bool {
        self.engine.is_terminated()
    }
}

impl WasmGame {
    fn create(config: GameConfig, seed: f64) -> Result<WasmGame, JsValue> {
        let engine = SimulationEngine::with_seed(config, seed as u64)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmGame { engine })
    }

    pub(crate) fn engine(&self) -> &SimulationEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn step_reports_outcome_as_json() {
        let mut game = WasmGame::new(12345.0).unwrap();
        assert!(game.request_direction("ArrowUp"));
        let outcome: Value = serde_json::from_str(&game.step().unwrap()).unwrap();

        assert_eq!(outcome["snapshot"]["heading"], "Up");
        assert_eq!(outcome["snapshot"]["snake"][0]["x"], 10);
        assert_eq!(outcome["snapshot"]["snake"][0]["y"], 9);
        assert!(outcome["terminated"].is_null());
    }

    #[test]
    fn unknown_and_reversed_inputs_are_ignored() {
        let mut game = WasmGame::new(1.0).unwrap();
        assert!(!game.request_direction("jump"));
        assert!(!game.request_direction("LEFT"));
        assert_eq!(game.tick_interval_ms(), 150);
        assert_eq!(game.grid_size(), 20);
    }

    #[test]
    fn runs_into_wall_and_restarts() {
        let mut game = WasmGame::with_grid_size(7.0, 5).unwrap();
        for _ in 0..5 {
            game.step().unwrap();
        }
        assert!(game.is_terminated());
        game.restart();
        assert!(!game.is_terminated());
        assert_eq!(game.score(), 0);
    }
}
