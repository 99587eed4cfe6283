//! Browser bindings
//!
//! Thin `wasm_bindgen` wrapper over [`Game`]; the page's render loop calls
//! `tick` then `getSnapshot` every animation frame.

use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::game::{Game, GamePhase};
use crate::platform::{SystemClock, entropy_seed};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("Cell Arena starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game, optionally overriding balance with a JSON config
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebGame, JsValue> {
        let config = match config_json {
            Some(json) => GameConfig::from_json(&json),
            None => Ok(GameConfig::default()),
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let game = Game::new(config, entropy_seed(), Box::new(SystemClock::new()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WebGame { game })
    }

    #[wasm_bindgen(js_name = startGame)]
    pub fn start_game(&mut self, player_name: &str, skin: &str) {
        self.game.start_game(player_name, skin);
    }

    /// Advance one tick; false when no run is in progress
    pub fn tick(&mut self) -> bool {
        self.game.tick().is_some()
    }

    #[wasm_bindgen(js_name = setTarget)]
    pub fn set_target(&mut self, x: f32, y: f32) {
        self.game.set_target(x, y);
    }

    #[wasm_bindgen(js_name = requestSplit)]
    pub fn request_split(&mut self) {
        self.game.request_split();
    }

    #[wasm_bindgen(js_name = requestEjectMass)]
    pub fn request_eject_mass(&mut self) {
        self.game.request_eject_mass();
    }

    /// Current frame as JSON, undefined while idle
    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> Option<String> {
        let snapshot = self.game.snapshot()?;
        match serde_json::to_string(&snapshot) {
            Ok(json) => Some(json),
            Err(e) => {
                log::error!("Snapshot serialization failed: {e}");
                None
            }
        }
    }

    pub fn stop(&mut self) {
        self.game.stop();
    }

    /// "Idle", "Running" or "GameOver"
    pub fn phase(&self) -> String {
        match self.game.phase() {
            GamePhase::Idle => "Idle",
            GamePhase::Running => "Running",
            GamePhase::GameOver => "GameOver",
        }
        .to_string()
    }
}
