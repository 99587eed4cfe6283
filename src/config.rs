//! Game balance configuration
//!
//! Every tunable number the simulation reads. Defaults are the shipped
//! balance; hosts may override any subset from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must be in [0, 1), got {value}")]
    NotAFraction { field: &'static str, value: f32 },
    #[error("{field} is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("max_cells must be at least 1")]
    NoCellSlots,
}

/// Balance preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Casual,
    #[default]
    Normal,
    Hungry,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Casual => "Casual",
            Difficulty::Normal => "Normal",
            Difficulty::Hungry => "Hungry",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "casual" | "easy" => Some(Difficulty::Casual),
            "normal" => Some(Difficulty::Normal),
            "hungry" | "hard" => Some(Difficulty::Hungry),
            _ => None,
        }
    }

    /// Number of bots kept alive
    pub fn bot_count(&self) -> usize {
        match self {
            Difficulty::Casual => 6,
            Difficulty::Normal => 12,
            Difficulty::Hungry => 20,
        }
    }

    /// Heaviest mass a freshly spawned bot may have
    pub fn bot_mass_max(&self) -> f32 {
        match self {
            Difficulty::Casual => 40.0,
            Difficulty::Normal => 80.0,
            Difficulty::Hungry => 150.0,
        }
    }
}

/// Tunable gameplay numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,

    // === World ===
    pub world_width: f32,
    pub world_height: f32,
    /// Milliseconds per tick for the frame-stepped clock
    pub frame_ms: f64,

    // === Populations ===
    pub food_target: usize,
    pub virus_target: usize,
    pub bot_target: usize,

    // === Cells ===
    /// Spawn mass; cells above it decay
    pub starting_mass: f32,
    pub base_speed: f32,
    /// Per-tick velocity multiplier
    pub friction: f32,
    /// Fraction of mass lost per tick above starting mass
    pub decay_rate: f32,
    pub max_cells: usize,

    // === Split / eject / merge ===
    pub split_min_mass: f32,
    pub split_impulse: f32,
    pub eject_mass: f32,
    pub eject_speed: f32,
    pub eject_friction: f32,
    /// Cooldown after a split or merge before a cell may merge again
    pub merge_time_ms: f64,

    // === Passive entities ===
    pub food_mass: f32,
    pub food_radius: f32,
    pub virus_mass: f32,
    pub virus_radius: f32,
    pub pop_impulse: f32,

    // === Bots ===
    pub bot_mass_min: f32,
    pub bot_mass_max: f32,
    pub ai_detection_radius: f32,
    pub ai_flee_distance: f32,
    pub ai_food_search_radius: f32,
    pub ai_retarget_min_ms: f64,
    pub ai_retarget_max_ms: f64,

    // === HUD ===
    pub leaderboard_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        let difficulty = Difficulty::default();
        Self {
            difficulty,

            world_width: 4000.0,
            world_height: 4000.0,
            frame_ms: 1000.0 / 60.0,

            food_target: 600,
            virus_target: 15,
            bot_target: difficulty.bot_count(),

            starting_mass: 20.0,
            base_speed: 0.6,
            friction: 0.9,
            decay_rate: 0.0002,
            max_cells: 16,

            split_min_mass: 36.0,
            split_impulse: 18.0,
            eject_mass: 12.0,
            eject_speed: 20.0,
            eject_friction: 0.92,
            merge_time_ms: 10_000.0,

            food_mass: 1.0,
            food_radius: 5.0,
            virus_mass: 100.0,
            virus_radius: 40.0,
            pop_impulse: 12.0,

            bot_mass_min: 10.0,
            bot_mass_max: difficulty.bot_mass_max(),
            ai_detection_radius: 500.0,
            ai_flee_distance: 300.0,
            ai_food_search_radius: 300.0,
            ai_retarget_min_ms: 3000.0,
            ai_retarget_max_ms: 8000.0,

            leaderboard_size: 10,
        }
    }
}

impl GameConfig {
    /// Create a config from a difficulty preset (applies preset defaults)
    pub fn from_preset(difficulty: Difficulty) -> Self {
        let mut config = Self::default();
        config.apply_preset(difficulty);
        config
    }

    /// Apply a difficulty preset (updates difficulty-dependent numbers)
    pub fn apply_preset(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.bot_target = difficulty.bot_count();
        self.bot_mass_max = difficulty.bot_mass_max().max(self.bot_mass_min);
    }

    /// Parse and validate a JSON override; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject numbers the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("frame_ms", self.frame_ms as f32),
            ("starting_mass", self.starting_mass),
            ("base_speed", self.base_speed),
            ("split_min_mass", self.split_min_mass),
            ("eject_mass", self.eject_mass),
            ("food_mass", self.food_mass),
            ("food_radius", self.food_radius),
            ("virus_mass", self.virus_mass),
            ("virus_radius", self.virus_radius),
            ("bot_mass_min", self.bot_mass_min),
            ("ai_detection_radius", self.ai_detection_radius),
            ("ai_flee_distance", self.ai_flee_distance),
            ("ai_food_search_radius", self.ai_food_search_radius),
        ];
        for (field, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("merge_time_ms", self.merge_time_ms as f32),
            ("split_impulse", self.split_impulse),
            ("eject_speed", self.eject_speed),
            ("pop_impulse", self.pop_impulse),
            ("ai_retarget_min_ms", self.ai_retarget_min_ms as f32),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let fractions = [
            ("friction", self.friction),
            ("eject_friction", self.eject_friction),
            ("decay_rate", self.decay_rate),
        ];
        for (field, value) in fractions {
            if !(0.0..1.0).contains(&value) {
                return Err(ConfigError::NotAFraction { field, value });
            }
        }

        if self.max_cells == 0 {
            return Err(ConfigError::NoCellSlots);
        }
        if self.bot_mass_min > self.bot_mass_max {
            return Err(ConfigError::InvertedRange {
                field: "bot_mass",
                min: self.bot_mass_min,
                max: self.bot_mass_max,
            });
        }
        if self.ai_retarget_min_ms > self.ai_retarget_max_ms {
            return Err(ConfigError::InvertedRange {
                field: "ai_retarget_ms",
                min: self.ai_retarget_min_ms as f32,
                max: self.ai_retarget_max_ms as f32,
            });
        }
        // Eject leaves the cell at least this heavy, so it must stay alive
        if self.eject_mass >= self.split_min_mass {
            return Err(ConfigError::InvertedRange {
                field: "eject_mass/split_min_mass",
                min: self.split_min_mass,
                max: self.eject_mass,
            });
        }
        Ok(())
    }
}
