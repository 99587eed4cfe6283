//! Host-facing game facade
//!
//! Owns the run lifecycle (Idle → Running → GameOver → Running), buffers
//! host intents between ticks and samples the injected clock once per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, GameConfig};
use crate::platform::Clock;
use crate::sim::{GameState, RunStats, TickInput, TickReport, tick};
use crate::snapshot::Snapshot;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No world exists yet (or it was dismissed)
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Run ended; the final world stays viewable
    GameOver,
}

pub struct Game {
    config: GameConfig,
    clock: Box<dyn Clock>,
    base_seed: u64,
    /// Runs started so far; run `n` is seeded with `base_seed + n`
    runs: u64,
    phase: GamePhase,
    state: Option<GameState>,
    /// Intents buffered since the last tick
    input: TickInput,
    final_stats: Option<RunStats>,
}

impl Game {
    pub fn new(config: GameConfig, seed: u64, clock: Box<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            base_seed: seed,
            runs: 0,
            phase: GamePhase::Idle,
            state: None,
            input: TickInput::default(),
            final_stats: None,
        })
    }

    /// Build a fresh world and start playing.
    ///
    /// Calling this mid-run abandons the current run.
    pub fn start_game(&mut self, player_name: &str, skin: &str) {
        let seed = self.base_seed.wrapping_add(self.runs);
        self.runs += 1;
        let now = self.clock.now_ms();

        let state = GameState::new(self.config.clone(), seed, player_name, skin, now);
        log::info!(
            "Run {} started for {} (seed {})",
            self.runs,
            state.player.name,
            seed
        );

        self.state = Some(state);
        self.input = TickInput::default();
        self.final_stats = None;
        self.phase = GamePhase::Running;
    }

    /// Advance one tick. Returns None unless a run is in progress.
    pub fn tick(&mut self) -> Option<TickReport> {
        if self.phase != GamePhase::Running {
            return None;
        }
        let state = self.state.as_mut()?;
        let now = self.clock.now_ms();
        let report = tick(state, &self.input, now);

        // One-shot flags are consumed by the tick that saw them
        self.input = TickInput::default();

        if report.player_died {
            let stats = state.stats.clone();
            log::info!(
                "Game over after {} ticks: score {}, max mass {:.0}, eaten by {}",
                state.time_ticks,
                stats.score,
                stats.max_mass,
                stats.killer.as_deref().unwrap_or("nobody")
            );
            self.final_stats = Some(stats);
            self.phase = GamePhase::GameOver;
        }
        Some(report)
    }

    /// Steer toward a world-space point
    pub fn set_target(&mut self, x: f32, y: f32) {
        if self.phase == GamePhase::Running {
            self.input.target = Some(Vec2::new(x, y));
        }
    }

    pub fn request_split(&mut self) {
        if self.phase == GamePhase::Running {
            self.input.split = true;
        }
    }

    pub fn request_eject_mass(&mut self) {
        if self.phase == GamePhase::Running {
            self.input.eject = true;
        }
    }

    /// End the run (Running → GameOver) or dismiss it (GameOver → Idle)
    pub fn stop(&mut self) {
        match self.phase {
            GamePhase::Running => {
                if let Some(state) = &self.state {
                    self.final_stats = Some(state.stats.clone());
                }
                self.phase = GamePhase::GameOver;
                log::info!("Run stopped by host");
            }
            GamePhase::GameOver => {
                self.state = None;
                self.final_stats = None;
                self.input = TickInput::default();
                self.phase = GamePhase::Idle;
                log::info!("Returned to idle");
            }
            GamePhase::Idle => {}
        }
    }

    /// Read-only view of the current world, None while idle
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.state
            .as_ref()
            .map(|state| Snapshot::capture(self.phase, state, self.final_stats.as_ref()))
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Stats frozen when the last run ended
    pub fn final_stats(&self) -> Option<&RunStats> {
        self.final_stats.as_ref()
    }
}
