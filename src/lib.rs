//! Cell Arena - A cell-eating arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, splits, bots)
//! - `game`: Host-facing lifecycle facade (start, tick, intents, stop)
//! - `snapshot`: Read-only view handed to the renderer each frame
//! - `leaderboard`: Top-N ranking by mass
//! - `platform`: Browser/native clock abstraction
//! - `config`: Data-driven game balance

pub mod config;
pub mod game;
pub mod leaderboard;
pub mod platform;
pub mod sim;
pub mod snapshot;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ConfigError, GameConfig};
pub use game::{Game, GamePhase};
pub use leaderboard::Leaderboard;
pub use snapshot::Snapshot;

use glam::Vec2;

/// Fixed rule constants (tunable balance lives in [`GameConfig`])
pub mod consts {
    /// Radius = sqrt(mass) * RADIUS_FACTOR
    pub const RADIUS_FACTOR: f32 = 4.0;
    /// Speed = base_speed * mass^SPEED_EXPONENT (smaller is faster)
    pub const SPEED_EXPONENT: f32 = -0.075;
    /// Steering is skipped when the target is closer than this
    pub const STEER_EPSILON: f32 = 1.0;
    /// Bots steer with 80% of the player's authority
    pub const AI_STEER_DAMPING: f32 = 0.8;

    /// Eater must be strictly more than this many times the victim's mass
    pub const EAT_MASS_RATIO: f32 = 1.2;
    /// Victim center must be within this fraction of the eater's radius
    pub const EAT_DISTANCE_FACTOR: f32 = 0.5;
    /// Ejected mass is only absorbed by cells heavier than this ratio
    pub const EJECT_ABSORB_RATIO: f32 = 1.2;
    /// Own cells merge when closer than this fraction of the larger radius
    pub const MERGE_OVERLAP_FACTOR: f32 = 0.3;

    /// Upper bound on pieces produced by a virus pop
    pub const POP_MAX_PIECES: usize = 8;

    /// Fallback label for blank player names
    pub const DEFAULT_PLAYER_NAME: &str = "An unnamed cell";
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector and distance from `from` toward `to`.
///
/// A zero-length offset falls back to +x so callers never divide by zero.
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    let dist = delta.length();
    if dist > f32::EPSILON {
        (delta / dist, dist)
    } else {
        (Vec2::X, 0.0)
    }
}
