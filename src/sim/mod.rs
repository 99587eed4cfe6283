//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Clock readings are passed in, never sampled
//! - Stable iteration order (insertion order, oldest first)
//! - No platform dependencies

pub mod ai;
pub mod collision;
pub mod physics;
pub mod split;
pub mod state;
pub mod tick;

pub use ai::{decide_state, flee_target, update_bots};
pub use collision::{EatOutcome, can_eat, eat_outcome};
pub use physics::{integrate_cell, integrate_ejected};
pub use split::{eject_mass, merge_into, pop_cell, split_cells};
pub use state::{
    AiPlayer, AiState, Cell, EjectedMass, EntityIds, Food, GameState, Player, RunStats, Virus, WorldBounds,
    radius_for_mass, speed_for_mass,
};
pub use tick::{TickInput, TickReport, tick};
