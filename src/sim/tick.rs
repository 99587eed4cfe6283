//! Simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is
//! one frame; the clock reading is passed in so cooldowns stay reproducible.

use glam::Vec2;

use super::ai::update_bots;
use super::collision::{
    bots_eat_food, player_absorbs_ejected, player_eats_food, player_hits_viruses,
    resolve_bots_vs_bots, resolve_own_cells, resolve_player_vs_bots,
};
use super::physics::{integrate_cell, integrate_ejected};
use super::split::{eject_mass, split_cells};
use super::state::GameState;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering target in world coordinates (from pointer/touch)
    pub target: Option<Vec2>,
    /// Split every eligible cell (space / tap)
    pub split: bool,
    /// Eject mass from every eligible cell (W)
    pub eject: bool,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub cells_split: u32,
    pub mass_ejected: u32,
    pub food_eaten: u32,
    pub ejected_absorbed: u32,
    pub virus_pops: u32,
    pub bots_eaten_by_player: u32,
    pub player_cells_lost: u32,
    pub bots_eaten_by_bots: u32,
    pub bot_food_eaten: u32,
    pub merges: u32,
    /// The player's last cell was eaten this tick
    pub player_died: bool,
}

/// Advance the game state by one tick.
///
/// Does nothing once the player is dead; the caller owns the lifecycle.
/// A death mid-tick still lets the rest of the tick run before it is reported.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) -> TickReport {
    let mut report = TickReport::default();
    if !state.player.is_alive() {
        return report;
    }
    state.time_ticks += 1;

    // Intents
    if let Some(target) = input.target {
        state.player.target = target;
    }
    if input.split {
        report.cells_split =
            split_cells(&mut state.player, &mut state.ids, &state.config, now_ms) as u32;
    }
    if input.eject {
        report.mass_ejected = eject_mass(
            &mut state.player,
            &mut state.ejected,
            &mut state.ids,
            &state.config,
        ) as u32;
    }

    // Player movement
    let target = state.player.target;
    for cell in &mut state.player.cells {
        integrate_cell(cell, target, 1.0, &state.bounds, &state.config);
    }

    // Player collisions
    report.food_eaten = player_eats_food(state);
    report.ejected_absorbed = player_absorbs_ejected(state);
    report.virus_pops = player_hits_viruses(state, now_ms);
    let clash = resolve_player_vs_bots(state);
    report.bots_eaten_by_player = clash.bots_eaten;
    report.player_cells_lost = clash.cells_lost;

    // Ejected mass drifts
    let friction = state.config.eject_friction;
    for particle in &mut state.ejected {
        integrate_ejected(particle, &state.bounds, friction);
    }

    // Bots
    update_bots(state, now_ms);
    report.bots_eaten_by_bots = resolve_bots_vs_bots(&mut state.bots);
    report.bot_food_eaten = bots_eat_food(state);

    // Own cells push apart or merge
    report.merges = resolve_own_cells(&mut state.player, &state.bounds, &state.config, now_ms);

    state.player.cells.retain(|c| c.is_alive());

    // Populations
    state.replenish_food();
    state.replenish_bots();

    // Stats
    let total = state.player.total_mass();
    if total > state.stats.max_mass {
        state.stats.max_mass = total;
    }
    state.stats.elapsed_ms = now_ms - state.started_at_ms;
    report.player_died = !state.player.is_alive();

    log::trace!(
        "tick {}: {} cells, mass {:.1}, {:?}",
        state.time_ticks,
        state.player.cells.len(),
        total,
        report
    );

    report
}
