//! Collision detection and consumption
//!
//! Geometric predicates first, then the per-tick passes that apply them.
//! Every pass collects what it consumed into a pending-removal set and drops
//! those entities once the pass is done, so nothing is eaten twice in a tick.

use std::collections::HashSet;

use glam::Vec2;

use super::split::{merge_into, pop_cell};
use super::state::{AiPlayer, Cell, GameState, Player, WorldBounds, radius_for_mass};
use crate::config::GameConfig;
use crate::consts::*;
use crate::direction_to;

/// Which side of a pair wins an eat check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EatOutcome {
    FirstEatsSecond,
    SecondEatsFirst,
}

/// Food is eaten once its center is inside the cell
#[inline]
pub fn consumes_food(cell_pos: Vec2, cell_radius: f32, food_pos: Vec2) -> bool {
    cell_pos.distance(food_pos) < cell_radius
}

/// Ejected mass additionally requires the cell to outweigh it
#[inline]
pub fn absorbs_ejected(cell: &Cell, particle_pos: Vec2, particle_mass: f32) -> bool {
    cell.mass > particle_mass * EJECT_ABSORB_RATIO
        && consumes_food(cell.pos, cell.radius(), particle_pos)
}

/// A cell pops when it covers a lighter virus's center
#[inline]
pub fn pops_on_virus(cell: &Cell, virus_pos: Vec2, virus_mass: f32) -> bool {
    cell.mass > virus_mass && cell.pos.distance(virus_pos) < cell.radius()
}

/// Whether a cell of `eater_mass` at `eater_pos` swallows the victim.
///
/// The mass gate is strict: exactly 1.2x is not enough. The distance gate is
/// half the eater's radius, tighter than the full radius used for food, so a
/// cell has to cover most of its prey before it goes down.
#[inline]
pub fn can_eat(eater_pos: Vec2, eater_mass: f32, victim_pos: Vec2, victim_mass: f32) -> bool {
    eater_mass > victim_mass * EAT_MASS_RATIO
        && eater_pos.distance(victim_pos) < radius_for_mass(eater_mass) * EAT_DISTANCE_FACTOR
}

/// Resolve an eat check in both directions (at most one side can qualify)
pub fn eat_outcome(first: &Cell, second: &Cell) -> Option<EatOutcome> {
    if !first.is_alive() || !second.is_alive() {
        return None;
    }
    if can_eat(first.pos, first.mass, second.pos, second.mass) {
        Some(EatOutcome::FirstEatsSecond)
    } else if can_eat(second.pos, second.mass, first.pos, first.mass) {
        Some(EatOutcome::SecondEatsFirst)
    } else {
        None
    }
}

/// Player cells eat food. Returns pellets eaten.
pub fn player_eats_food(state: &mut GameState) -> u32 {
    let GameState {
        player, food, stats, ..
    } = state;
    let mut eaten = HashSet::new();

    for cell in &mut player.cells {
        for pellet in food.iter() {
            if eaten.contains(&pellet.id) {
                continue;
            }
            if consumes_food(cell.pos, cell.radius(), pellet.pos) {
                cell.mass += pellet.mass;
                stats.record_consumption(pellet.mass);
                eaten.insert(pellet.id);
            }
        }
    }

    food.retain(|f| !eaten.contains(&f.id));
    eaten.len() as u32
}

/// Player cells absorb ejected mass. Returns particles absorbed.
pub fn player_absorbs_ejected(state: &mut GameState) -> u32 {
    let GameState {
        player,
        ejected,
        stats,
        ..
    } = state;
    let mut absorbed = HashSet::new();

    for cell in &mut player.cells {
        for particle in ejected.iter() {
            if absorbed.contains(&particle.id) {
                continue;
            }
            if absorbs_ejected(cell, particle.pos, particle.mass) {
                cell.mass += particle.mass;
                stats.record_consumption(particle.mass);
                absorbed.insert(particle.id);
            }
        }
    }

    ejected.retain(|p| !absorbed.contains(&p.id));
    absorbed.len() as u32
}

/// Player cells touching a virus pop. Returns the number of pops.
///
/// Pieces created by a pop are not re-checked this tick; viruses are never
/// consumed.
pub fn player_hits_viruses(state: &mut GameState, now_ms: f64) -> u32 {
    let GameState {
        player,
        viruses,
        ids,
        config,
        ..
    } = state;
    let existing = player.cells.len();
    let mut pops = 0;

    for i in 0..existing {
        let cell = &player.cells[i];
        let hit = viruses
            .iter()
            .any(|v| pops_on_virus(cell, v.pos, v.mass));
        if hit && pop_cell(player, i, ids, config, now_ms) > 0 {
            pops += 1;
        }
    }
    pops
}

/// Outcome of the player-versus-bots pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerBotClash {
    pub bots_eaten: u32,
    pub cells_lost: u32,
}

/// Player cells and bots eat each other.
///
/// A player cell lost here is removed before returning. When the last one
/// goes, the eating bot's name is recorded as the killer.
pub fn resolve_player_vs_bots(state: &mut GameState) -> PlayerBotClash {
    let GameState {
        player,
        bots,
        stats,
        ..
    } = state;
    let mut clash = PlayerBotClash::default();
    let mut lost = HashSet::new();
    let mut last_eater: Option<String> = None;

    for bot in bots.iter_mut() {
        for cell in player.cells.iter_mut() {
            if !bot.is_alive() {
                break;
            }
            match eat_outcome(cell, &bot.cell) {
                Some(EatOutcome::FirstEatsSecond) => {
                    let gained = bot.cell.mass;
                    cell.mass += gained;
                    bot.cell.mass = 0.0;
                    stats.record_consumption(gained);
                    stats.bots_eaten += 1;
                    clash.bots_eaten += 1;
                    log::debug!("{} ate bot {}", player.name, bot.name);
                }
                Some(EatOutcome::SecondEatsFirst) => {
                    bot.cell.mass += cell.mass;
                    cell.mass = 0.0;
                    lost.insert(cell.id);
                    clash.cells_lost += 1;
                    last_eater = Some(bot.name.clone());
                }
                None => {}
            }
        }
    }

    if !lost.is_empty() {
        player.cells.retain(|c| !lost.contains(&c.id));
        if player.cells.is_empty() {
            log::info!(
                "{} was eaten by {}",
                player.name,
                last_eater.as_deref().unwrap_or("unknown")
            );
            stats.killer = last_eater;
        }
    }
    clash
}

/// Bots eat each other. Returns the number of bots eaten.
pub fn resolve_bots_vs_bots(bots: &mut [AiPlayer]) -> u32 {
    let mut eaten = 0;
    for j in 1..bots.len() {
        let (left, right) = bots.split_at_mut(j);
        let second = &mut right[0];
        for first in left.iter_mut() {
            match eat_outcome(&first.cell, &second.cell) {
                Some(EatOutcome::FirstEatsSecond) => {
                    first.cell.mass += second.cell.mass;
                    second.cell.mass = 0.0;
                }
                Some(EatOutcome::SecondEatsFirst) => {
                    second.cell.mass += first.cell.mass;
                    first.cell.mass = 0.0;
                }
                None => continue,
            }
            eaten += 1;
        }
    }
    eaten
}

/// Bots eat food. Returns pellets eaten.
pub fn bots_eat_food(state: &mut GameState) -> u32 {
    let GameState { bots, food, .. } = state;
    let mut eaten = HashSet::new();

    for bot in bots.iter_mut().filter(|b| b.is_alive()) {
        for pellet in food.iter() {
            if eaten.contains(&pellet.id) {
                continue;
            }
            if consumes_food(bot.cell.pos, bot.cell.radius(), pellet.pos) {
                bot.cell.mass += pellet.mass;
                eaten.insert(pellet.id);
            }
        }
    }

    food.retain(|f| !eaten.contains(&f.id));
    eaten.len() as u32
}

/// Keep a player's own cells apart until they are allowed to merge, then
/// merge the ones that overlap enough. Returns the number of merges.
pub fn resolve_own_cells(
    player: &mut Player,
    bounds: &WorldBounds,
    config: &GameConfig,
    now_ms: f64,
) -> u32 {
    let mut absorbed = HashSet::new();

    for j in 1..player.cells.len() {
        let (left, right) = player.cells.split_at_mut(j);
        let second = &mut right[0];
        for first in left.iter_mut() {
            if absorbed.contains(&first.id) || absorbed.contains(&second.id) {
                continue;
            }
            let (dir, dist) = direction_to(first.pos, second.pos);
            let (r1, r2) = (first.radius(), second.radius());

            if first.can_merge(now_ms) && second.can_merge(now_ms) {
                if dist < MERGE_OVERLAP_FACTOR * r1.max(r2) {
                    merge_into(first, second, now_ms, config.merge_time_ms);
                    absorbed.insert(second.id);
                }
                continue;
            }

            let overlap = r1 + r2 - dist;
            if overlap > 0.0 {
                let push = dir * (overlap / 2.0);
                first.pos = bounds.clamp(first.pos - push, r1);
                second.pos = bounds.clamp(second.pos + push, r2);
            }
        }
    }

    player.cells.retain(|c| !absorbed.contains(&c.id));
    absorbed.len() as u32
}
