//! Split, eject, virus pop and merge mechanics
//!
//! Everything that changes how many cells a player owns, or moves mass
//! between a cell and a projectile. Mass is conserved by every operation.

use std::f32::consts::TAU;

use super::state::{Cell, EjectedMass, EntityIds, Player, radius_for_mass};
use crate::config::GameConfig;
use crate::consts::POP_MAX_PIECES;
use crate::{direction_to, polar_to_cartesian};

/// Split every eligible cell toward the player's target.
///
/// Only cells that existed before the call are considered, and splitting
/// stops once the player owns `max_cells`. Returns the number of new cells.
pub fn split_cells(
    player: &mut Player,
    ids: &mut EntityIds,
    config: &GameConfig,
    now_ms: f64,
) -> usize {
    let target = player.target;
    let existing = player.cells.len();
    let cooldown = now_ms + config.merge_time_ms;
    let mut spawned = 0;

    for i in 0..existing {
        if player.cells.len() >= config.max_cells {
            break;
        }
        let parent = &mut player.cells[i];
        if parent.mass < config.split_min_mass {
            continue;
        }

        let (dir, _) = direction_to(parent.pos, target);
        parent.mass /= 2.0;
        parent.merge_eligible_at = cooldown;

        let offset = dir * 2.0 * parent.radius();
        let mut child = Cell::new(
            ids.allocate(),
            parent.pos + offset,
            parent.mass,
            parent.color,
            &parent.owner,
        );
        child.vel = dir * config.split_impulse;
        child.merge_eligible_at = cooldown;

        player.cells.push(child);
        spawned += 1;
    }

    if spawned > 0 {
        log::debug!("{} split into {} cells", player.name, player.cells.len());
    }
    spawned
}

/// Fire one ejected-mass particle from every eligible cell toward the target.
///
/// Returns the number of particles launched.
pub fn eject_mass(
    player: &mut Player,
    ejected: &mut Vec<EjectedMass>,
    ids: &mut EntityIds,
    config: &GameConfig,
) -> usize {
    let target = player.target;
    let particle_radius = radius_for_mass(config.eject_mass);
    let mut launched = 0;

    for cell in &mut player.cells {
        if cell.mass < config.split_min_mass {
            continue;
        }
        let (dir, _) = direction_to(cell.pos, target);
        cell.mass -= config.eject_mass;

        // Spawn just clear of the (now lighter) cell's edge
        let spawn = cell.pos + dir * (cell.radius() + particle_radius + 1.0);
        ejected.push(EjectedMass {
            id: ids.allocate(),
            pos: spawn,
            vel: dir * config.eject_speed,
            mass: config.eject_mass,
            color: cell.color,
        });
        launched += 1;
    }
    launched
}

/// Burst the cell at `index` into equal pieces radiating outward.
///
/// The piece count is capped by [`POP_MAX_PIECES`] and by the free cell slots
/// (the popped cell itself becomes one of the pieces). Fewer than two pieces
/// means there is no room and the cell is left untouched.
/// Returns the number of new cells.
pub fn pop_cell(
    player: &mut Player,
    index: usize,
    ids: &mut EntityIds,
    config: &GameConfig,
    now_ms: f64,
) -> usize {
    let budget = config.max_cells.saturating_sub(player.cells.len()) + 1;
    let pieces = POP_MAX_PIECES.min(budget);
    if pieces < 2 || index >= player.cells.len() {
        return 0;
    }

    let cooldown = now_ms + config.merge_time_ms;
    let origin = player.cells[index].pos;
    // Every piece carries the parent's momentum plus its own outward kick
    let inherited = player.cells[index].vel;
    let piece_mass = player.cells[index].mass / pieces as f32;
    let piece_radius = radius_for_mass(piece_mass);
    let step = TAU / pieces as f32;

    for k in 0..pieces {
        let dir = polar_to_cartesian(1.0, k as f32 * step);
        let pos = origin + dir * piece_radius;
        if k == 0 {
            let cell = &mut player.cells[index];
            cell.mass = piece_mass;
            cell.pos = pos;
            cell.vel = inherited + dir * config.pop_impulse;
            cell.merge_eligible_at = cooldown;
        } else {
            let source = &player.cells[index];
            let mut piece = Cell::new(ids.allocate(), pos, piece_mass, source.color, &source.owner);
            piece.vel = inherited + dir * config.pop_impulse;
            piece.merge_eligible_at = cooldown;
            player.cells.push(piece);
        }
    }

    log::debug!("{} popped into {} pieces", player.name, pieces);
    pieces - 1
}

/// Fold `absorbed` into `survivor`.
///
/// Masses add, position and velocity become the mass-weighted averages, and
/// the survivor starts a fresh merge cooldown.
pub fn merge_into(survivor: &mut Cell, absorbed: &Cell, now_ms: f64, merge_time_ms: f64) {
    let total = survivor.mass + absorbed.mass;
    survivor.pos = (survivor.pos * survivor.mass + absorbed.pos * absorbed.mass) / total;
    survivor.vel = (survivor.vel * survivor.mass + absorbed.vel * absorbed.mass) / total;
    survivor.mass = total;
    survivor.merge_eligible_at = now_ms + merge_time_ms;
}
