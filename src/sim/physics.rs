//! Per-tick movement: steering, damping, integration, walls and decay

use glam::Vec2;

use super::state::{Cell, EjectedMass, WorldBounds, speed_for_mass};
use crate::config::GameConfig;
use crate::consts::*;
use crate::direction_to;

/// Advance one cell by one tick toward `target`.
///
/// `steer_scale` is 1.0 for the player and [`AI_STEER_DAMPING`] for bots.
pub fn integrate_cell(
    cell: &mut Cell,
    target: Vec2,
    steer_scale: f32,
    bounds: &WorldBounds,
    config: &GameConfig,
) {
    if !cell.is_alive() {
        return;
    }

    let (dir, dist) = direction_to(cell.pos, target);
    if dist > STEER_EPSILON {
        let speed = speed_for_mass(config.base_speed, cell.mass);
        cell.vel += dir * speed * steer_scale;
    }

    cell.pos += cell.vel;
    // Residual split/eject impulses bleed off exponentially
    cell.vel *= config.friction;
    cell.pos = bounds.clamp(cell.pos, cell.radius());

    if cell.mass > config.starting_mass {
        cell.mass -= cell.mass * config.decay_rate;
    }
}

/// Drift an ejected particle: friction and walls only
pub fn integrate_ejected(particle: &mut EjectedMass, bounds: &WorldBounds, friction: f32) {
    particle.pos += particle.vel;
    particle.vel *= friction;
    particle.pos = bounds.clamp(particle.pos, particle.radius());
}
