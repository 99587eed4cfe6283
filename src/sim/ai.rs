//! Bot decision making
//!
//! Each bot picks Wander, Chase or Flee every tick from the nearest player
//! cell, chooses a target point for that state, then moves through the
//! shared integrator with damped steering.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::physics::integrate_cell;
use super::state::{AiPlayer, AiState, Cell, Food, GameState, WorldBounds};
use crate::config::GameConfig;
use crate::consts::*;
use crate::direction_to;

/// Pick a state from the bot's mass and its nearest player cell.
///
/// Pure: the same inputs always give the same state.
pub fn decide_state(
    bot_mass: f32,
    nearest_mass: f32,
    distance: f32,
    detection_radius: f32,
) -> AiState {
    if distance > detection_radius {
        AiState::Wander
    } else if bot_mass > nearest_mass * EAT_MASS_RATIO {
        AiState::Chase
    } else if nearest_mass > bot_mass * EAT_MASS_RATIO {
        AiState::Flee
    } else {
        AiState::Wander
    }
}

/// Point `flee_distance` away from `threat`, on the far side of the bot
pub fn flee_target(bot_pos: Vec2, threat_pos: Vec2, flee_distance: f32) -> Vec2 {
    let (away, _) = direction_to(threat_pos, bot_pos);
    bot_pos + away * flee_distance
}

/// Nearest item within `radius` of `from`, by squared distance
fn nearest_within<'a, T>(
    items: impl Iterator<Item = &'a T>,
    pos_of: impl Fn(&T) -> Vec2,
    from: Vec2,
    radius: f32,
) -> Option<&'a T>
where
    T: 'a,
{
    items
        .map(|item| (item, pos_of(item).distance_squared(from)))
        .filter(|&(_, d2)| d2 <= radius * radius)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(item, _)| item)
}

/// Wander: graze nearby food, otherwise roam between random waypoints
fn wander(
    bot: &mut AiPlayer,
    food: &[Food],
    bounds: &WorldBounds,
    rng: &mut Pcg32,
    config: &GameConfig,
    now_ms: f64,
    just_entered: bool,
) {
    let deadline_passed = now_ms >= bot.retarget_at;
    let snack = nearest_within(
        food.iter(),
        |f: &Food| f.pos,
        bot.cell.pos,
        config.ai_food_search_radius,
    );

    match snack {
        Some(pellet) if !deadline_passed => bot.target = pellet.pos,
        _ => {
            let arrived = bot.cell.pos.distance(bot.target) <= bot.cell.radius();
            if deadline_passed || just_entered || arrived {
                bot.target = bounds.random_point(rng, bot.cell.radius());
                let (lo, hi) = (config.ai_retarget_min_ms, config.ai_retarget_max_ms);
                let window = if lo < hi { rng.random_range(lo..hi) } else { lo };
                bot.retarget_at = now_ms + window;
            }
        }
    }
}

/// Re-decide and move every living bot
pub fn update_bots(state: &mut GameState, now_ms: f64) {
    let GameState {
        player,
        bots,
        food,
        bounds,
        rng,
        config,
        ..
    } = state;

    for bot in bots.iter_mut().filter(|b| b.is_alive()) {
        let threat = nearest_within(
            player.cells.iter(),
            |c: &Cell| c.pos,
            bot.cell.pos,
            f32::INFINITY,
        );

        let previous = bot.state;
        let next = match threat {
            Some(cell) => decide_state(
                bot.cell.mass,
                cell.mass,
                cell.pos.distance(bot.cell.pos),
                config.ai_detection_radius,
            ),
            None => AiState::Wander,
        };

        match (next, threat) {
            (AiState::Chase, Some(prey)) => bot.target = prey.pos,
            (AiState::Flee, Some(hunter)) => {
                bot.target = flee_target(bot.cell.pos, hunter.pos, config.ai_flee_distance)
            }
            _ => wander(
                bot,
                food,
                bounds,
                rng,
                config,
                now_ms,
                previous != AiState::Wander,
            ),
        }
        if next != previous {
            log::trace!("Bot {} {:?} -> {:?}", bot.name, previous, next);
        }
        bot.state = next;

        integrate_cell(&mut bot.cell, bot.target, AI_STEER_DAMPING, bounds, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_state_thresholds() {
        let r = 500.0;
        assert_eq!(decide_state(130.0, 100.0, 100.0, r), AiState::Chase);
        assert_eq!(decide_state(100.0, 130.0, 100.0, r), AiState::Flee);
        assert_eq!(decide_state(110.0, 100.0, 100.0, r), AiState::Wander);
        // Exactly 1.2x is not enough either way
        assert_eq!(decide_state(120.0, 100.0, 100.0, r), AiState::Wander);
        // Out of range
        assert_eq!(decide_state(1000.0, 10.0, 501.0, r), AiState::Wander);
    }

    #[test]
    fn test_decide_state_is_pure() {
        let first = decide_state(40.0, 90.0, 250.0, 500.0);
        for _ in 0..100 {
            assert_eq!(decide_state(40.0, 90.0, 250.0, 500.0), first);
        }
    }

    #[test]
    fn test_flee_target_points_away() {
        let target = flee_target(Vec2::new(100.0, 100.0), Vec2::new(50.0, 100.0), 300.0);
        assert!((target - Vec2::new(400.0, 100.0)).length() < 1e-3);
    }

    fn arena(bot_mass: f32, player_mass: f32, gap: f32) -> GameState {
        let config = GameConfig {
            food_target: 0,
            virus_target: 0,
            bot_target: 1,
            bot_mass_min: bot_mass,
            bot_mass_max: bot_mass,
            ..GameConfig::default()
        };
        let mut state = GameState::new(config, 3, "p", "", 0.0);
        state.bots[0].cell.pos = Vec2::new(2000.0, 2000.0);
        state.player.cells[0].pos = Vec2::new(2000.0 + gap, 2000.0);
        state.player.cells[0].mass = player_mass;
        state
    }

    #[test]
    fn test_bot_chases_smaller_player() {
        let mut state = arena(100.0, 30.0, 200.0);
        update_bots(&mut state, 0.0);
        let bot = &state.bots[0];
        assert_eq!(bot.state, AiState::Chase);
        assert_eq!(bot.target, state.player.cells[0].pos);
        assert!(bot.cell.pos.x > 2000.0);
    }

    #[test]
    fn test_bot_flees_larger_player() {
        let mut state = arena(30.0, 100.0, 200.0);
        update_bots(&mut state, 0.0);
        let bot = &state.bots[0];
        assert_eq!(bot.state, AiState::Flee);
        assert!(bot.target.x < 2000.0);
        assert!(bot.cell.pos.x < 2000.0);
    }

    #[test]
    fn test_bot_wanders_when_player_far() {
        let mut state = arena(30.0, 100.0, 900.0);
        update_bots(&mut state, 0.0);
        let bot = &state.bots[0];
        assert_eq!(bot.state, AiState::Wander);
        assert!(bot.retarget_at >= 3000.0 && bot.retarget_at < 8000.0);
    }

    #[test]
    fn test_wandering_bot_seeks_nearby_food() {
        let mut state = arena(30.0, 30.0, 1500.0);
        state.bots[0].retarget_at = 10_000.0;
        let id = state.next_entity_id();
        state.food.push(Food {
            id,
            pos: Vec2::new(2100.0, 2050.0),
            mass: 1.0,
            radius: 5.0,
            color: 0,
        });
        update_bots(&mut state, 0.0);
        assert_eq!(state.bots[0].target, Vec2::new(2100.0, 2050.0));
    }

    #[test]
    fn test_bot_wanders_when_player_dead() {
        let mut state = arena(30.0, 100.0, 10.0);
        state.player.cells.clear();
        update_bots(&mut state, 0.0);
        assert_eq!(state.bots[0].state, AiState::Wander);
    }

    #[test]
    fn test_dead_bots_are_skipped() {
        let mut state = arena(30.0, 100.0, 200.0);
        state.bots[0].cell.mass = 0.0;
        let before = state.bots[0].cell.pos;
        update_bots(&mut state, 0.0);
        assert_eq!(state.bots[0].cell.pos, before);
    }
}
