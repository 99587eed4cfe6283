//! Read-only frame view for renderers
//!
//! A [`Snapshot`] is a plain copy of everything a host draws, taken between
//! ticks. It owns its data, so the host can hold it while the game advances.

use glam::Vec2;
use serde::Serialize;

use crate::game::GamePhase;
use crate::leaderboard::Leaderboard;
use crate::sim::{GameState, RunStats, WorldBounds};

/// Zoom never drops below this, however large the player grows
pub const MIN_ZOOM: f32 = 0.25;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellView {
    pub id: u64,
    pub pos: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub color: u32,
    pub name: String,
    pub is_player: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodView {
    pub id: u64,
    pub pos: Vec2,
    pub radius: f32,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirusView {
    pub id: u64,
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EjectedView {
    pub id: u64,
    pub pos: Vec2,
    pub radius: f32,
    pub color: u32,
}

/// Where the view is centered and how far it is zoomed out
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub focus: Vec2,
    /// 1.0 at starting mass, shrinking as the player grows
    pub zoom: f32,
}

impl Camera {
    /// Center on the player's centroid, zooming out with total mass
    pub fn follow(state: &GameState) -> Self {
        let player = &state.player;
        let total = player.total_mass();
        let zoom = if total > 0.0 {
            (state.config.starting_mass / total).sqrt().clamp(MIN_ZOOM, 1.0)
        } else {
            1.0
        };
        Self {
            focus: player.centroid(),
            zoom,
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub tick: u64,
    pub bounds: WorldBounds,
    /// Player and bot cells, lightest first (draw order)
    pub cells: Vec<CellView>,
    pub food: Vec<FoodView>,
    pub viruses: Vec<VirusView>,
    pub ejected: Vec<EjectedView>,
    pub camera: Camera,
    pub leaderboard: Leaderboard,
    pub stats: RunStats,
    /// Frozen stats of the finished run, once the game is over
    pub final_stats: Option<RunStats>,
}

impl Snapshot {
    pub fn capture(phase: GamePhase, state: &GameState, final_stats: Option<&RunStats>) -> Self {
        let player = &state.player;
        let player_cells = player.cells.iter().map(|c| CellView {
            id: c.id,
            pos: c.pos,
            radius: c.radius(),
            mass: c.mass,
            color: c.color,
            name: player.name.clone(),
            is_player: true,
        });
        let bot_cells = state.living_bots().map(|b| CellView {
            id: b.cell.id,
            pos: b.cell.pos,
            radius: b.cell.radius(),
            mass: b.cell.mass,
            color: b.cell.color,
            name: b.name.clone(),
            is_player: false,
        });
        let mut cells: Vec<CellView> = player_cells.chain(bot_cells).collect();
        cells.sort_by(|a, b| a.mass.total_cmp(&b.mass));

        Self {
            phase,
            tick: state.time_ticks,
            bounds: state.bounds,
            cells,
            food: state
                .food
                .iter()
                .map(|f| FoodView {
                    id: f.id,
                    pos: f.pos,
                    radius: f.radius,
                    color: f.color,
                })
                .collect(),
            viruses: state
                .viruses
                .iter()
                .map(|v| VirusView {
                    id: v.id,
                    pos: v.pos,
                    radius: v.radius,
                })
                .collect(),
            ejected: state
                .ejected
                .iter()
                .map(|e| EjectedView {
                    id: e.id,
                    pos: e.pos,
                    radius: e.radius(),
                    color: e.color,
                })
                .collect(),
            camera: Camera::follow(state),
            leaderboard: Leaderboard::rank(state, state.config.leaderboard_size),
            stats: state.stats.clone(),
            final_stats: final_stats.cloned(),
        }
    }

    /// The player's own cells
    pub fn player_cells(&self) -> impl Iterator<Item = &CellView> {
        self.cells.iter().filter(|c| c.is_player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn state() -> GameState {
        let config = GameConfig {
            food_target: 25,
            virus_target: 2,
            bot_target: 3,
            ..GameConfig::default()
        };
        GameState::new(config, 21, "viewer", "", 0.0)
    }

    #[test]
    fn test_capture_copies_every_population() {
        let state = state();
        let snap = Snapshot::capture(GamePhase::Running, &state, None);
        assert_eq!(snap.cells.len(), 4);
        assert_eq!(snap.player_cells().count(), 1);
        assert_eq!(snap.food.len(), 25);
        assert_eq!(snap.viruses.len(), 2);
        assert!(snap.ejected.is_empty());
        assert_eq!(snap.leaderboard.entries.len(), 4);
        assert!(snap.final_stats.is_none());
    }

    #[test]
    fn test_cells_sorted_lightest_first() {
        let snap = Snapshot::capture(GamePhase::Running, &state(), None);
        for pair in snap.cells.windows(2) {
            assert!(pair[0].mass <= pair[1].mass);
        }
    }

    #[test]
    fn test_dead_bots_are_hidden() {
        let mut state = state();
        state.bots[0].cell.mass = 0.0;
        let snap = Snapshot::capture(GamePhase::Running, &state, None);
        assert_eq!(snap.cells.len(), 3);
    }

    #[test]
    fn test_camera_zooms_out_with_mass() {
        let mut state = state();
        assert_eq!(Camera::follow(&state).zoom, 1.0);

        state.player.cells[0].mass = state.config.starting_mass * 4.0;
        assert!((Camera::follow(&state).zoom - 0.5).abs() < 1e-5);

        state.player.cells[0].mass = 1_000_000.0;
        assert_eq!(Camera::follow(&state).zoom, MIN_ZOOM);
    }

    #[test]
    fn test_camera_focus_is_centroid() {
        let mut state = state();
        state.player.cells[0].pos = Vec2::new(100.0, 100.0);
        assert_eq!(Camera::follow(&state).focus, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let snap = Snapshot::capture(GamePhase::Running, &state(), None);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"phase\":\"Running\""));
        assert!(json.contains("\"viewer\""));
    }
}
