//! Live leaderboard
//!
//! Ranks the player and every living bot by total mass, keeps the top N
//! and remembers where the player placed even when outside the cut.

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub mass: f32,
    pub is_player: bool,
}

/// Top-N standings by mass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    /// Sorted descending by mass
    pub entries: Vec<LeaderboardEntry>,
    /// Player's rank (1-indexed) among everyone alive, None if dead
    pub player_rank: Option<usize>,
}

impl Leaderboard {
    /// Rank arbitrary standings, keeping the top `size`.
    ///
    /// Equal masses keep their input order.
    pub fn from_standings(standings: impl IntoIterator<Item = LeaderboardEntry>, size: usize) -> Self {
        let mut entries: Vec<LeaderboardEntry> = standings.into_iter().collect();
        entries.sort_by(|a, b| b.mass.total_cmp(&a.mass));

        let player_rank = entries.iter().position(|e| e.is_player).map(|i| i + 1);
        entries.truncate(size);

        Self {
            entries,
            player_rank,
        }
    }

    /// Rank the player and living bots of a running game
    pub fn rank(state: &GameState, size: usize) -> Self {
        let player = state.player.is_alive().then(|| LeaderboardEntry {
            name: state.player.name.clone(),
            mass: state.player.total_mass(),
            is_player: true,
        });
        let bots = state.living_bots().map(|bot| LeaderboardEntry {
            name: bot.name.clone(),
            mass: bot.cell.mass,
            is_player: false,
        });
        Self::from_standings(player.into_iter().chain(bots), size)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The heaviest entry (if any)
    pub fn top(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn entry(name: &str, mass: f32, is_player: bool) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.to_string(),
            mass,
            is_player,
        }
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let board = Leaderboard::from_standings(
            vec![
                entry("a", 10.0, false),
                entry("b", 50.0, false),
                entry("me", 30.0, true),
                entry("c", 40.0, false),
            ],
            3,
        );
        let names: Vec<_> = board.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "me"]);
        assert_eq!(board.player_rank, Some(3));
        assert_eq!(board.top().map(|e| e.mass), Some(50.0));
    }

    #[test]
    fn test_player_rank_outside_top_n() {
        let board = Leaderboard::from_standings(
            vec![
                entry("a", 90.0, false),
                entry("b", 80.0, false),
                entry("me", 5.0, true),
            ],
            2,
        );
        assert_eq!(board.entries.len(), 2);
        assert!(board.entries.iter().all(|e| !e.is_player));
        assert_eq!(board.player_rank, Some(3));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let board = Leaderboard::from_standings(
            vec![entry("first", 20.0, false), entry("second", 20.0, false)],
            10,
        );
        assert_eq!(board.entries[0].name, "first");
        assert_eq!(board.player_rank, None);
    }

    #[test]
    fn test_empty_leaderboard() {
        let board = Leaderboard::from_standings(Vec::new(), 10);
        assert!(board.is_empty());
        assert!(board.top().is_none());
    }

    #[test]
    fn test_rank_from_state() {
        let config = GameConfig {
            food_target: 0,
            virus_target: 0,
            bot_target: 4,
            ..GameConfig::default()
        };
        let mut state = crate::sim::GameState::new(config, 11, "me", "", 0.0);
        state.bots[2].cell.mass = 0.0;
        state.player.cells[0].mass = 10_000.0;

        let board = Leaderboard::rank(&state, 10);

        // Dead bots are left out
        assert_eq!(board.entries.len(), 4);
        assert_eq!(board.player_rank, Some(1));
        assert_eq!(board.top().map(|e| e.name.as_str()), Some("me"));
    }
}
