//! Game state and core simulation types
//!
//! Plain entity records plus the derived quantities the rules read
//! (radius, speed, centroid). Behavior lives in the sibling modules.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::*;

/// Radius of a cell with the given mass
#[inline]
pub fn radius_for_mass(mass: f32) -> f32 {
    mass.max(0.0).sqrt() * RADIUS_FACTOR
}

/// Steering speed for a cell with the given mass (heavier is slower)
#[inline]
pub fn speed_for_mass(base_speed: f32, mass: f32) -> f32 {
    base_speed * mass.max(f32::EPSILON).powf(SPEED_EXPONENT)
}

/// Cell colors (0xRRGGBB)
pub const CELL_COLORS: [u32; 12] = [
    0xFF4136, 0xFF851B, 0xFFDC00, 0x2ECC40, 0x0074D9, 0x7FDBFF, 0xB10DC9, 0xF012BE, 0xFF69B4,
    0x01FF70, 0x39CCCC, 0x8BC34A,
];

/// Food colors (0xRRGGBB)
pub const FOOD_COLORS: [u32; 8] = [
    0xFF6384, 0x36A2EB, 0xFFCE56, 0x4BC0C0, 0x9966FF, 0xFF9F40, 0x7CB342, 0x4DD0E1,
];

/// Names handed out to bots, cycled by spawn order
pub const BOT_NAMES: [&str; 12] = [
    "Amoeba", "Blob", "Chomper", "Drift", "Echo", "Fizz", "Glutton", "Hydra", "Ion", "Jelly",
    "Krill", "Lumen",
];

/// Name for the `n`th bot spawned; numbered once the list wraps ("Blob 2")
pub fn bot_name(n: usize) -> String {
    let base = BOT_NAMES[n % BOT_NAMES.len()];
    match n / BOT_NAMES.len() {
        0 => base.to_string(),
        lap => format!("{base} {}", lap + 1),
    }
}

/// Current AI decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Wander,
    Chase,
    Flee,
}

/// A movable circular mass owned by a player or a bot
#[derive(Debug, Clone)]
pub struct Cell {
    pub id: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub color: u32,
    pub owner: String,
    /// Clock time (ms) from which this cell may merge with a sibling
    pub merge_eligible_at: f64,
}

impl Cell {
    /// Panics if `mass` is not a positive finite number
    pub fn new(id: u64, pos: Vec2, mass: f32, color: u32, owner: &str) -> Self {
        assert!(
            mass > 0.0 && mass.is_finite(),
            "cell {id} constructed with invalid mass {mass}"
        );
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            mass,
            color,
            owner: owner.to_string(),
            merge_eligible_at: 0.0,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        radius_for_mass(self.mass)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.mass > 0.0
    }

    #[inline]
    pub fn can_merge(&self, now_ms: f64) -> bool {
        now_ms >= self.merge_eligible_at
    }
}

/// The local player
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub skin: String,
    pub color: u32,
    /// Owned cells, oldest first
    pub cells: Vec<Cell>,
    pub target: Vec2,
}

impl Player {
    pub fn new(name: &str, skin: &str, color: u32, first_cell: Cell) -> Self {
        let target = first_cell.pos;
        Self {
            name: name.to_string(),
            skin: skin.to_string(),
            color,
            cells: vec![first_cell],
            target,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.cells.is_empty()
    }

    pub fn total_mass(&self) -> f32 {
        self.cells.iter().map(|c| c.mass).sum()
    }

    /// Mass-weighted average position (target point if no cells)
    pub fn centroid(&self) -> Vec2 {
        let total = self.total_mass();
        if total <= 0.0 {
            return self.target;
        }
        self.cells.iter().map(|c| c.pos * c.mass).sum::<Vec2>() / total
    }
}

/// A computer-controlled opponent with a single cell
#[derive(Debug, Clone)]
pub struct AiPlayer {
    pub name: String,
    pub cell: Cell,
    pub target: Vec2,
    pub state: AiState,
    /// Clock time (ms) after which the wander waypoint is replaced
    pub retarget_at: f64,
}

impl AiPlayer {
    pub fn new(name: &str, cell: Cell) -> Self {
        let target = cell.pos;
        Self {
            name: name.to_string(),
            cell,
            target,
            state: AiState::Wander,
            retarget_at: 0.0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.cell.is_alive()
    }
}

/// A passive pellet, consumed whole
#[derive(Debug, Clone)]
pub struct Food {
    pub id: u64,
    pub pos: Vec2,
    pub mass: f32,
    pub radius: f32,
    pub color: u32,
}

/// A static obstacle that pops large cells
#[derive(Debug, Clone)]
pub struct Virus {
    pub id: u64,
    pub pos: Vec2,
    pub mass: f32,
    pub radius: f32,
}

/// A projectile of mass fired by a cell
#[derive(Debug, Clone)]
pub struct EjectedMass {
    pub id: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub color: u32,
}

impl EjectedMass {
    #[inline]
    pub fn radius(&self) -> f32 {
        radius_for_mass(self.mass)
    }
}

/// Rectangular world extent with the origin in the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    /// Keep a circle of `radius` fully inside the world (hard wall)
    pub fn clamp(&self, pos: Vec2, radius: f32) -> Vec2 {
        // A circle larger than the world pins to the center line
        let rx = radius.min(self.width / 2.0);
        let ry = radius.min(self.height / 2.0);
        Vec2::new(
            pos.x.clamp(rx, self.width - rx),
            pos.y.clamp(ry, self.height - ry),
        )
    }

    /// Uniform random point keeping `margin` from every edge
    pub fn random_point(&self, rng: &mut Pcg32, margin: f32) -> Vec2 {
        let mx = margin.min(self.width / 2.0);
        let my = margin.min(self.height / 2.0);
        let x = if mx < self.width - mx {
            rng.random_range(mx..self.width - mx)
        } else {
            self.width / 2.0
        };
        let y = if my < self.height - my {
            rng.random_range(my..self.height - my)
        } else {
            self.height / 2.0
        };
        Vec2::new(x, y)
    }
}

/// Per-run statistics, frozen into the final report on game over
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Total mass consumed (food, ejected mass and bots)
    pub score: u64,
    pub max_mass: f32,
    /// Number of things eaten (food, ejected mass and bots)
    pub consumed: u32,
    pub bots_eaten: u32,
    pub elapsed_ms: f64,
    /// Name of whoever ate the last player cell
    pub killer: Option<String>,
}

impl RunStats {
    pub(crate) fn record_consumption(&mut self, mass: f32) {
        self.consumed += 1;
        self.score += mass.max(0.0).round() as u64;
    }
}

/// Monotonic entity ID allocator shared by every entity kind
#[derive(Debug, Clone)]
pub struct EntityIds {
    next: u64,
}

impl EntityIds {
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Complete simulation state for one run (deterministic given seed + clock)
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub bounds: WorldBounds,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Clock time the run started
    pub started_at_ms: f64,
    pub player: Player,
    /// Bots; dead entries are kept as reusable slots
    pub bots: Vec<AiPlayer>,
    pub food: Vec<Food>,
    pub viruses: Vec<Virus>,
    pub ejected: Vec<EjectedMass>,
    pub stats: RunStats,
    pub(crate) ids: EntityIds,
    /// Bot names handed out so far
    bots_spawned: usize,
}

impl GameState {
    /// Create a fresh world with all populations at their targets
    pub fn new(config: GameConfig, seed: u64, player_name: &str, skin: &str, now_ms: f64) -> Self {
        let name = match player_name.trim() {
            "" => DEFAULT_PLAYER_NAME,
            trimmed => trimmed,
        };
        let bounds = WorldBounds {
            width: config.world_width,
            height: config.world_height,
        };
        let mut rng = Pcg32::seed_from_u64(seed);

        let color = CELL_COLORS[rng.random_range(0..CELL_COLORS.len())];
        let start_mass = config.starting_mass;
        let spawn = bounds.random_point(&mut rng, radius_for_mass(start_mass));
        let cell = Cell::new(1, spawn, start_mass, color, name);
        let player = Player::new(name, skin, color, cell);

        let mut state = Self {
            config,
            bounds,
            seed,
            rng,
            time_ticks: 0,
            started_at_ms: now_ms,
            player,
            bots: Vec::new(),
            food: Vec::new(),
            viruses: Vec::new(),
            ejected: Vec::new(),
            stats: RunStats {
                max_mass: start_mass,
                ..RunStats::default()
            },
            ids: EntityIds::starting_at(2),
            bots_spawned: 0,
        };

        for _ in 0..state.config.virus_target {
            state.spawn_virus();
        }
        state.replenish_food();
        state.replenish_bots();

        log::info!(
            "World {}x{} seeded {}: {} food, {} viruses, {} bots",
            state.bounds.width,
            state.bounds.height,
            seed,
            state.food.len(),
            state.viruses.len(),
            state.bots.len()
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u64 {
        self.ids.allocate()
    }

    /// Living bots
    pub fn living_bots(&self) -> impl Iterator<Item = &AiPlayer> {
        self.bots.iter().filter(|b| b.is_alive())
    }

    pub fn spawn_food(&mut self) {
        let id = self.next_entity_id();
        let radius = self.config.food_radius;
        let pos = self.bounds.random_point(&mut self.rng, radius);
        let color = FOOD_COLORS[self.rng.random_range(0..FOOD_COLORS.len())];
        self.food.push(Food {
            id,
            pos,
            mass: self.config.food_mass,
            radius,
            color,
        });
    }

    pub fn spawn_virus(&mut self) {
        let id = self.next_entity_id();
        let radius = self.config.virus_radius;
        let pos = self.bounds.random_point(&mut self.rng, radius);
        self.viruses.push(Virus {
            id,
            pos,
            mass: self.config.virus_mass,
            radius,
        });
    }

    /// Top food back up to its target count
    pub fn replenish_food(&mut self) {
        while self.food.len() < self.config.food_target {
            self.spawn_food();
        }
    }

    /// Bring living bots back up to target, reusing dead slots first
    pub fn replenish_bots(&mut self) {
        let mut living = self.living_bots().count();
        while living < self.config.bot_target {
            let bot = self.fresh_bot();
            match self.bots.iter().position(|b| !b.is_alive()) {
                Some(slot) => self.bots[slot] = bot,
                None => self.bots.push(bot),
            }
            living += 1;
        }
    }

    fn fresh_bot(&mut self) -> AiPlayer {
        let id = self.next_entity_id();
        let (lo, hi) = (self.config.bot_mass_min, self.config.bot_mass_max);
        let mass = if lo < hi {
            self.rng.random_range(lo..hi)
        } else {
            lo
        };
        let pos = self.bounds.random_point(&mut self.rng, radius_for_mass(mass));
        let color = CELL_COLORS[self.rng.random_range(0..CELL_COLORS.len())];
        let name = bot_name(self.bots_spawned);
        self.bots_spawned += 1;
        log::debug!("Spawned bot {name} (cell {id}) with mass {mass:.1}");
        AiPlayer::new(&name, Cell::new(id, pos, mass, color, &name))
    }
}
