//! Cell Arena entry point
//!
//! On the web the page drives `WebGame` directly. Natively this runs a
//! headless, frame-clocked session with a simple autopilot and prints the
//! final run stats as JSON.
//!
//! Usage: `cell-arena [seed] [ticks] [config.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::process::exit;

    use cell_arena::platform::{FrameClock, entropy_seed};
    use cell_arena::snapshot::Snapshot;
    use cell_arena::{Game, GameConfig, GamePhase};

    const DEFAULT_TICKS: u64 = 60 * 60;
    /// Autopilot splits this often while big enough
    const SPLIT_EVERY: u64 = 180;
    const EJECT_EVERY: u64 = 300;

    struct Args {
        seed: u64,
        ticks: u64,
        config_path: Option<String>,
    }

    fn parse_args() -> Result<Args, String> {
        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(s) => s.parse().map_err(|_| format!("invalid seed: {s}"))?,
            None => entropy_seed(),
        };
        let ticks = match args.next() {
            Some(s) => s.parse().map_err(|_| format!("invalid tick count: {s}"))?,
            None => DEFAULT_TICKS,
        };
        Ok(Args {
            seed,
            ticks,
            config_path: args.next(),
        })
    }

    fn load_config(path: Option<&str>) -> Result<GameConfig, String> {
        let Some(path) = path else {
            return Ok(GameConfig::default());
        };
        let json = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
        GameConfig::from_json(&json).map_err(|e| format!("{path}: {e}"))
    }

    /// Head for the nearest pellet; periodically split or eject
    fn steer(game: &mut Game, snapshot: &Snapshot, tick: u64) {
        let focus = snapshot.camera.focus;
        let nearest = snapshot
            .food
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance_squared(focus)
                    .total_cmp(&b.pos.distance_squared(focus))
            })
            .map(|f| f.pos);
        if let Some(target) = nearest {
            game.set_target(target.x, target.y);
        }

        let mass: f32 = snapshot.player_cells().map(|c| c.mass).sum();
        if tick % SPLIT_EVERY == 0 && mass > game.config().split_min_mass * 2.0 {
            game.request_split();
        }
        if tick % EJECT_EVERY == 0 {
            game.request_eject_mass();
        }
    }

    fn run() -> Result<(), String> {
        let args = parse_args()?;
        let config = load_config(args.config_path.as_deref())?;
        let clock = FrameClock::new(config.frame_ms);
        let mut game = Game::new(config, args.seed, Box::new(clock)).map_err(|e| e.to_string())?;

        log::info!("Headless run: seed {}, up to {} ticks", args.seed, args.ticks);
        game.start_game("Autopilot", "");

        for tick in 0..args.ticks {
            if let Some(snapshot) = game.snapshot() {
                steer(&mut game, &snapshot, tick);
            }
            if game.tick().is_none() || game.phase() != GamePhase::Running {
                break;
            }
        }
        if game.phase() == GamePhase::Running {
            game.stop();
        }

        let stats = game.final_stats().cloned().unwrap_or_default();
        let json = serde_json::to_string_pretty(&stats).map_err(|e| e.to_string())?;
        println!("{json}");
        Ok(())
    }

    pub fn main() {
        env_logger::init();
        if let Err(e) = run() {
            log::error!("{e}");
            exit(1);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::wasm_start`, this is just to satisfy the compiler
}
