use cell_arena::platform::FrameClock;
use cell_arena::sim::{
    AiState, Cell, EjectedMass, EntityIds, GameState, Player, can_eat, decide_state, eject_mass,
    split_cells,
};
use cell_arena::{Game, GameConfig, GamePhase};
use glam::Vec2;
use proptest::prelude::*;

/// One host frame: where the pointer is and which keys were pressed
#[derive(Debug, Clone)]
struct Intent {
    target: (f32, f32),
    split: bool,
    eject: bool,
}

prop_compose! {
    fn arb_intent()(
        x in 0.0f32..1500.0,
        y in 0.0f32..1500.0,
        split in prop::bool::weighted(0.1),
        eject in prop::bool::weighted(0.1)
    ) -> Intent {
        Intent { target: (x, y), split, eject }
    }
}

fn crowded_config() -> GameConfig {
    GameConfig {
        world_width: 1500.0,
        world_height: 1500.0,
        food_target: 60,
        virus_target: 5,
        bot_target: 6,
        max_cells: 8,
        // Start big enough to split and pop
        starting_mass: 120.0,
        ..GameConfig::default()
    }
}

fn start(seed: u64) -> Game {
    let config = crowded_config();
    let frame = config.frame_ms;
    let mut game = Game::new(config, seed, Box::new(FrameClock::new(frame)))
        .expect("default-derived config is valid");
    game.start_game("prop", "");
    game
}

fn apply(game: &mut Game, intent: &Intent) {
    game.set_target(intent.target.0, intent.target.1);
    if intent.split {
        game.request_split();
    }
    if intent.eject {
        game.request_eject_mass();
    }
}

fn check_world(state: &GameState) -> Result<(), TestCaseError> {
    let config = &state.config;
    prop_assert!(
        state.player.cells.len() <= config.max_cells,
        "player owns {} cells, max {}",
        state.player.cells.len(),
        config.max_cells
    );
    for cell in &state.player.cells {
        prop_assert!(cell.mass > 0.0 && cell.mass.is_finite(), "bad mass {}", cell.mass);
        prop_assert!(cell.pos.is_finite());
        prop_assert!(cell.pos.x >= 0.0 && cell.pos.x <= state.bounds.width);
        prop_assert!(cell.pos.y >= 0.0 && cell.pos.y <= state.bounds.height);
    }
    for bot in state.living_bots() {
        prop_assert!(bot.cell.mass.is_finite());
        prop_assert!(bot.cell.pos.is_finite());
    }
    for particle in &state.ejected {
        prop_assert!(particle.mass > 0.0);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_random_sessions_keep_world_invariants(
        seed in any::<u64>(),
        intents in prop::collection::vec(arb_intent(), 1..150)
    ) {
        let mut game = start(seed);
        for intent in &intents {
            apply(&mut game, intent);
            if game.tick().is_none() {
                break;
            }
            let state = game.state().expect("running game has a world");
            check_world(state)?;
        }
    }

    #[test]
    fn test_populations_hold_while_running(
        seed in any::<u64>(),
        intents in prop::collection::vec(arb_intent(), 1..100)
    ) {
        let mut game = start(seed);
        for intent in &intents {
            apply(&mut game, intent);
            game.tick();
            let Some(state) = game.state() else { break };
            prop_assert_eq!(state.food.len(), state.config.food_target);
            prop_assert_eq!(state.viruses.len(), state.config.virus_target);
            prop_assert_eq!(state.living_bots().count(), state.config.bot_target);
            if game.phase() != GamePhase::Running {
                break;
            }
        }
    }

    #[test]
    fn test_split_and_eject_conserve_mass(
        masses in prop::collection::vec(1.0f32..2000.0, 1..8),
        tx in 0.0f32..1500.0,
        ty in 0.0f32..1500.0
    ) {
        let config = crowded_config();
        let mut ids = EntityIds::starting_at(1000);
        let mut player = Player::new("p", "", 0, Cell::new(1, Vec2::new(750.0, 750.0), masses[0], 0, "p"));
        for (i, &mass) in masses.iter().enumerate().skip(1) {
            let pos = Vec2::new(100.0 + i as f32 * 150.0, 400.0);
            player.cells.push(Cell::new(100 + i as u64, pos, mass, 0, "p"));
        }
        player.target = Vec2::new(tx, ty);
        let before = player.total_mass();

        split_cells(&mut player, &mut ids, &config, 0.0);
        prop_assert!((player.total_mass() - before).abs() <= before * 1e-5);
        prop_assert!(player.cells.len() <= config.max_cells);

        let mut ejected: Vec<EjectedMass> = Vec::new();
        eject_mass(&mut player, &mut ejected, &mut ids, &config);
        let after = player.total_mass() + ejected.iter().map(|e| e.mass).sum::<f32>();
        prop_assert!((after - before).abs() <= before * 1e-5);
        prop_assert!(player.cells.iter().all(|c| c.mass > 0.0));
    }

    #[test]
    fn test_eat_threshold_at_any_scale(victim in 1.0f32..5000.0) {
        let at = Vec2::new(10.0, 10.0);
        prop_assert!(!can_eat(at, victim * 1.2, at, victim));
        prop_assert!(can_eat(at, victim * 1.21, at, victim));
        prop_assert!(!can_eat(at, victim, at, victim * 1.21));
    }

    #[test]
    fn test_decide_state_is_pure(
        bot in 1.0f32..1000.0,
        other in 1.0f32..1000.0,
        distance in 0.0f32..1000.0
    ) {
        let first = decide_state(bot, other, distance, 500.0);
        prop_assert_eq!(first, decide_state(bot, other, distance, 500.0));
        if distance > 500.0 {
            prop_assert_eq!(first, AiState::Wander);
        }
        // Chase and flee are mirror images
        if first == AiState::Chase {
            prop_assert_eq!(decide_state(other, bot, distance, 500.0), AiState::Flee);
        }
    }
}
