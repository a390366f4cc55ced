//! Test utilities and helper functions for game testing

use crate::events::{EventKind, GameEvent};
use crate::game::{Game, GameSettings, GameState, Phase, Role, RoleCatalog};

/// Settings matching a small demo game.
pub fn test_settings() -> GameSettings {
    GameSettings {
        max_players: 10,
        min_players: 5,
        wait_time: 5,
        notify_time: 2,
        night_time: 3,
        day_time: 3,
        lynch_time: 3,
    }
}

/// Creates a game that is open for players.
pub fn create_test_game(seed: u64) -> Game {
    let mut game = Game::new("game-1", test_settings(), RoleCatalog::standard(), seed).unwrap();
    game.initialize();
    game.take_events();
    game
}

/// Adds `num_players` players with ids `p0`, `p1`, ... and names `Player0`, `Player1`, ...
pub fn add_players(game: &mut Game, num_players: usize) {
    for i in 0..num_players {
        game.add_player(&format!("p{}", i), &format!("Player{}", i));
    }
}

/// Creates a game with a running phase loop, where player `p{i}` holds `roles[i]`.
pub fn create_running_game(roles: Vec<Role>) -> Game {
    let mut game = create_test_game(42);
    add_players(&mut game, roles.len());
    for (player, role) in game.players.iter_mut().zip(roles) {
        player.role = Some(role);
    }
    game.state = GameState::AssigningRoles;
    game.is_start = true;
    game.take_events();
    game
}

/// The standard six-player table: two werewolves, a guardian, a seer and two villagers.
pub fn create_standard_table() -> Game {
    create_running_game(vec![
        Role::werewolf(),
        Role::werewolf(),
        Role::guardian(),
        Role::seer(),
        Role::villager(),
        Role::villager(),
    ])
}

/// Like [create_standard_table], with the given phase already started.
pub fn create_table_in_phase(phase: Phase) -> Game {
    let mut game = create_standard_table();
    game.start_phase(phase);
    game.take_events();
    game
}

/// Gets the player with the given id.
pub fn player<'a>(game: &'a Game, id: &str) -> &'a crate::game::Player {
    let idx = game.find_player(id).unwrap();
    &game.players[idx]
}

/// The envelope names of the given events, in order.
pub fn event_names(events: &[GameEvent]) -> Vec<&'static str> {
    events.iter().map(|e| e.name()).collect()
}

/// Counts the events of one kind.
pub fn count_events(events: &[GameEvent], kind: EventKind) -> usize {
    events.iter().filter(|e| e.kind() == kind).count()
}
