//! Joining, join notifications and cancellation tests

use super::test_utils::*;
use crate::events::{EventKind, GameEvent};
use crate::game::{Game, GameState, RoleCatalog};

#[test]
fn test_initialize_announces_game() {
    let mut game = Game::new("abc", test_settings(), RoleCatalog::standard(), 0).unwrap();
    assert_eq!(game.state(), GameState::Initializing);

    game.initialize();
    game.initialize();

    let events = game.take_events();
    assert_eq!(event_names(&events), vec!["game.initialized"]);
    let GameEvent::GameInitialized { game: info } = &events[0] else {
        panic!("Expected game.initialized");
    };
    assert_eq!(info.id, "abc");
    assert_eq!(info.settings, test_settings());
    assert_eq!(game.state(), GameState::WaitingForPlayers);
}

#[test]
fn test_player_joins() {
    let mut game = create_test_game(0);

    game.add_player("p1", "Alice");

    assert_eq!(game.players().len(), 1);
    let events = game.take_events();
    assert!(matches!(
        &events[..],
        [GameEvent::PlayerJoined { player }] if player.name == "Alice" && player.role.is_none()
    ));
}

#[test]
fn test_duplicate_id_is_ignored() {
    let mut game = create_test_game(0);

    game.add_player("p1", "Alice");
    game.add_player("p1", "Impostor");

    assert_eq!(game.players().len(), 1);
    assert_eq!(game.players()[0].name, "Alice");
    assert_eq!(count_events(&game.take_events(), EventKind::PlayerJoined), 1);
}

#[test]
fn test_join_before_initialization_is_accepted() {
    let mut game = Game::new("abc", test_settings(), RoleCatalog::standard(), 0).unwrap();
    game.add_player("p1", "Alice");
    assert_eq!(game.players().len(), 1);
}

#[test]
fn test_join_after_start_is_ignored() {
    let mut game = create_standard_table();

    game.add_player("late", "Late");

    assert_eq!(game.players().len(), 6);
    assert!(game.take_events().is_empty());
}

#[test]
fn test_join_during_role_assignment_is_ignored() {
    let mut game = create_test_game(0);
    add_players(&mut game, 5);
    assert!(game.check_game());
    game.take_events();

    game.add_player("late", "Late");

    assert_eq!(game.players().len(), 5);
    assert!(game.take_events().is_empty());
}

#[test]
fn test_max_players_is_advisory() {
    let mut game = create_test_game(0);
    add_players(&mut game, 12);
    assert_eq!(game.players().len(), 12);
}

#[test]
fn test_notify_batches_new_players() {
    let mut game = create_test_game(0);
    add_players(&mut game, 2);
    game.take_events();

    game.notify_new_players();
    game.add_player("p9", "Late");
    game.take_events();
    game.notify_new_players();
    game.notify_new_players();

    let events = game.take_events();
    let [GameEvent::PlayerNotify { new_players, players }] = &events[..] else {
        panic!("Expected a single player.notify, got {:?}", event_names(&events));
    };
    assert_eq!(new_players.len(), 1);
    assert_eq!(new_players[0].id, "p9");
    assert_eq!(players.len(), 3);
}

#[test]
fn test_too_few_players_cancels_the_game() {
    let mut game = create_test_game(0);
    add_players(&mut game, 4);
    game.take_events();

    assert!(!game.check_game());

    assert_eq!(event_names(&game.take_events()), vec!["game.cancelled"]);
    assert_eq!(game.state(), GameState::Cancelled);
    assert!(game.is_destroyed());
    assert!(game.players().is_empty());
    assert_eq!(game.id(), None);

    game.add_player("p7", "Late");
    game.prepare_roles();
    assert!(!game.assign_next_role());
    assert!(game.players().is_empty());
    assert!(game.take_events().is_empty());
}

#[test]
fn test_enough_players_moves_to_role_assignment() {
    let mut game = create_test_game(0);
    add_players(&mut game, 5);

    assert!(game.check_game());
    assert_eq!(game.state(), GameState::AssigningRoles);
    assert!(!game.is_start());
}
