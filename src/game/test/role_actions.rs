//! Role action tests. The standard table seats werewolves at p0 and p1, the guardian
//! at p2, the seer at p3 and villagers at p4 and p5.

use super::test_utils::*;
use crate::events::GameEvent;
use crate::game::{
    ActionRequest, ActionResult, FailureReason::*, KilledBy, Phase, Player, Role, RoleKind,
};

fn request(actor: &str, target: &str) -> ActionRequest {
    ActionRequest {
        actor: actor.into(),
        target: target.into(),
    }
}

#[test]
fn test_werewolf_kills_villager() {
    let mut game = create_table_in_phase(Phase::Night);

    let result = game.act("p0", "p4");

    assert_eq!(result, Some(ActionResult::success()));
    let victim = player(&game, "p4");
    assert!(victim.is_dead);
    assert!(victim.is_just_killed);
    assert_eq!(victim.killed_by, Some(KilledBy::Role(RoleKind::Werewolf)));
}

#[test]
fn test_werewolf_cannot_attack_own_team() {
    let mut game = create_table_in_phase(Phase::Night);

    assert_eq!(game.act("p0", "p1"), Some(ActionResult::failed(InvalidRequest)));
    assert!(!player(&game, "p1").is_dead);
}

#[test]
fn test_werewolf_cannot_attack_tested_werewolf_team_role() {
    let alpha = Role {
        name: "Alpha Werewolf".into(),
        is_tested: true,
        ..Role::werewolf()
    };
    let mut game = create_running_game(vec![
        Role::werewolf(),
        alpha,
        Role::villager(),
        Role::villager(),
    ]);
    game.start_phase(Phase::Night);

    assert_eq!(game.act("p0", "p1"), Some(ActionResult::failed(InvalidRequest)));
}

#[test]
fn test_malformed_requests_are_invalid() {
    let mut game = create_table_in_phase(Phase::Night);

    assert_eq!(game.act("p0", "p0"), Some(ActionResult::failed(InvalidRequest)));
    assert_eq!(game.act("p0", "nobody"), Some(ActionResult::failed(InvalidRequest)));
    assert_eq!(game.act("nobody", "p4"), Some(ActionResult::failed(InvalidRequest)));
    assert!(game.players().iter().all(|p| !p.is_dead));
}

#[test]
fn test_werewolf_is_fended_off_by_guardian() {
    let mut game = create_table_in_phase(Phase::Night);

    assert_eq!(game.act("p0", "p2"), Some(ActionResult::failed(GotAttacked)));
    assert!(!player(&game, "p2").is_dead);
}

#[test]
fn test_guardian_away_is_not_home() {
    let mut game = create_table_in_phase(Phase::Night);

    assert_eq!(game.act("p2", "p5"), Some(ActionResult::success()));
    assert_eq!(game.act("p0", "p2"), Some(ActionResult::failed(NotHome)));
}

#[test]
fn test_guard_before_kill_blocks_the_kill() {
    let mut game = create_table_in_phase(Phase::Night);

    assert_eq!(game.act("p2", "p4"), Some(ActionResult::success()));
    assert!(player(&game, "p4").is_guarded);
    assert_eq!(player(&game, "p2").target.as_deref(), Some("p4"));

    assert_eq!(game.act("p0", "p4"), Some(ActionResult::failed(GotAttacked)));
    assert!(!player(&game, "p4").is_dead);
}

#[test]
fn test_kill_before_guard_goes_through() {
    let mut game = create_table_in_phase(Phase::Night);

    assert_eq!(game.act("p0", "p4"), Some(ActionResult::success()));
    assert_eq!(game.act("p2", "p4"), Some(ActionResult::failed(WasDead)));
    assert!(player(&game, "p4").is_dead);
    assert!(!player(&game, "p4").is_guarded);
}

#[test]
fn test_batch_resolves_guard_before_kill() {
    let mut game = create_table_in_phase(Phase::Night);

    // The kill is listed first, but the batch applies the protection first.
    let results = game.act_batch(&[request("p0", "p4"), request("p2", "p4"), request("p3", "p1")]);

    assert_eq!(results[0], Some(ActionResult::failed(GotAttacked)));
    assert_eq!(results[1], Some(ActionResult::success()));
    assert_eq!(
        results[2],
        Some(ActionResult::reveal("Player1 is a werewolf.".into()))
    );
    assert!(!player(&game, "p4").is_dead);
}

#[test]
fn test_second_werewolf_finds_victim_dead() {
    let mut game = create_table_in_phase(Phase::Night);

    assert_eq!(game.act("p0", "p5"), Some(ActionResult::success()));
    assert_eq!(game.act("p1", "p5"), Some(ActionResult::failed(WasDead)));
}

#[test]
fn test_guardian_cannot_protect_werewolf() {
    let mut game = create_table_in_phase(Phase::Night);

    assert_eq!(game.act("p2", "p0"), Some(ActionResult::failed(GotAttacked)));
    assert!(!player(&game, "p0").is_guarded);
    assert_eq!(player(&game, "p2").target, None);
}

#[test]
fn test_guardian_protects_once_per_night() {
    let mut game = create_table_in_phase(Phase::Night);

    assert_eq!(game.act("p2", "p4"), Some(ActionResult::success()));
    assert_eq!(game.act("p2", "p5"), Some(ActionResult::failed(InvalidRequest)));
    assert!(!player(&game, "p5").is_guarded);
}

#[test]
fn test_guardian_cannot_protect_someone_away() {
    let mut game = create_running_game(vec![
        Role::werewolf(),
        Role::guardian(),
        Role::guardian(),
        Role::villager(),
        Role::villager(),
    ]);
    game.start_phase(Phase::Night);

    assert_eq!(game.act("p1", "p3"), Some(ActionResult::success()));
    assert_eq!(game.act("p2", "p1"), Some(ActionResult::failed(NotHome)));
}

#[test]
fn test_seer_reveals_team() {
    let mut game = create_table_in_phase(Phase::Night);
    let before: Vec<Player> = game.players().to_vec();

    assert_eq!(
        game.act("p3", "p0"),
        Some(ActionResult::reveal("Player0 is a werewolf.".into()))
    );
    assert_eq!(
        game.act("p3", "p4"),
        Some(ActionResult::reveal("Player4 is not a werewolf.".into()))
    );
    assert_eq!(game.players(), &before[..]);
}

#[test]
fn test_seer_cannot_read_the_dead() {
    let mut game = create_table_in_phase(Phase::Night);
    game.act("p0", "p4");

    assert_eq!(game.act("p3", "p4"), Some(ActionResult::failed(WasDead)));
}

#[test]
fn test_villager_has_no_action() {
    let mut game = create_table_in_phase(Phase::Night);

    assert_eq!(game.act("p4", "p0"), None);
    assert!(!player(&game, "p0").is_dead);
}

#[test]
fn test_night_roles_cannot_act_by_day() {
    let mut game = create_table_in_phase(Phase::Day);

    assert_eq!(game.act("p0", "p4"), Some(ActionResult::failed(InvalidRequest)));
    assert!(!player(&game, "p4").is_dead);
}

#[test]
fn test_dead_players_cannot_act() {
    let mut game = create_table_in_phase(Phase::Night);
    let idx = game.find_player("p2").unwrap();
    game.players[idx].is_dead = true;

    assert_eq!(game.act("p2", "p4"), Some(ActionResult::failed(InvalidRequest)));
}

#[test]
fn test_target_dead_from_earlier_cycle() {
    let mut game = create_table_in_phase(Phase::Night);
    game.act("p0", "p5");
    game.end_phase(Phase::Night);
    game.start_phase(Phase::Night);

    assert_eq!(game.act("p1", "p5"), Some(ActionResult::failed(WasDead)));
}

#[test]
fn test_actions_rejected_after_destruction() {
    let mut game = create_table_in_phase(Phase::Night);
    game.destroy();

    assert_eq!(game.act("p0", "p4"), Some(ActionResult::failed(InvalidRequest)));
    assert!(game.take_events().is_empty());
}

#[test]
fn test_role_action_without_a_game() {
    let mut players = vec![
        Player::new("a".into(), "A".into()),
        Player::new("b".into(), "B".into()),
    ];
    players[0].role = Some(Role::werewolf());
    players[1].role = Some(Role::villager());
    let werewolf = Role::werewolf();

    assert_eq!(
        werewolf.action(None, Some(1), &mut players),
        Some(ActionResult::failed(InvalidRequest))
    );
    assert_eq!(
        werewolf.action(Some(0), None, &mut players),
        Some(ActionResult::failed(InvalidRequest))
    );
    assert_eq!(werewolf.action(Some(0), Some(1), &mut players), Some(ActionResult::success()));
    assert_eq!(Role::villager().action(Some(1), Some(0), &mut players), None);
}

#[test]
fn test_action_result_serializes_reason() {
    let value = serde_json::to_value(ActionResult::failed(NotHome)).unwrap();
    assert_eq!(value, serde_json::json!({ "isSuccess": false, "reason": "not_home" }));
}

#[test]
fn test_actions_after_the_night_closes_are_rejected() {
    let mut game = create_table_in_phase(Phase::Night);
    game.end_phase(Phase::Night);

    assert_eq!(game.act("p0", "p4"), Some(ActionResult::failed(InvalidRequest)));
    assert_eq!(game.act("p2", "p5"), Some(ActionResult::failed(InvalidRequest)));
    assert!(!player(&game, "p4").is_dead);
    assert!(!player(&game, "p5").is_guarded);

    game.start_phase(Phase::Day);
    game.end_phase(Phase::Day);
    assert!(game.take_events().iter().all(|e| !matches!(e, GameEvent::GameNews { .. })));
}

#[test]
fn test_guardian_dead_from_earlier_cycle_was_dead() {
    let mut game = create_table_in_phase(Phase::Night);
    let idx = game.find_player("p2").unwrap();
    game.players[idx].is_dead = true;

    assert_eq!(game.act("p0", "p2"), Some(ActionResult::failed(WasDead)));
}

#[test]
fn test_protecting_werewolf_dead_from_earlier_cycle_was_dead() {
    let mut game = create_table_in_phase(Phase::Night);
    let idx = game.find_player("p0").unwrap();
    game.players[idx].is_dead = true;

    assert_eq!(game.act("p2", "p0"), Some(ActionResult::failed(WasDead)));
    assert_eq!(player(&game, "p2").target, None);
}

#[test]
fn test_target_away_but_dead_from_earlier_cycle_was_dead() {
    let mut game = create_table_in_phase(Phase::Night);
    let idx = game.find_player("p4").unwrap();
    game.players[idx].is_dead = true;
    game.players[idx].target = Some("p5".into());

    assert_eq!(game.act("p0", "p4"), Some(ActionResult::failed(WasDead)));
    assert_eq!(game.act("p2", "p4"), Some(ActionResult::failed(WasDead)));
}
