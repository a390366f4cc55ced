use rand::seq::SliceRandom;
use std::time::Duration;
use werewolf_engine::events::{EventKind, GameEvent};
use werewolf_engine::game::{ActionRequest, GameSettings, Player, RoleCatalog, Team};
use werewolf_engine::session::{GameSession, SessionManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::try_init().ok();

    let settings = GameSettings::from_env()?;
    let manager = SessionManager::new(RoleCatalog::standard());
    let session = manager.create_game(settings)?;

    session.events().on_any(|event| match serde_json::to_string(event) {
        Ok(json) => log::info!("{}", json),
        Err(err) => log::error!("Could not serialize {}: {}", event.name(), err),
    });

    let driver = session.clone();
    session.on(EventKind::PhaseNight, move |event| {
        if let GameEvent::PhaseNight { players, night_players } = event {
            play_night(&driver, players, night_players);
        }
    });

    let driver = session.clone();
    session.on(EventKind::PhaseLynch, move |event| {
        if let GameEvent::PhaseLynch { players, .. } = event {
            play_lynch(&driver, players);
        }
    });

    let game = session.spawn();
    for i in 1..=5 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.add_player(&format!("p{}", i), &format!("Name{}", i));
    }
    game.await?;

    manager.purge_games();
    Ok(())
}

/// Every night player picks a random target; werewolves leave their own team alone.
fn play_night(session: &GameSession, players: &[Player], night_players: &[Player]) {
    let mut rng = rand::thread_rng();
    let requests: Vec<ActionRequest> = night_players
        .iter()
        .filter_map(|actor| {
            let targets: Vec<&Player> = players
                .iter()
                .filter(|p| p.id != actor.id)
                .filter(|p| actor.team() != Some(Team::Werewolf) || p.team() != Some(Team::Werewolf))
                .collect();
            let target = targets.choose(&mut rng)?;
            Some(ActionRequest {
                actor: actor.id.clone(),
                target: target.id.clone(),
            })
        })
        .collect();

    for (request, result) in requests.iter().zip(session.act_batch(&requests)) {
        log::info!("{} -> {}: {:?}", request.actor, request.target, result);
    }
}

/// Every alive player votes for someone else at random.
fn play_lynch(session: &GameSession, players: &[Player]) {
    let mut rng = rand::thread_rng();
    for voter in players {
        let others: Vec<&Player> = players.iter().filter(|p| p.id != voter.id).collect();
        if let Some(target) = others.choose(&mut rng) {
            session.vote(&voter.id, &target.id);
        }
    }
}
