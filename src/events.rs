use crate::game::{GameSettings, NewsReason, Phase, Player, Winner};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};

/// The name of each notification published by a game.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EventKind {
    GameInitialized,
    GameCancelled,
    GameWinner,
    GameNews,
    PlayerJoined,
    PlayerNotify,
    PlayerRole,
    PlayerVote,
    PlayerLynched,
    PhaseNight,
    PhaseDay,
    PhaseLynch,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::GameInitialized => "game.initialized",
            EventKind::GameCancelled => "game.cancelled",
            EventKind::GameWinner => "game.winner",
            EventKind::GameNews => "game.news",
            EventKind::PlayerJoined => "player.joined",
            EventKind::PlayerNotify => "player.notify",
            EventKind::PlayerRole => "player.role",
            EventKind::PlayerVote => "player.vote",
            EventKind::PlayerLynched => "player.lynched",
            EventKind::PhaseNight => "phase.night",
            EventKind::PhaseDay => "phase.day",
            EventKind::PhaseLynch => "phase.lynch",
        }
    }
}

/// Public details of a game, sent when it is initialised.
#[derive(Clone, Serialize, Debug)]
pub struct GameInfo {
    pub id: String,
    pub settings: GameSettings,
    /// ISO-8601 creation timestamp.
    pub created: String,
}

/// A notification published by a game. Player payloads are snapshots taken when the event fired.
#[derive(Clone, Serialize, Debug)]
#[serde(tag = "type")]
pub enum GameEvent {
    #[serde(rename = "game.initialized")]
    GameInitialized { game: GameInfo },
    #[serde(rename = "game.cancelled")]
    GameCancelled,
    #[serde(rename = "game.winner")]
    GameWinner { winner: Winner },
    #[serde(rename = "game.news")]
    GameNews {
        #[serde(rename = "isDead")]
        is_dead: bool,
        victim: Player,
        reason: NewsReason,
    },
    #[serde(rename = "player.joined")]
    PlayerJoined { player: Player },
    #[serde(rename = "player.notify")]
    PlayerNotify {
        #[serde(rename = "newPlayers")]
        new_players: Vec<Player>,
        players: Vec<Player>,
    },
    #[serde(rename = "player.role")]
    PlayerRole { player: Player },
    #[serde(rename = "player.vote")]
    PlayerVote { player: Player, target: Player },
    #[serde(rename = "player.lynched")]
    PlayerLynched {
        #[serde(skip_serializing_if = "Option::is_none")]
        player: Option<Player>,
    },
    #[serde(rename = "phase.night")]
    PhaseNight {
        players: Vec<Player>,
        #[serde(rename = "nightPlayers")]
        night_players: Vec<Player>,
    },
    #[serde(rename = "phase.day")]
    PhaseDay {
        players: Vec<Player>,
        #[serde(rename = "dayPlayers")]
        day_players: Vec<Player>,
    },
    #[serde(rename = "phase.lynch")]
    PhaseLynch {
        players: Vec<Player>,
        #[serde(rename = "lynchPlayers")]
        lynch_players: Vec<Player>,
    },
}

impl GameEvent {
    /// Builds the phase-start notification for `phase`.
    pub fn phase_started(phase: Phase, players: Vec<Player>, active: Vec<Player>) -> Self {
        match phase {
            Phase::Night => GameEvent::PhaseNight { players, night_players: active },
            Phase::Day => GameEvent::PhaseDay { players, day_players: active },
            Phase::Lynch => GameEvent::PhaseLynch { players, lynch_players: active },
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::GameInitialized { .. } => EventKind::GameInitialized,
            GameEvent::GameCancelled => EventKind::GameCancelled,
            GameEvent::GameWinner { .. } => EventKind::GameWinner,
            GameEvent::GameNews { .. } => EventKind::GameNews,
            GameEvent::PlayerJoined { .. } => EventKind::PlayerJoined,
            GameEvent::PlayerNotify { .. } => EventKind::PlayerNotify,
            GameEvent::PlayerRole { .. } => EventKind::PlayerRole,
            GameEvent::PlayerVote { .. } => EventKind::PlayerVote,
            GameEvent::PlayerLynched { .. } => EventKind::PlayerLynched,
            GameEvent::PhaseNight { .. } => EventKind::PhaseNight,
            GameEvent::PhaseDay { .. } => EventKind::PhaseDay,
            GameEvent::PhaseLynch { .. } => EventKind::PhaseLynch,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

pub type Listener = Arc<dyn Fn(&GameEvent) + Send + Sync>;

/// Fans notifications out to registered listeners.
///
/// Listeners run in registration order on the publishing task, with no lock held,
/// so a listener may publish or register further listeners.
#[derive(Default)]
pub struct EventBus {
    /// Each listener with the event it listens for; `None` listens for everything.
    listeners: Mutex<Vec<(Option<EventKind>, Listener)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for one kind of event.
    pub fn on<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(&GameEvent) + Send + Sync + 'static,
    {
        self.register(Some(kind), Arc::new(listener));
    }

    /// Registers a listener for every kind of event.
    pub fn on_any<F>(&self, listener: F)
    where
        F: Fn(&GameEvent) + Send + Sync + 'static,
    {
        self.register(None, Arc::new(listener));
    }

    /// Delivers an event to every listener registered for it.
    pub fn emit(&self, event: &GameEvent) {
        let kind = event.kind();
        let listeners: Vec<Listener> = self
            .lock()
            .iter()
            .filter(|(k, _)| k.map_or(true, |k| k == kind))
            .map(|(_, l)| l.clone())
            .collect();
        log::trace!("Emitting {} to {} listeners", kind.as_str(), listeners.len());
        for listener in listeners {
            listener(event);
        }
    }

    pub fn remove_all_listeners(&self) {
        self.lock().clear();
    }

    pub fn num_listeners(&self) -> usize {
        self.lock().len()
    }

    fn register(&self, kind: Option<EventKind>, listener: Listener) {
        self.lock().push((kind, listener));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Option<EventKind>, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
