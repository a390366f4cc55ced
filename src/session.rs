use crate::error::GameError;
use crate::events::{EventBus, EventKind, GameEvent};
use crate::game::{ActionRequest, ActionResult, Game, GameSettings, Phase, RoleCatalog};
use dashmap::{mapref::entry::Entry, DashMap};
use rand::{Rng, RngCore};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Granularity of every timed wait; destruction is noticed within one tick.
const TICK: Duration = Duration::from_secs(1);

/// Pause between consecutive role reveals.
const ROLE_REVEAL_DELAY: Duration = Duration::from_millis(500);

/// Manages all the game sessions running in this process.
pub struct SessionManager {
    sessions: DashMap<String, GameSession>,
    catalog: RoleCatalog,
}

/// A handle to a single game, driving its timed lifecycle and publishing its events.
///
/// Cloning the handle is cheap; all clones refer to the same game.
#[derive(Clone)]
pub struct GameSession {
    game: Arc<Mutex<Game>>,
    events: Arc<EventBus>,
}

impl SessionManager {
    pub fn new(catalog: RoleCatalog) -> Self {
        Self {
            sessions: DashMap::new(),
            catalog,
        }
    }

    /// Creates a new game session under a fresh random id. The session is not started.
    pub fn create_game(&self, settings: GameSettings) -> Result<GameSession, GameError> {
        settings.validate()?;
        loop {
            let id = Self::random_id();
            let entry = self.sessions.entry(id);
            if let Entry::Occupied(_) = entry {
                continue;
            }
            let seed = rand::thread_rng().next_u64();
            let session = GameSession::new(entry.key().clone(), settings, self.catalog.clone(), seed)?;
            entry.or_insert(session.clone());
            break Ok(session);
        }
    }

    pub fn find_game(&self, game_id: &str) -> Option<GameSession> {
        self.sessions.get(game_id).map(|session| session.clone())
    }

    pub fn num_games(&self) -> usize {
        self.sessions.len()
    }

    /// Drops every session whose game has been cancelled or has ended.
    /// Returns the number of sessions removed.
    pub fn purge_games(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|id, session| {
            let keep = !session.is_destroyed();
            if !keep {
                log::info!("Purging finished game {}", id);
            }
            keep
        });
        before - self.sessions.len()
    }

    fn random_id() -> String {
        let mut rng = rand::thread_rng();
        (0..4).map(|_| rng.gen_range('A'..='Z')).collect()
    }
}

impl GameSession {
    pub fn new(
        id: impl Into<String>,
        settings: GameSettings,
        catalog: RoleCatalog,
        seed: u64,
    ) -> Result<Self, GameError> {
        let game = Game::new(id, settings, catalog, seed)?;
        Ok(Self {
            game: Arc::new(Mutex::new(game)),
            events: Arc::new(EventBus::new()),
        })
    }

    /// The event bus this game publishes to.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Registers a listener for one kind of event.
    pub fn on<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(&GameEvent) + Send + Sync + 'static,
    {
        self.events.on(kind, listener);
    }

    /// Reads the game state.
    pub fn with_game<R>(&self, read: impl FnOnce(&Game) -> R) -> R {
        read(&*self.lock())
    }

    pub fn is_destroyed(&self) -> bool {
        self.with_game(Game::is_destroyed)
    }

    pub fn add_player(&self, id: &str, name: &str) {
        self.mutate(|game| game.add_player(id, name));
    }

    pub fn act(&self, actor_id: &str, target_id: &str) -> Option<ActionResult> {
        self.mutate(|game| game.act(actor_id, target_id))
    }

    pub fn act_batch(&self, requests: &[ActionRequest]) -> Vec<Option<ActionResult>> {
        self.mutate(|game| game.act_batch(requests))
    }

    pub fn vote(&self, voter_id: &str, target_id: &str) -> bool {
        self.mutate(|game| game.vote(voter_id, target_id))
    }

    /// Tears the game down; the lifecycle task stops at its next tick.
    pub fn destroy(&self) {
        self.mutate(Game::destroy);
    }

    /// Runs the game lifecycle on a new task.
    pub fn spawn(&self) -> JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move { session.run().await })
    }

    /// Runs the whole game lifecycle: the join window, role assignment and the phase loop.
    /// Returns once the game has been cancelled or won.
    pub async fn run(&self) {
        self.mutate(Game::initialize);
        self.wait_for_players().await;
        if !self.mutate(Game::check_game) {
            return;
        }
        self.distribute_roles().await;
        self.start_cycle().await;
    }

    async fn wait_for_players(&self) {
        let Some(settings) = self.with_game(|game| game.settings().copied()) else {
            return;
        };
        for tick in 0..settings.wait_time {
            if self.is_destroyed() {
                return;
            }
            if (tick + 1) % settings.notify_time == 0 {
                self.mutate(Game::notify_new_players);
            }
            tokio::time::sleep(TICK).await;
        }
    }

    async fn distribute_roles(&self) {
        self.mutate(Game::prepare_roles);
        while self.mutate(Game::assign_next_role) {
            tokio::time::sleep(ROLE_REVEAL_DELAY).await;
        }
        self.mutate(Game::finish_role_assignment);
    }

    async fn start_cycle(&self) {
        while self.with_game(Game::is_start) {
            for phase in Phase::CYCLE {
                if !self.with_game(Game::is_start) || self.mutate(Game::check_win_conditions) {
                    return;
                }
                self.run_phase(phase).await;
            }
        }
    }

    async fn run_phase(&self, phase: Phase) {
        self.mutate(|game| game.start_phase(phase));
        let Some(duration) = self.with_game(|game| game.settings().map(|s| s.phase_duration(phase)))
        else {
            return;
        };
        for _ in 0..duration.as_secs() {
            if !self.with_game(Game::is_start) {
                return;
            }
            tokio::time::sleep(TICK).await;
        }
        self.mutate(|game| game.end_phase(phase));
    }

    /// Applies a mutation under the game lock, then publishes the events it produced.
    /// Listeners are dropped once the game has been destroyed.
    fn mutate<R>(&self, mutation: impl FnOnce(&mut Game) -> R) -> R {
        let (result, events, destroyed) = {
            let mut game = self.lock();
            let result = mutation(&mut *game);
            (result, game.take_events(), game.is_destroyed())
        };
        for event in &events {
            self.events.emit(event);
        }
        if destroyed {
            self.events.remove_all_listeners();
        }
        result
    }

    fn lock(&self) -> MutexGuard<'_, Game> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
