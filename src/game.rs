pub use self::action::{ActionRequest, ActionResult, FailureReason};
pub use self::assign::{RoleAssigner, RoleCounts, RoleDistribution, TierRules, TIER_RULES};
pub use self::player::{KilledBy, Player};
pub use self::role::{Role, RoleCatalog, RoleKind, Team, Tier};
pub use self::settings::GameSettings;
pub use self::victory::{check_winner, Winner};
use crate::error::GameError;
use crate::events::{GameEvent, GameInfo};
use crate::time::now_iso8601;
use rand::prelude::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

mod action;
mod assign;
mod player;
mod role;
mod settings;
mod test;
mod victory;
mod votes;

/// The three phases of a game cycle.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Night,
    Day,
    Lynch,
}

impl Phase {
    /// The phases of one cycle, in order.
    pub const CYCLE: [Phase; 3] = [Phase::Night, Phase::Day, Phase::Lynch];
}

/// Represents the current stage of the game lifecycle.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub enum GameState {
    Initializing,
    WaitingForPlayers,
    /// Too few players joined; the game was destroyed.
    Cancelled,
    AssigningRoles,
    Night,
    Day,
    Lynch,
    /// A team won, or the game was torn down; the game was destroyed.
    Terminated,
}

impl From<Phase> for GameState {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Night => GameState::Night,
            Phase::Day => GameState::Day,
            Phase::Lynch => GameState::Lynch,
        }
    }
}

/// Why a death is reported in the news.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum NewsReason {
    KilledByWerewolf,
    Voted,
}

/// A game of Werewolf.
///
/// This is the synchronous core: every method mutates state immediately and queues
/// the resulting notifications, which are collected with [Game::take_events].
/// Timing is driven from outside, by [GameSession](crate::session::GameSession).
#[derive(Debug)]
pub struct Game {
    id: Option<String>,
    settings: Option<GameSettings>,
    players: Vec<Player>,
    time: Option<Phase>,
    days: u32,
    is_start: bool,
    state: GameState,
    catalog: RoleCatalog,
    /// Ids of players who joined since the last join notification.
    new_players: Vec<String>,
    /// Roles still to be handed out during role assignment.
    role_pool: Vec<Role>,
    outbox: Vec<GameEvent>,
    rng: rand_chacha::ChaCha8Rng,
}

impl Game {
    /// Creates a new game. The seed determines every shuffle and random pick.
    pub fn new(
        id: impl Into<String>,
        settings: GameSettings,
        catalog: RoleCatalog,
        seed: u64,
    ) -> Result<Self, GameError> {
        settings.validate()?;
        Ok(Game {
            id: Some(id.into()),
            settings: Some(settings),
            players: vec![],
            time: None,
            days: 0,
            is_start: false,
            state: GameState::Initializing,
            catalog,
            new_players: vec![],
            role_pool: vec![],
            outbox: vec![],
            rng: rand_chacha::ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn settings(&self) -> Option<&GameSettings> {
        self.settings.as_ref()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Gets the players that are still alive.
    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive())
    }

    pub fn time(&self) -> Option<Phase> {
        self.time
    }

    /// The number of day phases started so far.
    pub fn days(&self) -> u32 {
        self.days
    }

    /// Whether the phase loop is running.
    pub fn is_start(&self) -> bool {
        self.is_start
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Returns true once the game has been cancelled or has ended.
    pub fn is_destroyed(&self) -> bool {
        matches!(self.state, GameState::Cancelled | GameState::Terminated)
    }

    /// Finds the index of the player with the given id.
    pub fn find_player(&self, id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    /// Drains the notifications queued since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Announces the game and opens the join window.
    pub fn initialize(&mut self) {
        if self.state != GameState::Initializing {
            return;
        }
        let (Some(id), Some(settings)) = (self.id.clone(), self.settings) else {
            return;
        };
        log::info!("Game {} initialized", id);
        self.emit(GameEvent::GameInitialized {
            game: GameInfo {
                id,
                settings,
                created: now_iso8601(),
            },
        });
        self.state = GameState::WaitingForPlayers;
    }

    /// Adds a player to the game.
    ///
    /// Does nothing once role assignment has begun, or if a player with the same id
    /// has already joined.
    pub fn add_player(&mut self, id: &str, name: &str) {
        if !matches!(self.state, GameState::Initializing | GameState::WaitingForPlayers) {
            log::debug!("Rejected join from {}: game is not accepting players", id);
            return;
        }
        if self.find_player(id).is_some() {
            log::debug!("Rejected join from {}: already in the game", id);
            return;
        }
        let player = Player::new(id.into(), name.into());
        self.players.push(player.clone());
        self.new_players.push(player.id.clone());
        self.emit(GameEvent::PlayerJoined { player });
    }

    /// Announces everyone who joined since the last announcement.
    pub fn notify_new_players(&mut self) {
        if self.new_players.is_empty() || self.state != GameState::WaitingForPlayers {
            return;
        }
        let new_players = std::mem::take(&mut self.new_players)
            .iter()
            .filter_map(|id| self.players.iter().find(|p| &p.id == id).cloned())
            .collect();
        self.emit(GameEvent::PlayerNotify {
            new_players,
            players: self.players.clone(),
        });
    }

    /// Closes the join window.
    /// Cancels the game and returns `false` if too few players have joined.
    pub fn check_game(&mut self) -> bool {
        if self.state != GameState::WaitingForPlayers {
            return false;
        }
        let min_players = self.settings.map_or(u64::MAX, |s| s.min_players);
        if (self.players.len() as u64) < min_players {
            log::info!(
                "Game {:?} cancelled with {} of {} players",
                self.id,
                self.players.len(),
                min_players
            );
            self.emit(GameEvent::GameCancelled);
            self.destroy_as(GameState::Cancelled);
            return false;
        }
        self.state = GameState::AssigningRoles;
        true
    }

    /// Draws the roles for this game and shuffles the roster, ready for [Game::assign_next_role].
    pub fn prepare_roles(&mut self) {
        if self.state != GameState::AssigningRoles {
            return;
        }
        let num_players = self.players.len();
        let distribution = RoleAssigner::new(&self.catalog).distribute(num_players, &mut self.rng);
        let mut roles = distribution.roles;
        if distribution.special_shortfall > 0 {
            log::warn!(
                "Filling {} unfilled special role slots with villagers",
                distribution.special_shortfall
            );
            roles.extend((0..distribution.special_shortfall).map(|_| self.catalog.villager()));
        }

        roles.shuffle(&mut self.rng);
        self.players.shuffle(&mut self.rng);
        self.role_pool = roles;
    }

    /// Hands a role to the next player without one.
    /// Returns `false` once there is nobody left to assign.
    pub fn assign_next_role(&mut self) -> bool {
        if self.state != GameState::AssigningRoles {
            return false;
        }
        let Some(idx) = self.players.iter().position(|p| p.role.is_none()) else {
            return false;
        };
        self.role_pool.shuffle(&mut self.rng);
        let Some(role) = self.role_pool.pop() else {
            log::warn!("Role pool ran dry before every player had a role");
            return false;
        };
        log::debug!("Assigned {} to {}", role.name, self.players[idx].name);
        self.players[idx].role = Some(role);
        self.emit(GameEvent::PlayerRole {
            player: self.players[idx].clone(),
        });
        true
    }

    /// Completes role assignment and starts the phase loop.
    pub fn finish_role_assignment(&mut self) {
        if self.state != GameState::AssigningRoles {
            return;
        }
        self.players.shuffle(&mut self.rng);
        self.role_pool.clear();
        self.is_start = true;
        log::info!("Game {:?} started with {} players", self.id, self.players.len());
    }

    /// Checks whether a team has won, ending the game if so.
    pub fn check_win_conditions(&mut self) -> bool {
        if !self.is_start {
            return false;
        }
        let Some(winner) = check_winner(&self.players) else {
            return false;
        };
        log::info!("Game {:?} won by the {:?} team", self.id, winner.team());
        self.emit(GameEvent::GameWinner { winner });
        self.destroy_as(GameState::Terminated);
        true
    }

    /// Starts a phase, announcing who is alive and who acts in it.
    pub fn start_phase(&mut self, phase: Phase) {
        if !self.is_start {
            return;
        }
        self.time = Some(phase);
        self.state = phase.into();
        if phase == Phase::Day {
            self.days += 1;
        }
        let players: Vec<Player> = self.alive_players().cloned().collect();
        let active = players
            .iter()
            .filter(|p| p.role.as_ref().and_then(|r| r.active_time) == Some(phase))
            .cloned()
            .collect();
        log::info!("{:?} phase started", phase);
        self.emit(GameEvent::phase_started(phase, players, active));
    }

    /// Ends a phase: resolves the lynch, reports the news and clears per-cycle state.
    /// No actions or votes are accepted until the next phase starts.
    pub fn end_phase(&mut self, phase: Phase) {
        if !self.is_start || self.time != Some(phase) {
            return;
        }
        if phase == Phase::Lynch {
            self.resolve_lynch();
        }
        self.publish_news();
        for player in self.players.iter_mut() {
            player.reset_cycle();
            if phase == Phase::Lynch {
                player.votes = 0;
            }
        }
        self.time = None;
    }

    /// Has the player `actor_id` use their role on the player `target_id`.
    ///
    /// Returns `None` if the actor's role has no action. Requests outside an open
    /// phase, or outside the actor's active phase, fail with
    /// [FailureReason::InvalidRequest].
    pub fn act(&mut self, actor_id: &str, target_id: &str) -> Option<ActionResult> {
        let invalid = Some(ActionResult::failed(FailureReason::InvalidRequest));
        if !self.is_start || self.time.is_none() {
            return invalid;
        }
        let Some(actor) = self.find_player(actor_id) else {
            return invalid;
        };
        let Some(role) = self.players[actor].role.clone() else {
            return invalid;
        };
        if role.active_time.is_some() && role.active_time != self.time {
            return invalid;
        }
        let target = self.find_player(target_id);
        let result = role.action(Some(actor), target, &mut self.players);
        log::debug!("{} ({}) -> {}: {:?}", actor_id, role.name, target_id, result);
        result
    }

    /// Resolves a batch of actions with protections first, then reveals, then kills.
    /// Results are returned in the order the requests were given.
    pub fn act_batch(&mut self, requests: &[ActionRequest]) -> Vec<Option<ActionResult>> {
        let precedence = |req: &ActionRequest| {
            self.find_player(&req.actor)
                .and_then(|idx| self.players[idx].kind())
                .map_or(u8::MAX, RoleKind::precedence)
        };
        let mut order: Vec<(u8, usize)> = requests
            .iter()
            .enumerate()
            .map(|(idx, req)| (precedence(req), idx))
            .collect();
        order.sort();

        let mut results = vec![None; requests.len()];
        for (_, idx) in order {
            results[idx] = self.act(&requests[idx].actor, &requests[idx].target);
        }
        results
    }

    /// Records a lynch vote. Only alive players may vote, only for another alive player,
    /// and only during the lynch phase. Returns whether the vote counted.
    pub fn vote(&mut self, voter_id: &str, target_id: &str) -> bool {
        if !self.is_start || self.time != Some(Phase::Lynch) {
            return false;
        }
        let (Some(voter), Some(target)) = (self.find_player(voter_id), self.find_player(target_id))
        else {
            return false;
        };
        if !self.players[voter].alive() || !self.players[target].alive() {
            return false;
        }
        if !votes::cast_vote(&mut self.players, voter, target) {
            return false;
        }
        log::debug!("{} voted for {}", voter_id, target_id);
        self.emit(GameEvent::PlayerVote {
            player: self.players[voter].clone(),
            target: self.players[target].clone(),
        });
        true
    }

    /// Tears the game down. Safe to call more than once.
    pub fn destroy(&mut self) {
        self.destroy_as(GameState::Terminated);
    }

    fn destroy_as(&mut self, state: GameState) {
        if self.is_destroyed() {
            return;
        }
        log::info!("Game {:?} destroyed", self.id);
        self.id = None;
        self.settings = None;
        self.players.clear();
        self.new_players.clear();
        self.role_pool.clear();
        self.time = None;
        self.is_start = false;
        self.state = state;
    }

    fn resolve_lynch(&mut self) {
        let player = votes::lynch_outcome(&self.players).map(|idx| {
            let player = &mut self.players[idx];
            player.is_dead = true;
            player.is_just_killed = true;
            player.killed_by = Some(KilledBy::Voted);
            log::info!("{} was lynched with {} votes", player.name, player.votes);
            player.clone()
        });
        self.emit(GameEvent::PlayerLynched { player });
    }

    fn publish_news(&mut self) {
        let news: Vec<GameEvent> = self
            .players
            .iter()
            .filter(|p| p.is_just_killed)
            .filter_map(|victim| {
                let reason = match victim.killed_by? {
                    KilledBy::Role(RoleKind::Werewolf) => NewsReason::KilledByWerewolf,
                    KilledBy::Voted => NewsReason::Voted,
                    KilledBy::Role(_) => return None,
                };
                Some(GameEvent::GameNews {
                    is_dead: victim.is_dead,
                    victim: victim.clone(),
                    reason,
                })
            })
            .collect();
        self.outbox.extend(news);
    }

    fn emit(&mut self, event: GameEvent) {
        if self.is_destroyed() {
            return;
        }
        self.outbox.push(event);
    }
}
