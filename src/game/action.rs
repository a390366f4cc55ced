use super::player::{KilledBy, Player};
use super::role::{Role, RoleKind, Team};
use serde::{Deserialize, Serialize};

/// Why a role action did not take effect.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The target was out acting on someone else.
    NotHome,
    /// The target is already dead.
    WasDead,
    /// The actor was fended off by the target.
    GotAttacked,
    /// The request itself was malformed.
    InvalidRequest,
}

/// The outcome of a role action.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl ActionResult {
    pub fn success() -> Self {
        Self { is_success: true, reason: None, result: None }
    }

    pub fn reveal(result: String) -> Self {
        Self { is_success: true, reason: None, result: Some(result) }
    }

    pub fn failed(reason: FailureReason) -> Self {
        Self { is_success: false, reason: Some(reason), result: None }
    }
}

/// A request for a player to use their role on another player.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct ActionRequest {
    pub actor: String,
    pub target: String,
}

impl RoleKind {
    /// Resolution order within a batch: protections land before reveals and kills.
    pub fn precedence(self) -> u8 {
        match self {
            RoleKind::Guardian => 0,
            RoleKind::Seer => 1,
            RoleKind::Werewolf => 2,
            RoleKind::Villager => 3,
        }
    }
}

impl Role {
    /// Performs this role's action for the player at index `actor` on the player at index `target`.
    ///
    /// Returns `None` for roles with no action. Every failure is reported as an
    /// [ActionResult] carrying the first matching [FailureReason].
    pub fn action(
        &self,
        actor: Option<usize>,
        target: Option<usize>,
        players: &mut [Player],
    ) -> Option<ActionResult> {
        use FailureReason::*;

        if self.kind == RoleKind::Villager {
            return None;
        }

        let (Some(actor), Some(target)) = (actor, target) else {
            return Some(ActionResult::failed(InvalidRequest));
        };
        if actor == target || actor >= players.len() || target >= players.len() {
            return Some(ActionResult::failed(InvalidRequest));
        }
        if players[actor].target.is_some() || players[actor].is_dead {
            return Some(ActionResult::failed(InvalidRequest));
        }

        let result = match self.kind {
            RoleKind::Werewolf => self.attack(actor, target, players),
            RoleKind::Guardian => protect(actor, target, players),
            RoleKind::Seer => divine(target, players),
            RoleKind::Villager => return None,
        };
        Some(result)
    }

    fn attack(&self, _actor: usize, target: usize, players: &mut [Player]) -> ActionResult {
        use FailureReason::*;
        let victim = &mut players[target];

        if victim.team() == Some(Team::Werewolf) {
            return ActionResult::failed(InvalidRequest);
        }
        if victim.died_earlier() {
            return ActionResult::failed(WasDead);
        }
        if victim.target.is_some() {
            return ActionResult::failed(NotHome);
        }
        if victim.is_guarded || victim.kind() == Some(RoleKind::Guardian) {
            return ActionResult::failed(GotAttacked);
        }
        if victim.is_just_killed {
            return ActionResult::failed(WasDead);
        }

        victim.is_dead = true;
        victim.is_just_killed = true;
        victim.killed_by = Some(KilledBy::Role(self.kind));
        ActionResult::success()
    }
}

fn protect(actor: usize, target: usize, players: &mut [Player]) -> ActionResult {
    use FailureReason::*;
    let ward = &players[target];

    if ward.died_earlier() {
        return ActionResult::failed(WasDead);
    }
    if ward.target.is_some() {
        return ActionResult::failed(NotHome);
    }
    if ward.kind() == Some(RoleKind::Werewolf) {
        return ActionResult::failed(GotAttacked);
    }
    if ward.is_just_killed {
        return ActionResult::failed(WasDead);
    }

    let ward_id = ward.id.clone();
    players[target].is_guarded = true;
    players[actor].target = Some(ward_id);
    ActionResult::success()
}

fn divine(target: usize, players: &[Player]) -> ActionResult {
    let subject = &players[target];
    if subject.is_just_killed || subject.is_dead {
        return ActionResult::failed(FailureReason::WasDead);
    }
    let verdict = match subject.team() {
        Some(Team::Werewolf) => "a werewolf",
        _ => "not a werewolf",
    };
    ActionResult::reveal(format!("{} is {}.", subject.name, verdict))
}
