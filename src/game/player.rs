use super::role::{Role, RoleKind, Team};
use serde::{Deserialize, Serialize};

/// A game player.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    /// Assigned once, when roles are distributed.
    pub role: Option<Role>,
    pub is_dead: bool,
    pub is_guarded: bool,
    pub is_just_killed: bool,
    /// The id of the player this player is acting on during the current cycle.
    pub target: Option<String>,
    pub killed_by: Option<KilledBy>,
    pub votes: u32,
}

/// What caused a player's death.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum KilledBy {
    /// Killed by the action of a role.
    Role(RoleKind),
    /// Lynched by the village.
    Voted,
}

impl Player {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            role: None,
            is_dead: false,
            is_guarded: false,
            is_just_killed: false,
            target: None,
            killed_by: None,
            votes: 0,
        }
    }

    pub fn alive(&self) -> bool {
        !self.is_dead
    }

    /// Whether this player died in an earlier cycle, as opposed to the current one.
    pub fn died_earlier(&self) -> bool {
        self.is_dead && !self.is_just_killed
    }

    pub fn team(&self) -> Option<Team> {
        self.role.as_ref().map(|r| r.team)
    }

    pub fn kind(&self) -> Option<RoleKind> {
        self.role.as_ref().map(|r| r.kind)
    }

    /// Clears the per-cycle action state.
    pub fn reset_cycle(&mut self) {
        self.is_just_killed = false;
        self.target = None;
        self.is_guarded = false;
    }
}
