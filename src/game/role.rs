use super::Phase;
use crate::error::GameError;
use serde::{Deserialize, Serialize};

/// The behaviour a role carries. Action rules dispatch on this tag.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub enum RoleKind {
    Werewolf,
    Guardian,
    Seer,
    Villager,
}

/// The two teams of the base rule set.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Villager,
    Werewolf,
}

/// Balance tier of a role; special roles are capped per tier.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub enum Tier {
    S,
    A,
    B,
    C,
}

/// A role definition. Each player receives their own copy when roles are assigned.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct Role {
    pub kind: RoleKind,
    pub name: String,
    pub tier: Tier,
    pub team: Team,
    pub description: String,
    /// The phase in which this role acts, or `None` for passive roles.
    pub active_time: Option<Phase>,
    /// Whether this role may be drawn into the special-role pool regardless of its team.
    pub is_tested: bool,
}

impl Role {
    pub fn werewolf() -> Self {
        Self {
            kind: RoleKind::Werewolf,
            name: "Werewolf".into(),
            tier: Tier::A,
            team: Team::Werewolf,
            description: "The Werewolf is a powerful role that can kill other players during the night."
                .into(),
            active_time: Some(Phase::Night),
            is_tested: false,
        }
    }

    pub fn guardian() -> Self {
        Self {
            kind: RoleKind::Guardian,
            name: "Guardian".into(),
            tier: Tier::A,
            team: Team::Villager,
            description: "A guardian is a role that protects the village from werewolves.".into(),
            active_time: Some(Phase::Night),
            is_tested: false,
        }
    }

    pub fn seer() -> Self {
        Self {
            kind: RoleKind::Seer,
            name: "Seer".into(),
            tier: Tier::B,
            team: Team::Villager,
            description:
                "A seer is a villager that can learn the behavior of other players in game.".into(),
            active_time: Some(Phase::Night),
            is_tested: false,
        }
    }

    pub fn villager() -> Self {
        Self {
            kind: RoleKind::Villager,
            name: "Villager".into(),
            tier: Tier::C,
            team: Team::Villager,
            description: "A villager is a neutral role that does nothing.".into(),
            active_time: None,
            is_tested: false,
        }
    }
}

/// The set of role definitions known to the engine.
#[derive(Clone, Debug)]
pub struct RoleCatalog {
    roles: Vec<Role>,
}

impl RoleCatalog {
    /// Creates a catalog from the given definitions.
    /// A Werewolf and a Villager definition must both be present.
    pub fn new(roles: Vec<Role>) -> Result<Self, GameError> {
        if roles.is_empty() {
            return Err(GameError::EmptyCatalog);
        }
        for required in [RoleKind::Werewolf, RoleKind::Villager] {
            if !roles.iter().any(|r| r.kind == required) {
                return Err(GameError::MissingRequiredRole(required));
            }
        }
        Ok(Self { roles })
    }

    /// The catalog of built-in roles.
    pub fn standard() -> Self {
        Self {
            roles: vec![Role::werewolf(), Role::guardian(), Role::seer(), Role::villager()],
        }
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Gets the first definition of the given kind.
    pub fn find(&self, kind: RoleKind) -> Option<&Role> {
        self.roles.iter().find(|r| r.kind == kind)
    }

    /// Gets the base Werewolf definition.
    pub fn werewolf(&self) -> Role {
        self.find(RoleKind::Werewolf).cloned().unwrap_or_else(Role::werewolf)
    }

    /// Gets the base Villager definition.
    pub fn villager(&self) -> Role {
        self.find(RoleKind::Villager).cloned().unwrap_or_else(Role::villager)
    }

    /// Gets the roles eligible to be drawn as special roles, with no name appearing twice.
    ///
    /// That is every villager-team role that is not a Villager, plus every tested role.
    /// The base Werewolf and Villager definitions are never included.
    pub fn special_pool(&self) -> Vec<Role> {
        let (werewolf, villager) = (self.werewolf(), self.villager());
        let mut pool: Vec<Role> = vec![];
        for role in &self.roles {
            let eligible = (role.team == Team::Villager && role.kind != RoleKind::Villager)
                || role.is_tested;
            let base = role.name == werewolf.name || role.name == villager.name;
            if eligible && !base && pool.iter().all(|r| r.name != role.name) {
                pool.push(role.clone());
            }
        }
        pool
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
