use super::player::Player;
use super::role::Team;
use serde::{Deserialize, Serialize};

/// The team that won the game.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub enum Winner {
    VillagerWin,
    WerewolfWin,
}

impl Winner {
    pub fn team(self) -> Team {
        match self {
            Winner::VillagerWin => Team::Villager,
            Winner::WerewolfWin => Team::Werewolf,
        }
    }
}

/// Decides whether the game is over, judging only by the teams of the alive players.
///
/// The villagers win once every alive player is on their team. The werewolves win
/// once every alive player is on theirs, or once both teams are level in number.
pub fn check_winner(players: &[Player]) -> Option<Winner> {
    let alive = || players.iter().filter(|p| p.alive());
    let count = |team: Team| alive().filter(|p| p.team() == Some(team)).count();

    if alive().all(|p| p.team() == Some(Team::Villager)) {
        return Some(Winner::VillagerWin);
    }
    if alive().all(|p| p.team() == Some(Team::Werewolf))
        || count(Team::Werewolf) == count(Team::Villager)
    {
        return Some(Winner::WerewolfWin);
    }
    None
}
