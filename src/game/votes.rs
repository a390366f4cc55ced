use super::player::Player;

/// Records a lynch vote from the player at `voter` against the player at `target`.
/// Returns `false` and leaves the tally untouched when a player votes for themselves.
pub fn cast_vote(players: &mut [Player], voter: usize, target: usize) -> bool {
    if voter == target {
        return false;
    }
    players[target].votes += 1;
    true
}

/// Finds the alive player to be lynched, if there is one.
///
/// The player with the most votes is lynched. Nobody is lynched when the top
/// count is shared, or when no votes were cast at all.
pub fn lynch_outcome(players: &[Player]) -> Option<usize> {
    let max_votes = players.iter().filter(|p| p.alive()).map(|p| p.votes).max()?;
    if max_votes == 0 {
        return None;
    }
    let mut leaders = players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.alive() && p.votes == max_votes)
        .map(|(idx, _)| idx);
    match (leaders.next(), leaders.next()) {
        (Some(idx), None) => Some(idx),
        _ => None,
    }
}
