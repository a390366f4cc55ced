use super::role::{Role, RoleCatalog, Tier};
use rand::prelude::SliceRandom;
use rand::Rng;

/// Caps on the number of special roles of each tier in one game.
#[derive(Clone, Copy, Debug)]
pub struct TierRules {
    pub max_s_tier: usize,
    pub max_a_tier: usize,
    pub max_b_tier: usize,
}

pub const TIER_RULES: TierRules = TierRules {
    max_s_tier: 1,
    max_a_tier: 2,
    max_b_tier: 3,
};

/// How many of each kind of role a game of a given size wants.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RoleCounts {
    pub werewolves: usize,
    pub specials: usize,
    pub villagers: usize,
}

impl RoleCounts {
    pub fn new(num_players: usize) -> Self {
        let werewolves = num_players / 4;
        let specials = num_players / 4;
        Self {
            werewolves,
            specials,
            villagers: num_players - werewolves - specials,
        }
    }
}

/// The roles produced for one game.
#[derive(Clone, Debug)]
pub struct RoleDistribution {
    pub roles: Vec<Role>,
    /// Special-role slots that could not be filled because the tier caps or the pool ran out.
    pub special_shortfall: usize,
}

/// Draws a balanced set of roles from a [RoleCatalog].
pub struct RoleAssigner<'a> {
    catalog: &'a RoleCatalog,
}

impl<'a> RoleAssigner<'a> {
    pub fn new(catalog: &'a RoleCatalog) -> Self {
        Self { catalog }
    }

    /// Produces a shuffled distribution of roles for `num_players` players.
    ///
    /// A quarter of the players are werewolves, a quarter special roles and the rest
    /// villagers. When special roles run out the distribution is shorter than
    /// `num_players` and the difference is reported in `special_shortfall`.
    pub fn distribute(&self, num_players: usize, rng: &mut impl Rng) -> RoleDistribution {
        let counts = RoleCounts::new(num_players);
        let mut roles = Vec::with_capacity(num_players);

        roles.extend((0..counts.werewolves).map(|_| self.catalog.werewolf()));
        let specials = self.pick_special_roles(counts.specials, rng);
        let special_shortfall = counts.specials - specials.len();
        roles.extend(specials);
        roles.extend((0..counts.villagers).map(|_| self.catalog.villager()));

        roles.shuffle(rng);
        RoleDistribution { roles, special_shortfall }
    }

    /// Picks up to `count` distinct special roles at random, honouring the tier caps.
    pub fn pick_special_roles(&self, count: usize, rng: &mut impl Rng) -> Vec<Role> {
        let mut picked = vec![];
        let mut available = self.catalog.special_pool();
        let (mut s_tier, mut a_tier, mut b_tier) = (0, 0, 0);

        available.shuffle(rng);

        while picked.len() < count && !available.is_empty() {
            available.shuffle(rng);

            let candidates: Vec<&Role> = available
                .iter()
                .filter(|r| match r.tier {
                    Tier::S => s_tier < TIER_RULES.max_s_tier,
                    Tier::A => a_tier < TIER_RULES.max_a_tier,
                    Tier::B => b_tier < TIER_RULES.max_b_tier,
                    Tier::C => true,
                })
                .collect();

            let Some(chosen) = candidates.choose(rng).map(|r| (*r).clone()) else {
                break;
            };

            match chosen.tier {
                Tier::S => s_tier += 1,
                Tier::A => a_tier += 1,
                Tier::B => b_tier += 1,
                Tier::C => {}
            }
            available.retain(|r| r.name != chosen.name);
            picked.push(chosen);
        }

        if picked.len() < count {
            log::warn!(
                "Only {} of {} special roles could be picked",
                picked.len(),
                count
            );
        }
        picked
    }
}
