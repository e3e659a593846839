//! Round pairing.
//!
//! Teams are ranked by wins (ties by [`TeamId`]) and walked from the bottom
//! of the table up. Each still-unpaired team draws its opponent uniformly
//! from the unpaired teams among the next `spread` ranks. The walk is greedy
//! and never backtracks, which skews opponents toward the far edge of the
//! window: a close neighbour is more likely to have been taken already.
//!
//! With an even number of teams the walk cannot strand anyone, since a
//! window can only be emptied by teams ranked above it. Odd team lists
//! always strand the last team, and that surfaces as
//! [`SimError::MatchmakingExhausted`].

use fxhash::FxHashSet;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::team::{Team, TeamId};

/// One pairing. `first` is the lower-ranked team of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub first: TeamId,
    pub second: TeamId,
    /// Positions in the round's standings (0 = fewest wins).
    pub first_rank: usize,
    pub second_rank: usize,
}

impl Matchup {
    pub fn rank_distance(&self) -> usize {
        self.second_rank - self.first_rank
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.first == team || self.second == team
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MatchmakingEngine {
    spread: usize,
}

impl MatchmakingEngine {
    pub fn new(spread: usize) -> Self {
        Self { spread }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.matchmaking_spread)
    }

    pub fn spread(&self) -> usize {
        self.spread
    }

    /// Team indices ordered by `(wins, id)` ascending.
    pub fn standings(teams: &[Team]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..teams.len()).collect();
        order.sort_by_key(|&i| (teams[i].wins(), teams[i].id()));
        order
    }

    /// Pairs every team for round `round`.
    pub fn pair_round<R: Rng + ?Sized>(
        &self,
        teams: &[Team],
        round: usize,
        rng: &mut R,
    ) -> Result<Vec<Matchup>> {
        let order = Self::standings(teams);
        let mut allocated: FxHashSet<TeamId> = FxHashSet::default();
        let mut matchups = Vec::with_capacity(teams.len() / 2);

        for (position, &idx) in order.iter().enumerate() {
            let team = teams[idx].id();
            if allocated.contains(&team) {
                continue;
            }

            let window_end = (position + 1 + self.spread).min(order.len());
            let viable: Vec<usize> = (position + 1..window_end)
                .filter(|&rank| !allocated.contains(&teams[order[rank]].id()))
                .collect();

            let Some(&partner_rank) = viable.choose(rng) else {
                return Err(SimError::MatchmakingExhausted { round, position, team });
            };
            let partner = teams[order[partner_rank]].id();

            allocated.insert(team);
            allocated.insert(partner);
            matchups.push(Matchup {
                first: team,
                second: partner,
                first_rank: position,
                second_rank: partner_rank,
            });
        }

        Ok(matchups)
    }

    /// Pairs the same standings `samples` times and counts rank distances.
    /// Entry `d - 1` holds the number of pairings `d` ranks apart.
    pub fn distance_histogram<R: Rng + ?Sized>(
        &self,
        teams: &[Team],
        samples: usize,
        rng: &mut R,
    ) -> Result<Vec<u64>> {
        let mut histogram = vec![0u64; self.spread];
        for sample in 0..samples {
            for matchup in self.pair_round(teams, sample, rng)? {
                histogram[matchup.rank_distance() - 1] += 1;
            }
        }
        Ok(histogram)
    }
}
