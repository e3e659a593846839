//! Players and their output records.
//!
//! Attributes are drawn once when a team is formed and never change; only
//! the at-bat and hit counters move during a season.

use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::AttributeRange;
use crate::team::TeamId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Pitcher,
    Batter,
}

#[derive(Debug, Clone)]
pub struct Player {
    team: TeamId,
    role: Role,
    /// Index within the team's list for this role.
    slot: usize,
    origin: AttributeRange,
    attributes: Vec<f64>,
    at_bats: u64,
    hits: u64,
}

impl Player {
    /// Draws `attribute_count` attributes uniformly from `range`.
    pub fn generate<R: Rng + ?Sized>(
        team: TeamId,
        role: Role,
        slot: usize,
        range: AttributeRange,
        attribute_count: usize,
        rng: &mut R,
    ) -> Self {
        let attributes = range.sample_vec(attribute_count, rng);
        Self::with_attributes(team, role, slot, range, attributes)
    }

    /// Player with fixed attributes, for fixtures and calibration.
    pub fn with_attributes(
        team: TeamId,
        role: Role,
        slot: usize,
        origin: AttributeRange,
        attributes: Vec<f64>,
    ) -> Self {
        Self { team, role, slot, origin, attributes, at_bats: 0, hits: 0 }
    }

    pub fn team(&self) -> TeamId {
        self.team
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_pitcher(&self) -> bool {
        self.role == Role::Pitcher
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn attributes(&self) -> &[f64] {
        &self.attributes
    }

    pub fn at_bats(&self) -> u64 {
        self.at_bats
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Dot product of attributes and `weights`. Not cached, not clamped.
    pub fn weighted_skill(&self, weights: &[f64]) -> f64 {
        self.attributes.iter().zip(weights).map(|(a, w)| a * w).sum()
    }

    /// Counts one plate appearance; a hit is always also an at-bat.
    pub(crate) fn record_at_bat(&mut self, hit: bool) {
        self.at_bats += 1;
        if hit {
            self.hits += 1;
        }
    }

    pub fn to_record(&self, weights: &[f64]) -> PlayerRecord {
        PlayerRecord {
            team_id: self.team,
            role: self.role,
            slot: self.slot,
            is_pitcher: self.is_pitcher(),
            range_midpoint: self.origin.midpoint(),
            attributes: self.attributes.clone(),
            weighted_skill: self.weighted_skill(weights),
            at_bats: self.at_bats,
            hits: self.hits,
        }
    }
}

/// Flat end-of-season view of one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerRecord {
    pub team_id: TeamId,
    pub role: Role,
    pub slot: usize,
    pub is_pitcher: bool,
    /// Midpoint of the range the attributes were drawn from.
    pub range_midpoint: f64,
    pub attributes: Vec<f64>,
    pub weighted_skill: f64,
    pub at_bats: u64,
    pub hits: u64,
}

impl PlayerRecord {
    /// Hits per at-bat, 0.0 for a player who never appeared.
    pub fn hit_rate(&self) -> f64 {
        if self.at_bats == 0 {
            0.0
        } else {
            self.hits as f64 / self.at_bats as f64
        }
    }
}
