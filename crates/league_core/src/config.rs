//! # Simulation Configuration
//!
//! Every tunable of a run lives in one immutable [`SimConfig`] value that is
//! built once and handed by reference to each component and each trial.
//!
//! ## Usage
//! ```rust
//! use league_core::config::SimConfig;
//!
//! let config = SimConfig::default().with_league_size(20).with_rounds(30);
//! config.check().unwrap();
//! ```

use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ConfigError;

/// Half-open `[min, max)` range a player's attributes are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AttributeRange {
    pub min: f64,
    pub max: f64,
}

impl AttributeRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// One uniform draw from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen::<f64>() * self.width() + self.min
    }

    /// `count` independent draws, one per attribute.
    pub fn sample_vec<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<f64> {
        (0..count).map(|_| self.sample(rng)).collect()
    }

    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.max <= self.min {
            return Err(ConfigError::InvalidRange { name, min: self.min, max: self.max });
        }
        Ok(())
    }
}

impl Default for AttributeRange {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Roster shape. Elite slots come first in each role's rotation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(default)]
pub struct RosterConfig {
    pub elite_pitchers: usize,
    pub base_pitchers: usize,
    pub elite_batters: usize,
    pub base_batters: usize,
}

impl RosterConfig {
    pub fn pitcher_count(&self) -> usize {
        self.elite_pitchers + self.base_pitchers
    }

    pub fn batter_count(&self) -> usize {
        self.elite_batters + self.base_batters
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self { elite_pitchers: 1, base_pitchers: 4, elite_batters: 1, base_batters: 9 }
    }
}

/// Full parameter set for a league, a season and a Monte Carlo run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(default)]
pub struct SimConfig {
    // === Skill model ===
    /// Importance of each attribute; also fixes the attribute count.
    #[validate(length(min = 1))]
    pub stat_weights: Vec<f64>,
    /// Added to both weighted skills before taking their ratio (기본: 0.7)
    pub smoothing: f64,
    /// Hit probability when batter and pitcher are equally skilled (기본: 0.2)
    pub average_hit_rate: f64,

    // === Rosters ===
    #[validate]
    pub roster: RosterConfig,
    pub base_range: AttributeRange,
    pub elite_range: AttributeRange,

    // === League / season ===
    #[validate(range(min = 2))]
    pub league_size: usize,
    /// How many next-ranked teams are candidates when pairing a team.
    #[validate(range(min = 1))]
    pub matchmaking_spread: usize,
    /// Rounds per season; every team plays once per round.
    pub rounds: usize,

    // === Monte Carlo ===
    #[validate(range(min = 1))]
    pub trials: usize,
    #[validate(range(min = 1))]
    pub worker_pool_size: usize,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            stat_weights: vec![0.6, 0.3, 0.1, 0.0],
            smoothing: 0.7,
            average_hit_rate: 0.2,

            roster: RosterConfig::default(),
            base_range: AttributeRange::default(),
            elite_range: AttributeRange::default(),

            league_size: 100,
            matchmaking_spread: 6,
            rounds: 100,

            trials: 1000,
            worker_pool_size: 10,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Small league for tests and quick experiments.
    pub fn quick() -> Self {
        Self {
            league_size: 10,
            matchmaking_spread: 4,
            rounds: 12,
            trials: 8,
            worker_pool_size: 2,
            ..Self::default()
        }
    }

    pub fn with_league_size(mut self, league_size: usize) -> Self {
        self.league_size = league_size;
        self
    }

    pub fn with_spread(mut self, spread: usize) -> Self {
        self.matchmaking_spread = spread;
        self
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.worker_pool_size = workers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_ranges(mut self, base: AttributeRange, elite: AttributeRange) -> Self {
        self.base_range = base;
        self.elite_range = elite;
        self
    }

    pub fn attribute_count(&self) -> usize {
        self.stat_weights.len()
    }

    /// Highest hit rate any batter/pitcher pairing can reach with these
    /// ranges. At 1.0 or above an inning may never record its third out.
    pub fn worst_case_hit_rate(&self) -> f64 {
        let lo = self.base_range.min.min(self.elite_range.min);
        let hi = self.base_range.max.max(self.elite_range.max);
        let (mut best, mut worst) = (0.0, 0.0);
        for w in &self.stat_weights {
            if *w >= 0.0 {
                best += w * hi;
                worst += w * lo;
            } else {
                best += w * lo;
                worst += w * hi;
            }
        }
        let denom = worst + self.smoothing;
        if denom <= 0.0 {
            return f64::INFINITY;
        }
        (best + self.smoothing) / denom * self.average_hit_rate
    }

    /// Field bounds plus the cross-field rules the derive cannot express.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;

        if self.stat_weights.iter().any(|w| !w.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "stat_weights",
                reason: "weights must be finite".to_string(),
            });
        }
        if !self.smoothing.is_finite() || self.smoothing <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "smoothing",
                reason: format!("must be finite and positive, found {}", self.smoothing),
            });
        }
        if !self.average_hit_rate.is_finite() || self.average_hit_rate < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "average_hit_rate",
                reason: format!("must be finite and non-negative, found {}", self.average_hit_rate),
            });
        }

        self.base_range.check("base")?;
        self.elite_range.check("elite")?;

        if self.roster.pitcher_count() == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "roster",
                reason: "a team needs at least one pitcher".to_string(),
            });
        }
        if self.roster.batter_count() == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "roster",
                reason: "a team needs at least one batter".to_string(),
            });
        }

        if self.league_size < 2 || self.league_size % 2 != 0 {
            return Err(ConfigError::InvalidLeagueSize { found: self.league_size });
        }
        if self.matchmaking_spread >= self.league_size {
            return Err(ConfigError::SpreadTooLarge {
                spread: self.matchmaking_spread,
                league_size: self.league_size,
            });
        }

        Ok(())
    }

    /// JSON schema for front ends that build configurations.
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(SimConfig)
    }
}

// ========== Tests ==========
