//! # league_core - Deterministic Baseball League Season Simulation Engine
//!
//! This library generates leagues of randomly skilled teams, plays full
//! seasons with a probabilistic at-bat model and repeats whole seasons many
//! times to measure how outcomes are distributed.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same season)
//! - Standings-based matchmaking with a bounded lookahead window
//! - Parallel Monte Carlo trials on a fixed-size worker pool
//! - Caller-supplied reducers turning each season into one summary record

// Simulation APIs pass configuration, teams and RNG together.
#![allow(clippy::too_many_arguments)]

pub mod at_bat;
pub mod config;
pub mod error;
pub mod game;
pub mod league;
pub mod matchmaking;
pub mod monte_carlo;
pub mod player;
pub mod reducers;
pub mod rng;
pub mod team;

pub use at_bat::AtBatModel;
pub use config::{AttributeRange, RosterConfig, SimConfig};
pub use error::{ConfigError, Result, SimError};
pub use game::{GameEngine, GameOutcome, SeriesResult};
pub use league::League;
pub use matchmaking::{MatchmakingEngine, Matchup};
pub use monte_carlo::{MonteCarloReport, MonteCarloRunner, SummaryRecord, TrialSummary};
pub use player::{Player, PlayerRecord, Role};
pub use team::{Team, TeamId, TeamRecord};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
