use thiserror::Error;

use crate::team::TeamId;

/// Rejected configuration. Raised before any simulation starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Field validation failed: {0}")]
    Fields(#[from] validator::ValidationErrors),

    #[error("Invalid {name} range: [{min}, {max})")]
    InvalidRange { name: &'static str, min: f64, max: f64 },

    #[error("League size must be even and at least 2, found {found}")]
    InvalidLeagueSize { found: usize },

    #[error("Matchmaking spread {spread} cannot cover a league of {league_size} teams")]
    SpreadTooLarge { spread: usize, league_size: usize },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Matchmaking exhausted in round {round}: team {team} at rank {position} has no opponent")]
    MatchmakingExhausted { round: usize, position: usize, team: TeamId },

    #[error("Worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SimError {
    /// Scheduling failures are a property of the league/window sizes, not a
    /// broken engine. Other trials with different seeds may still succeed.
    pub fn is_scheduling_failure(&self) -> bool {
        matches!(self, SimError::MatchmakingExhausted { .. })
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
