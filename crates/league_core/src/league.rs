//! League and season scheduling.
//!
//! A [`League`] lives for exactly one season. Rounds run strictly in order
//! because each round's pairings depend on the standings the previous round
//! produced.

use fxhash::FxHashMap;
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::config::SimConfig;
use crate::error::{ConfigError, Result};
use crate::game::{GameEngine, GameOutcome};
use crate::matchmaking::{MatchmakingEngine, Matchup};
use crate::player::PlayerRecord;
use crate::team::{Team, TeamId, TeamRecord};

#[derive(Debug)]
pub struct League {
    teams: Vec<Team>,
    /// TeamId → position in `teams`.
    index: FxHashMap<TeamId, usize>,
    engine: GameEngine,
    matchmaker: MatchmakingEngine,
    rounds: usize,
    rounds_played: usize,
}

impl League {
    /// Fresh league of `config.league_size` random teams with ids `1..=N`.
    pub fn new<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Result<Self> {
        let teams = (1..=config.league_size as u32)
            .map(|id| Team::generate(TeamId(id), config, rng))
            .collect();
        Self::from_teams(teams, config)
    }

    /// League over prebuilt teams. Identities must be unique and every
    /// player must carry one attribute per configured weight.
    pub fn from_teams(teams: Vec<Team>, config: &SimConfig) -> Result<Self> {
        config.check()?;

        let attribute_count = config.attribute_count();
        let mut index = FxHashMap::default();
        for (i, team) in teams.iter().enumerate() {
            if index.insert(team.id(), i).is_some() {
                return Err(ConfigError::InvalidParameter {
                    name: "teams",
                    reason: format!("duplicate team identity {}", team.id()),
                }
                .into());
            }
            if let Some(player) = team.players().find(|p| p.attributes().len() != attribute_count) {
                return Err(ConfigError::InvalidParameter {
                    name: "teams",
                    reason: format!(
                        "team {} has a player with {} attributes, expected {}",
                        team.id(),
                        player.attributes().len(),
                        attribute_count
                    ),
                }
                .into());
            }
        }

        let worst = config.worst_case_hit_rate();
        if worst >= 1.0 {
            warn!(worst, "some pairings hit on every at-bat; their games will not terminate");
        }

        Ok(Self {
            teams,
            index,
            engine: GameEngine::from_config(config),
            matchmaker: MatchmakingEngine::from_config(config),
            rounds: config.rounds,
            rounds_played: 0,
        })
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.index.get(&id).map(|&i| &self.teams[i])
    }

    pub fn rounds_played(&self) -> usize {
        self.rounds_played
    }

    /// Pairs the league and plays one game per matchup. Home side is a coin
    /// flip per matchup.
    pub fn play_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<GameOutcome>> {
        let matchups: Vec<Matchup> =
            self.matchmaker.pair_round(&self.teams, self.rounds_played, rng)?;

        let mut outcomes = Vec::with_capacity(matchups.len());
        for matchup in &matchups {
            let (home, away) = if rng.gen_bool(0.5) {
                (matchup.first, matchup.second)
            } else {
                (matchup.second, matchup.first)
            };
            let (home, away) = pair_mut(&mut self.teams, &self.index, home, away);
            outcomes.push(self.engine.play_game(home, away, rng));
        }

        self.rounds_played += 1;
        Ok(outcomes)
    }

    /// Plays every remaining round. A matchmaking failure ends the season.
    pub fn run_season<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        while self.rounds_played < self.rounds {
            let outcomes = self.play_round(rng)?;
            debug!(round = self.rounds_played, games = outcomes.len(), "round complete");
        }
        debug!(rounds = self.rounds_played, teams = self.teams.len(), "season complete");
        Ok(())
    }

    pub fn team_records(&self) -> Vec<TeamRecord> {
        let weights = self.engine.model().weights();
        self.teams.iter().map(|t| t.to_record(weights)).collect()
    }

    pub fn player_records(&self) -> Vec<PlayerRecord> {
        let weights = self.engine.model().weights();
        self.teams.iter().flat_map(|t| t.players()).map(|p| p.to_record(weights)).collect()
    }

    pub fn to_records(&self) -> (Vec<TeamRecord>, Vec<PlayerRecord>) {
        (self.team_records(), self.player_records())
    }

    /// SHA-256 over every team and player counter, as lowercase hex.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for team in &self.teams {
            hasher.update(team.id().0.to_le_bytes());
            hasher.update(team.games().to_le_bytes());
            hasher.update(team.wins().to_le_bytes());
            hasher.update(team.runs().to_le_bytes());
            hasher.update(team.runs_surrendered().to_le_bytes());
            for player in team.players() {
                hasher.update(player.at_bats().to_le_bytes());
                hasher.update(player.hits().to_le_bytes());
            }
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Both teams of a matchup, mutably. Panics only if the matchup names a team
/// outside the league, which `pair_round` never produces.
fn pair_mut<'a>(
    teams: &'a mut [Team],
    index: &FxHashMap<TeamId, usize>,
    a: TeamId,
    b: TeamId,
) -> (&'a mut Team, &'a mut Team) {
    let (i, j) = (index[&a], index[&b]);
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = teams.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = teams.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}
