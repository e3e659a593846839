//! Game simulation.
//!
//! A game is two nine-inning halves. Every hit scores one run, every miss is
//! an out, and an inning ends on the third out. There are no bases and no
//! extra innings: a tie after both halves is settled by a coin flip that
//! awards a single run.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::at_bat::AtBatModel;
use crate::config::SimConfig;
use crate::team::{Team, TeamId};

pub const INNINGS: u32 = 9;
pub const OUTS_PER_INNING: u32 = 3;

/// Final line of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub home: TeamId,
    pub away: TeamId,
    pub home_score: u32,
    pub away_score: u32,
    /// Set when the score was level after both halves and a coin flip
    /// awarded the deciding run.
    pub tie_broken: bool,
}

impl GameOutcome {
    pub fn home_won(&self) -> bool {
        self.home_score > self.away_score
    }

    pub fn winner(&self) -> TeamId {
        if self.home_won() {
            self.home
        } else {
            self.away
        }
    }

    pub fn loser(&self) -> TeamId {
        if self.home_won() {
            self.away
        } else {
            self.home
        }
    }
}

/// Aggregate of a fixed pairing played repeatedly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesResult {
    pub games: u32,
    pub first_wins: u32,
    pub second_wins: u32,
    pub first_runs: u64,
    pub second_runs: u64,
    pub tie_breaks: u32,
}

impl SeriesResult {
    pub fn first_win_fraction(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.first_wins as f64 / self.games as f64
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameEngine {
    model: AtBatModel,
}

impl GameEngine {
    pub fn new(model: AtBatModel) -> Self {
        Self { model }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(AtBatModel::from_config(config))
    }

    pub fn model(&self) -> &AtBatModel {
        &self.model
    }

    /// Nine innings of `hitting` against one `pitching` pitcher. The batting
    /// cursor keeps advancing across innings. Returns runs scored.
    pub fn play_half<R: Rng + ?Sized>(
        &self,
        hitting: &mut Team,
        pitching: &mut Team,
        pitcher_slot: usize,
        rng: &mut R,
    ) -> u32 {
        let mut score = 0;
        for _inning in 0..INNINGS {
            let mut outs = 0;
            while outs < OUTS_PER_INNING {
                let batter_slot = hitting.next_batter();
                let pitcher = pitching.pitcher_mut(pitcher_slot);
                if self.model.pitch(pitcher, hitting.batter_mut(batter_slot), rng) {
                    score += 1;
                } else {
                    outs += 1;
                }
            }
        }
        hitting.add_runs(score as u64);
        pitching.add_runs_surrendered(score as u64);
        score
    }

    /// Full game, home batting first. Updates both teams' season counters.
    pub fn play_game<R: Rng + ?Sized>(
        &self,
        home: &mut Team,
        away: &mut Team,
        rng: &mut R,
    ) -> GameOutcome {
        home.reset_batting_order();
        away.reset_batting_order();

        let away_pitcher = away.next_pitcher();
        let mut home_score = self.play_half(home, away, away_pitcher, rng);
        let home_pitcher = home.next_pitcher();
        let mut away_score = self.play_half(away, home, home_pitcher, rng);

        // The awarded run decides the game but is not a run scored in play.
        let tie_broken = home_score == away_score;
        if tie_broken {
            if rng.gen_bool(0.5) {
                home_score += 1;
            } else {
                away_score += 1;
            }
        }

        let outcome =
            GameOutcome { home: home.id(), away: away.id(), home_score, away_score, tie_broken };
        home.record_result(outcome.home_won());
        away.record_result(!outcome.home_won());
        outcome
    }

    /// Plays `games` games between the same two rosters, bypassing
    /// matchmaking. `first` is always the home side.
    pub fn play_series<R: Rng + ?Sized>(
        &self,
        first: &mut Team,
        second: &mut Team,
        games: u32,
        rng: &mut R,
    ) -> SeriesResult {
        let mut result = SeriesResult {
            games,
            first_wins: 0,
            second_wins: 0,
            first_runs: 0,
            second_runs: 0,
            tie_breaks: 0,
        };
        for _ in 0..games {
            let outcome = self.play_game(first, second, rng);
            if outcome.home_won() {
                result.first_wins += 1;
            } else {
                result.second_wins += 1;
            }
            result.first_runs += outcome.home_score as u64;
            result.second_runs += outcome.away_score as u64;
            if outcome.tie_broken {
                result.tie_breaks += 1;
            }
        }
        result
    }
}
