//! Ready-made trial reducers for [`MonteCarloRunner::run`].
//!
//! [`MonteCarloRunner::run`]: crate::monte_carlo::MonteCarloRunner::run

use serde_json::json;

use crate::monte_carlo::SummaryRecord;
use crate::player::PlayerRecord;
use crate::team::TeamRecord;

/// Bill James' Pythagorean expectation with exponent 2.
///
/// A team that scored nothing expects no wins; a team that neither scored
/// nor allowed a run expects to split its games.
pub fn pythagorean_wins(games: u32, runs: u64, runs_surrendered: u64) -> f64 {
    match (runs, runs_surrendered) {
        (0, 0) => games as f64 / 2.0,
        (0, _) => 0.0,
        (r, a) => {
            let ratio = a as f64 / r as f64;
            games as f64 / (1.0 + ratio * ratio)
        }
    }
}

/// Wins above Pythagorean expectation. Positive means the record flatters
/// the team.
pub fn fraudulent_wins(team: &TeamRecord) -> f64 {
    team.wins as f64 - pythagorean_wins(team.games, team.runs, team.runs_surrendered)
}

/// The team whose record most overstates its run differential.
pub fn biggest_fraud(teams: &[TeamRecord], _players: &[PlayerRecord]) -> SummaryRecord {
    let mut out = SummaryRecord::new();
    // max_by keeps the last of equal maxima, like taking the tail of a sort.
    let fraud = teams.iter().max_by(|a, b| fraudulent_wins(a).total_cmp(&fraudulent_wins(b)));
    let Some(fraud) = fraud else {
        return out;
    };

    out.insert("team_id".into(), json!(fraud.team_id));
    out.insert("games".into(), json!(fraud.games));
    out.insert("wins".into(), json!(fraud.wins));
    out.insert("runs".into(), json!(fraud.runs));
    out.insert("runs_surrendered".into(), json!(fraud.runs_surrendered));
    out.insert(
        "pythagorean_wins".into(),
        json!(pythagorean_wins(fraud.games, fraud.runs, fraud.runs_surrendered)),
    );
    out.insert("fraudulent_wins".into(), json!(fraudulent_wins(fraud)));
    out
}

/// League-wide spread of outcomes for one season.
pub fn league_summary(teams: &[TeamRecord], players: &[PlayerRecord]) -> SummaryRecord {
    let mut out = SummaryRecord::new();
    if teams.is_empty() {
        return out;
    }

    let n = teams.len() as f64;
    let wins: Vec<f64> = teams.iter().map(|t| t.wins as f64).collect();
    let mean_wins = wins.iter().sum::<f64>() / n;
    let variance = wins.iter().map(|w| (w - mean_wins).powi(2)).sum::<f64>() / n;

    let max_wins = teams.iter().map(|t| t.wins).max().unwrap_or(0);
    let min_wins = teams.iter().map(|t| t.wins).min().unwrap_or(0);
    let best_differential = teams.iter().map(|t| t.run_differential()).max().unwrap_or(0);
    let worst_differential = teams.iter().map(|t| t.run_differential()).min().unwrap_or(0);
    let total_runs: u64 = teams.iter().map(|t| t.runs).sum();

    let (at_bats, hits) = players
        .iter()
        .filter(|p| !p.is_pitcher)
        .fold((0u64, 0u64), |(ab, h), p| (ab + p.at_bats, h + p.hits));
    let batting_average = if at_bats == 0 { 0.0 } else { hits as f64 / at_bats as f64 };

    out.insert("teams".into(), json!(teams.len()));
    out.insert("mean_wins".into(), json!(mean_wins));
    out.insert("wins_std_dev".into(), json!(variance.sqrt()));
    out.insert("max_wins".into(), json!(max_wins));
    out.insert("min_wins".into(), json!(min_wins));
    out.insert("best_run_differential".into(), json!(best_differential));
    out.insert("worst_run_differential".into(), json!(worst_differential));
    out.insert("total_runs".into(), json!(total_runs));
    out.insert("batting_average".into(), json!(batting_average));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AttributeRange;
    use crate::team::TeamId;

    fn record(id: u32, games: u32, wins: u32, runs: u64, allowed: u64) -> TeamRecord {
        TeamRecord {
            team_id: TeamId(id),
            base_range: AttributeRange::default(),
            elite_range: AttributeRange::default(),
            games,
            wins,
            runs,
            runs_surrendered: allowed,
            roster: Vec::new(),
        }
    }

    #[test]
    fn test_pythagorean_even_split() {
        assert!((pythagorean_wins(100, 500, 500) - 50.0).abs() < 1e-12);
        assert!((pythagorean_wins(10, 0, 0) - 5.0).abs() < 1e-12);
        assert_eq!(pythagorean_wins(10, 0, 4), 0.0);
    }

    #[test]
    fn test_pythagorean_favours_run_scorers() {
        // 100 / (1 + (300/600)^2) = 80
        assert!((pythagorean_wins(100, 600, 300) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_biggest_fraud_picks_overachiever() {
        let teams = vec![
            record(1, 100, 50, 500, 500),
            record(2, 100, 70, 500, 500),
            record(3, 100, 80, 600, 300),
        ];
        let out = biggest_fraud(&teams, &[]);
        assert_eq!(out["team_id"], json!(2));
        assert!((out["fraudulent_wins"].as_f64().unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_biggest_fraud_empty_league() {
        assert!(biggest_fraud(&[], &[]).is_empty());
    }

    #[test]
    fn test_league_summary_fields() {
        let teams = vec![record(1, 10, 7, 60, 40), record(2, 10, 3, 40, 60)];
        let out = league_summary(&teams, &[]);
        assert_eq!(out["teams"], json!(2));
        assert_eq!(out["max_wins"], json!(7));
        assert_eq!(out["min_wins"], json!(3));
        assert_eq!(out["best_run_differential"], json!(20));
        assert_eq!(out["worst_run_differential"], json!(-20));
        assert!((out["mean_wins"].as_f64().unwrap() - 5.0).abs() < 1e-12);
        assert!((out["wins_std_dev"].as_f64().unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(out["batting_average"], json!(0.0));
    }
}
