//! Teams: roster ownership, rotation cursors and season counters.

use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::config::{AttributeRange, RosterConfig, SimConfig};
use crate::player::{Player, PlayerRecord, Role};

/// League-unique team identity. Used for lookups and allocation sets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Team {
    id: TeamId,
    base_range: AttributeRange,
    elite_range: AttributeRange,
    pitchers: Vec<Player>,
    batters: Vec<Player>,
    pitching_order: usize,
    batting_order: usize,
    games: u32,
    wins: u32,
    runs: u64,
    runs_surrendered: u64,
}

impl Team {
    /// Builds a team with the configured roster shape and ranges.
    pub fn generate<R: Rng + ?Sized>(id: TeamId, config: &SimConfig, rng: &mut R) -> Self {
        Self::generate_with_ranges(
            id,
            &config.roster,
            config.base_range,
            config.elite_range,
            config.attribute_count(),
            rng,
        )
    }

    /// Elite slots are drawn first so they sit at the head of each list.
    pub fn generate_with_ranges<R: Rng + ?Sized>(
        id: TeamId,
        roster: &RosterConfig,
        base_range: AttributeRange,
        elite_range: AttributeRange,
        attribute_count: usize,
        rng: &mut R,
    ) -> Self {
        let draw = |role: Role, elite: usize, base: usize, rng: &mut R| -> Vec<Player> {
            (0..elite + base)
                .map(|slot| {
                    let range = if slot < elite { elite_range } else { base_range };
                    Player::generate(id, role, slot, range, attribute_count, rng)
                })
                .collect()
        };
        let pitchers = draw(Role::Pitcher, roster.elite_pitchers, roster.base_pitchers, rng);
        let batters = draw(Role::Batter, roster.elite_batters, roster.base_batters, rng);

        Self {
            id,
            base_range,
            elite_range,
            pitchers,
            batters,
            pitching_order: 0,
            batting_order: 0,
            games: 0,
            wins: 0,
            runs: 0,
            runs_surrendered: 0,
        }
    }

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn pitchers(&self) -> &[Player] {
        &self.pitchers
    }

    pub fn batters(&self) -> &[Player] {
        &self.batters
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.pitchers.iter().chain(self.batters.iter())
    }

    pub fn pitching_order(&self) -> usize {
        self.pitching_order
    }

    pub fn batting_order(&self) -> usize {
        self.batting_order
    }

    pub fn games(&self) -> u32 {
        self.games
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn runs_surrendered(&self) -> u64 {
        self.runs_surrendered
    }

    /// Advances the pitching cursor and returns the slot it lands on.
    pub fn next_pitcher(&mut self) -> usize {
        self.pitching_order = (self.pitching_order + 1) % self.pitchers.len();
        self.pitching_order
    }

    /// Advances the batting cursor and returns the slot it lands on.
    pub fn next_batter(&mut self) -> usize {
        self.batting_order = (self.batting_order + 1) % self.batters.len();
        self.batting_order
    }

    pub fn reset_batting_order(&mut self) {
        self.batting_order = 0;
    }

    pub(crate) fn pitcher_mut(&mut self, slot: usize) -> &mut Player {
        &mut self.pitchers[slot]
    }

    pub(crate) fn batter_mut(&mut self, slot: usize) -> &mut Player {
        &mut self.batters[slot]
    }

    pub(crate) fn add_runs(&mut self, scored: u64) {
        self.runs += scored;
    }

    pub(crate) fn add_runs_surrendered(&mut self, allowed: u64) {
        self.runs_surrendered += allowed;
    }

    pub(crate) fn record_result(&mut self, won: bool) {
        self.games += 1;
        if won {
            self.wins += 1;
        }
    }

    pub fn to_record(&self, weights: &[f64]) -> TeamRecord {
        TeamRecord {
            team_id: self.id,
            base_range: self.base_range,
            elite_range: self.elite_range,
            games: self.games,
            wins: self.wins,
            runs: self.runs,
            runs_surrendered: self.runs_surrendered,
            roster: self.players().map(|p| p.to_record(weights)).collect(),
        }
    }
}

/// End-of-season view of one team, including its roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TeamRecord {
    pub team_id: TeamId,
    pub base_range: AttributeRange,
    pub elite_range: AttributeRange,
    pub games: u32,
    pub wins: u32,
    pub runs: u64,
    pub runs_surrendered: u64,
    pub roster: Vec<PlayerRecord>,
}

impl TeamRecord {
    pub fn run_differential(&self) -> i64 {
        self.runs as i64 - self.runs_surrendered as i64
    }

    pub fn losses(&self) -> u32 {
        self.games.saturating_sub(self.wins)
    }

    /// One flat row: team columns followed by per-slot player columns
    /// (`pitcher_0_attr_1`, `batter_3_hits`, ...).
    pub fn to_row(&self) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("team_id".into(), self.team_id.0.into());
        row.insert("base_min".into(), self.base_range.min.into());
        row.insert("base_max".into(), self.base_range.max.into());
        row.insert("elite_min".into(), self.elite_range.min.into());
        row.insert("elite_max".into(), self.elite_range.max.into());
        row.insert("games".into(), self.games.into());
        row.insert("wins".into(), self.wins.into());
        row.insert("runs".into(), self.runs.into());
        row.insert("runs_surrendered".into(), self.runs_surrendered.into());

        for player in &self.roster {
            let prefix = match player.role {
                Role::Pitcher => format!("pitcher_{}", player.slot),
                Role::Batter => format!("batter_{}", player.slot),
            };
            for (i, attr) in player.attributes.iter().enumerate() {
                row.insert(format!("{prefix}_attr_{i}"), (*attr).into());
            }
            row.insert(format!("{prefix}_range_midpoint"), player.range_midpoint.into());
            row.insert(format!("{prefix}_weighted"), player.weighted_skill.into());
            row.insert(format!("{prefix}_at_bats"), player.at_bats.into());
            row.insert(format!("{prefix}_hits"), player.hits.into());
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    fn team(id: u32) -> Team {
        Team::generate(TeamId(id), &SimConfig::default(), &mut seeded(id as u64))
    }

    #[test]
    fn test_roster_shape_follows_config() {
        let t = team(1);
        assert_eq!(t.pitchers().len(), 5);
        assert_eq!(t.batters().len(), 10);
        assert!(t.pitchers().iter().all(|p| p.is_pitcher() && p.team() == TeamId(1)));
        assert!(t.batters().iter().all(|p| !p.is_pitcher()));
        assert_eq!(t.players().count(), 15);
    }

    #[test]
    fn test_elite_slots_use_elite_range() {
        let roster = RosterConfig::default();
        let t = Team::generate_with_ranges(
            TeamId(2),
            &roster,
            AttributeRange::new(0.0, 0.1),
            AttributeRange::new(5.0, 6.0),
            4,
            &mut seeded(3),
        );
        assert!(t.pitchers()[0].attributes().iter().all(|a| *a >= 5.0));
        assert!(t.batters()[0].attributes().iter().all(|a| *a >= 5.0));
        assert!(t.pitchers()[1..].iter().flat_map(|p| p.attributes()).all(|a| *a < 0.1));
        assert!(t.batters()[1..].iter().flat_map(|p| p.attributes()).all(|a| *a < 0.1));
    }

    #[test]
    fn test_cursors_wrap_around() {
        let mut t = team(4);
        let picks: Vec<usize> = (0..6).map(|_| t.next_pitcher()).collect();
        assert_eq!(picks, vec![1, 2, 3, 4, 0, 1]);

        let batters: Vec<usize> = (0..11).map(|_| t.next_batter()).collect();
        assert_eq!(batters[8], 9);
        assert_eq!(batters[9], 0);
        assert_eq!(batters[10], 1);

        t.reset_batting_order();
        assert_eq!(t.batting_order(), 0);
        assert_eq!(t.pitching_order(), 1);
    }

    #[test]
    fn test_single_player_rotation_stays_put() {
        let roster =
            RosterConfig { elite_pitchers: 1, base_pitchers: 0, elite_batters: 0, base_batters: 1 };
        let mut t = Team::generate_with_ranges(
            TeamId(9),
            &roster,
            AttributeRange::default(),
            AttributeRange::default(),
            4,
            &mut seeded(1),
        );
        for _ in 0..5 {
            assert_eq!(t.next_pitcher(), 0);
            assert_eq!(t.next_batter(), 0);
        }
    }

    #[test]
    fn test_record_and_row() {
        let mut t = team(5);
        t.add_runs(7);
        t.add_runs_surrendered(3);
        t.record_result(true);
        t.record_result(false);

        let record = t.to_record(&SimConfig::default().stat_weights);
        assert_eq!(record.games, 2);
        assert_eq!(record.wins, 1);
        assert_eq!(record.losses(), 1);
        assert_eq!(record.run_differential(), 4);
        assert_eq!(record.roster.len(), 15);

        let row = record.to_row();
        assert_eq!(row["team_id"], 5);
        assert_eq!(row["runs"], 7);
        assert!(row.contains_key("pitcher_4_attr_3"));
        assert!(row.contains_key("batter_9_hits"));
        assert!(!row.contains_key("batter_10_hits"));
        assert_eq!(row["pitcher_0_range_midpoint"], 0.5);
        assert_eq!(row["batter_9_range_midpoint"], 0.5);
    }

    #[test]
    fn test_losses_saturate_on_malformed_record() {
        let mut record = team(6).to_record(&SimConfig::default().stat_weights);
        record.games = 2;
        record.wins = 5;
        assert_eq!(record.losses(), 0);
    }

    #[test]
    fn test_team_id_display() {
        assert_eq!(TeamId(12).to_string(), "#12");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: cursors always point at an existing roster slot
            #[test]
            fn prop_cursors_stay_in_roster(
                pitchers in 1usize..8,
                batters in 1usize..14,
                advances in 0usize..64,
            ) {
                let roster = RosterConfig {
                    elite_pitchers: 0,
                    base_pitchers: pitchers,
                    elite_batters: 0,
                    base_batters: batters,
                };
                let mut t = Team::generate_with_ranges(
                    TeamId(1),
                    &roster,
                    AttributeRange::default(),
                    AttributeRange::default(),
                    2,
                    &mut seeded(advances as u64),
                );
                for _ in 0..advances {
                    prop_assert!(t.next_pitcher() < pitchers);
                    prop_assert!(t.next_batter() < batters);
                }
                prop_assert_eq!(t.pitching_order(), advances % pitchers);
                prop_assert_eq!(t.batting_order(), advances % batters);
            }
        }
    }
}
