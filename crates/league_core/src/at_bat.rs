//! At-bat probability model.
//!
//! All rate functions are pure; only [`AtBatModel::pitch`] touches player
//! counters and the random source.

use rand::Rng;

use crate::config::SimConfig;
use crate::player::Player;

#[derive(Debug, Clone)]
pub struct AtBatModel {
    weights: Vec<f64>,
    smoothing: f64,
    average_hit_rate: f64,
}

impl AtBatModel {
    pub fn new(weights: Vec<f64>, smoothing: f64, average_hit_rate: f64) -> Self {
        Self { weights, smoothing, average_hit_rate }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.stat_weights.clone(), config.smoothing, config.average_hit_rate)
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Hit probability from two weighted skills.
    ///
    /// Not clamped to `[0, 1]`: a rate above 1 always hits and a rate below
    /// 0 never does.
    #[inline]
    pub fn rate_for_skills(&self, pitcher_skill: f64, batter_skill: f64) -> f64 {
        (batter_skill + self.smoothing) / (pitcher_skill + self.smoothing) * self.average_hit_rate
    }

    pub fn relative_rate(&self, pitcher: &Player, batter: &Player) -> f64 {
        self.rate_for_skills(
            pitcher.weighted_skill(&self.weights),
            batter.weighted_skill(&self.weights),
        )
    }

    /// Resolves one at-bat. Both players log the at-bat; on a hit both log
    /// the hit. Returns `true` for a hit.
    pub fn pitch<R: Rng + ?Sized>(
        &self,
        pitcher: &mut Player,
        batter: &mut Player,
        rng: &mut R,
    ) -> bool {
        let rate = self.relative_rate(pitcher, batter);
        let is_hit = rng.gen::<f64>() < rate;
        pitcher.record_at_bat(is_hit);
        batter.record_at_bat(is_hit);
        is_hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AttributeRange;
    use crate::player::Role;
    use crate::rng::seeded;
    use crate::team::TeamId;

    fn player(role: Role, skill: f64) -> Player {
        Player::with_attributes(TeamId(1), role, 0, AttributeRange::default(), vec![skill; 4])
    }

    fn model() -> AtBatModel {
        AtBatModel::from_config(&SimConfig::default())
    }

    #[test]
    fn test_equal_skill_gives_average_rate() {
        let m = model();
        let rate = m.relative_rate(&player(Role::Pitcher, 0.4), &player(Role::Batter, 0.4));
        assert!((rate - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_best_batter_vs_weak_pitcher() {
        // (1.0 + 0.7) / (0.1 + 0.7) * 0.2
        let m = model();
        let rate = m.rate_for_skills(0.1, 1.0);
        assert!((rate - 0.425).abs() < 1e-12);
    }

    #[test]
    fn test_pitch_counts_both_sides() {
        let m = model();
        let mut rng = seeded(5);
        let mut pitcher = player(Role::Pitcher, 0.5);
        let mut batter = player(Role::Batter, 0.5);
        let mut hits = 0;
        for _ in 0..500 {
            if m.pitch(&mut pitcher, &mut batter, &mut rng) {
                hits += 1;
            }
        }
        assert_eq!(pitcher.at_bats(), 500);
        assert_eq!(batter.at_bats(), 500);
        assert_eq!(pitcher.hits(), hits);
        assert_eq!(batter.hits(), hits);
        assert!(hits > 50 && hits < 150, "hits {} far from 20%", hits);
    }

    #[test]
    fn test_rate_above_one_always_hits() {
        let m = AtBatModel::new(vec![1.0; 4], 0.7, 5.0);
        let mut rng = seeded(1);
        let mut pitcher = player(Role::Pitcher, 0.5);
        let mut batter = player(Role::Batter, 0.5);
        assert!((0..200).all(|_| m.pitch(&mut pitcher, &mut batter, &mut rng)));
        assert_eq!(batter.hits(), 200);
    }

    #[test]
    fn test_negative_rate_never_hits() {
        let m = AtBatModel::new(vec![1.0; 4], 0.7, -0.5);
        let mut rng = seeded(2);
        let mut pitcher = player(Role::Pitcher, 0.5);
        let mut batter = player(Role::Batter, 0.5);
        assert!((0..200).all(|_| !m.pitch(&mut pitcher, &mut batter, &mut rng)));
        assert_eq!(pitcher.at_bats(), 200);
        assert_eq!(pitcher.hits(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: better batters hit more often
            #[test]
            fn prop_rate_increases_with_batter_skill(
                pitcher in 0.0f64..2.0,
                low in 0.0f64..2.0,
                bump in 0.001f64..1.0,
            ) {
                let m = model();
                let better = m.rate_for_skills(pitcher, low + bump);
                prop_assert!(better > m.rate_for_skills(pitcher, low));
            }

            /// Property: better pitchers allow fewer hits
            #[test]
            fn prop_rate_decreases_with_pitcher_skill(
                batter in 0.0f64..2.0,
                low in 0.0f64..2.0,
                bump in 0.001f64..1.0,
            ) {
                let m = model();
                let tougher = m.rate_for_skills(low + bump, batter);
                prop_assert!(tougher < m.rate_for_skills(low, batter));
            }

            /// Property: hits never exceed at-bats
            #[test]
            fn prop_hits_bounded_by_at_bats(seed in any::<u64>(), rounds in 1usize..200) {
                let m = model();
                let mut rng = seeded(seed);
                let mut pitcher = player(Role::Pitcher, 0.3);
                let mut batter = player(Role::Batter, 0.9);
                for _ in 0..rounds {
                    m.pitch(&mut pitcher, &mut batter, &mut rng);
                    prop_assert!(batter.hits() <= batter.at_bats());
                    prop_assert!(pitcher.hits() <= pitcher.at_bats());
                }
            }
        }
    }
}
