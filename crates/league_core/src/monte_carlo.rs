//! # Monte Carlo Runner
//!
//! Runs many independent seasons and reduces each one to a summary record
//! through a caller-supplied function.
//!
//! ## Execution model
//! - Trials run on a dedicated rayon pool of `worker_pool_size` threads.
//! - Each trial builds its own League from its own seeded RNG, so trials
//!   share nothing mutable and the result of trial `t` depends only on
//!   `(config, t)`.
//! - There is no cancellation: a trial that never finishes keeps its worker.
//!
//! ## Usage
//! ```rust
//! use league_core::{MonteCarloRunner, SimConfig};
//! use league_core::reducers::league_summary;
//!
//! let config = SimConfig::quick().with_trials(4).with_seed(7);
//! let runner = MonteCarloRunner::new(config).unwrap().mute(true);
//! let report = runner.run(league_summary).unwrap();
//! assert_eq!(report.summaries.len(), 4);
//! ```

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::error::Result;
use crate::league::League;
use crate::player::PlayerRecord;
use crate::rng::{derive_trial_seed, seeded};
use crate::team::TeamRecord;

/// Open set of named result fields produced by a reducer.
pub type SummaryRecord = Map<String, Value>;

/// Trials above this count trigger a run-time warning.
const LONG_RUN_TRIALS: usize = 100;
/// Progress is logged every this many completed trials.
const PROGRESS_EVERY: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub trial: usize,
    pub seed: u64,
    pub fields: SummaryRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloReport {
    pub base_seed: u64,
    pub trials: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Ordered by trial index.
    pub summaries: Vec<TrialSummary>,
}

impl MonteCarloReport {
    /// Numeric values of one field across all trials. Trials where the field
    /// is missing or not a number are skipped.
    pub fn column(&self, name: &str) -> Vec<f64> {
        self.summaries
            .iter()
            .filter_map(|s| s.fields.get(name).and_then(Value::as_f64))
            .collect()
    }

    pub fn mean(&self, name: &str) -> Option<f64> {
        let values = self.column(name);
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub struct MonteCarloRunner {
    config: SimConfig,
    mute: bool,
}

impl MonteCarloRunner {
    /// Validates the configuration once, before any trial starts.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.check()?;
        Ok(Self { config, mute: false })
    }

    /// Suppresses progress logging.
    pub fn mute(mut self, mute: bool) -> Self {
        self.mute = mute;
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// One complete season for trial `trial`, reduced by `reducer`.
    pub fn run_trial<F>(&self, trial: usize, reducer: &F) -> Result<TrialSummary>
    where
        F: Fn(&[TeamRecord], &[PlayerRecord]) -> SummaryRecord,
    {
        let seed = derive_trial_seed(self.config.seed, trial);
        let mut rng = seeded(seed);
        let mut league = League::new(&self.config, &mut rng)?;
        league.run_season(&mut rng)?;

        let (teams, players) = league.to_records();
        Ok(TrialSummary { trial, seed, fields: reducer(&teams, &players) })
    }

    /// All trials across the worker pool. The first failing trial aborts
    /// the run and its error is returned.
    pub fn run<F>(&self, reducer: F) -> Result<MonteCarloReport>
    where
        F: Fn(&[TeamRecord], &[PlayerRecord]) -> SummaryRecord + Sync,
    {
        let trials = self.config.trials;
        if trials > LONG_RUN_TRIALS && !self.mute {
            warn!(trials, "each trial simulates an entire season; this run may take some time");
        }

        let started_at = Utc::now();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_pool_size)
            .thread_name(|i| format!("league-trial-{i}"))
            .build()?;
        info!(
            trials,
            workers = self.config.worker_pool_size,
            seed = self.config.seed,
            "starting run"
        );

        let completed = AtomicUsize::new(0);
        let summaries = pool.install(|| {
            (0..trials)
                .into_par_iter()
                .map(|trial| {
                    let summary = self.run_trial(trial, &reducer);
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if !self.mute && done % PROGRESS_EVERY == 0 {
                        info!(done, trials, "trials completed");
                    }
                    if let Err(e) = &summary {
                        debug!(trial, error = %e, "trial failed");
                    }
                    summary
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let finished_at = Utc::now();
        if !self.mute {
            let elapsed = finished_at - started_at;
            info!(trials, elapsed_ms = elapsed.num_milliseconds(), "run finished");
        }

        Ok(MonteCarloReport {
            base_seed: self.config.seed,
            trials,
            started_at,
            finished_at,
            summaries,
        })
    }
}
