//! Repeated trials and their aggregation.

use super::ParameterSet;
use crate::error::{ConfigError, Result};
use crate::fitness::Objective;
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::debug;

/// How each parameter set is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialConfig {
    /// Independent runs per parameter set.
    pub repetitions: usize,

    /// Base seed for per-trial seeds. `None` draws one per experiment.
    pub seed: Option<u64>,

    /// Run the repetitions of a parameter set on the rayon pool.
    ///
    /// Each trial's duration is wall-clock time measured while the other
    /// repetitions share the pool, so timings are only comparable between
    /// runs made with the same setting. Turn this off for isolated
    /// per-trial timings.
    pub parallel_trials: bool,

    /// Evaluate individuals/particles of a generation on the rayon pool.
    pub parallel_evaluation: bool,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            repetitions: 30,
            seed: None,
            parallel_trials: true,
            parallel_evaluation: false,
        }
    }
}

impl TrialConfig {
    pub fn with_repetitions(mut self, n: usize) -> Self {
        self.repetitions = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel_trials(mut self, parallel: bool) -> Self {
        self.parallel_trials = parallel;
        self
    }

    pub fn with_parallel_evaluation(mut self, parallel: bool) -> Self {
        self.parallel_evaluation = parallel;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.repetitions < 1 {
            return Err(ConfigError::TooSmall {
                field: "repetitions",
                min: 1,
                value: self.repetitions,
            });
        }
        Ok(())
    }
}

/// Outcome of one engine run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialResult {
    /// Seed the run's generator was built from.
    pub seed: u64,
    pub best_fitness: f64,
    pub duration: Duration,
}

/// Mean best fitness and mean duration of the trials of one parameter set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregateResult<P> {
    pub params: P,
    pub mean_fitness: f64,
    pub mean_duration: Duration,
    /// Best (lowest) best-fitness over the trials.
    pub min_fitness: f64,
    /// Worst (highest) best-fitness over the trials.
    pub max_fitness: f64,
    /// Individual trials in repetition order.
    pub trials: Vec<TrialResult>,
}

impl<P> AggregateResult<P> {
    /// Mean duration in milliseconds.
    pub fn mean_millis(&self) -> f64 {
        self.mean_duration.as_secs_f64() * 1000.0
    }
}

/// Reduces trials to their means. Returns `None` for an empty trial list.
///
/// The result does not depend on trial order: fitness values are summed in
/// sorted order and durations are summed as integers.
pub fn aggregate<P>(params: P, trials: Vec<TrialResult>) -> Option<AggregateResult<P>> {
    if trials.is_empty() {
        return None;
    }
    let n = trials.len();

    let mut fitness: Vec<f64> = trials.iter().map(|t| t.best_fitness).collect();
    fitness.sort_by(f64::total_cmp);
    let mean_fitness = fitness.iter().sum::<f64>() / n as f64;

    let total_nanos: u128 = trials.iter().map(|t| t.duration.as_nanos()).sum();
    let mean_nanos = total_nanos / n as u128;
    let mean_duration = Duration::new(
        (mean_nanos / 1_000_000_000) as u64,
        (mean_nanos % 1_000_000_000) as u32,
    );

    Some(AggregateResult {
        params,
        mean_fitness,
        mean_duration,
        min_fitness: fitness[0],
        max_fitness: fitness[n - 1],
        trials,
    })
}

/// Runs `config.repetitions` independent trials of `params` and
/// aggregates them.
///
/// Trial `rep` of the set at position `set_index` is seeded with
/// [`trial_seed`]`(base_seed, set_index, rep)`, so results do not depend
/// on whether the trials ran in parallel.
pub fn run_trials<P: ParameterSet, O: Objective>(
    params: &P,
    objective: &O,
    config: &TrialConfig,
    base_seed: u64,
    set_index: usize,
) -> Result<AggregateResult<P>> {
    config.validate()?;
    params.validate()?;

    let run_one = |rep: usize| -> Result<TrialResult> {
        let seed = trial_seed(base_seed, set_index, rep);
        let start = Instant::now();
        let best_fitness = params.run_once(objective, seed, config.parallel_evaluation)?;
        let duration = start.elapsed();
        debug!(
            engine = P::ENGINE,
            set = set_index,
            rep,
            best_fitness,
            ms = duration.as_secs_f64() * 1000.0,
            "trial finished"
        );
        Ok(TrialResult {
            seed,
            best_fitness,
            duration,
        })
    };

    let trials: Vec<TrialResult> = if config.parallel_trials {
        (0..config.repetitions)
            .into_par_iter()
            .map(run_one)
            .collect::<Result<_>>()?
    } else {
        (0..config.repetitions).map(run_one).collect::<Result<_>>()?
    };

    // repetitions >= 1, checked above
    aggregate(*params, trials).ok_or_else(|| {
        ConfigError::TooSmall {
            field: "repetitions",
            min: 1,
            value: 0,
        }
        .into()
    })
}

/// Derives a well-mixed seed for one trial.
pub fn trial_seed(base: u64, set_index: usize, rep: usize) -> u64 {
    let lane = ((set_index as u64) << 32) ^ rep as u64;
    splitmix64(base ^ splitmix64(lane))
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
