//! Parameter sweeps and repeated-trial aggregation.
//!
//! An [`Experiment`] takes the ordered parameter sets produced by a
//! [`SweepMode`], runs each one [`TrialConfig::repetitions`] times and
//! reduces the trials to an [`AggregateResult`].
//!
//! Parameter sets are independent: every trial builds its own population
//! or swarm from its own seed. Repetitions of one set may run in parallel;
//! sets run one after another, and a cancellation flag is honoured
//! between them.

mod sweep;
mod trial;

pub use sweep::{
    budget_sweep, default_sweep, perturbation_sweep, sweep_mode, sweep_names, SweepMode,
    SWEEP_LEN,
};
pub use trial::{aggregate, run_trials, trial_seed, AggregateResult, TrialConfig, TrialResult};

use crate::error::{ConfigError, ParamError, Result};
use crate::fitness::Objective;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// One engine's hyperparameters as an immutable value.
///
/// Ties a parameter type to its engine, its sweepable fields, its
/// parameter-file keys and its report labels.
pub trait ParameterSet: Copy + PartialEq + Debug + Send + Sync + 'static {
    /// Fields a perturbation sweep can vary.
    type Field: Copy + PartialEq + Debug + Send + Sync + 'static;

    /// Short engine name for logs.
    const ENGINE: &'static str;

    /// Named sweep modes, looked up by [`sweep_mode`].
    const SWEEPS: &'static [(&'static str, SweepMode<Self::Field>)];

    /// Population or swarm size.
    fn population(&self) -> usize;

    /// Copy with a new population size and iteration count.
    fn with_budget_split(self, population: usize, iterations: usize) -> Self;

    /// Copy with `field` set to `value`.
    fn with_field(self, field: Self::Field, value: f64) -> Self;

    fn field(&self, field: Self::Field) -> f64;

    /// Sets the field named by a parameter-file key.
    ///
    /// Leaves `self` untouched on error.
    fn apply(&mut self, key: &str, value: &str) -> std::result::Result<(), ParamError>;

    /// `(label, value)` pairs in report order.
    fn describe(&self) -> Vec<(&'static str, String)>;

    fn validate(&self) -> std::result::Result<(), ConfigError>;

    /// Builds the engine, runs it once from `seed` and returns the best
    /// fitness found.
    fn run_once<O: Objective>(&self, objective: &O, seed: u64, parallel: bool) -> Result<f64>;
}

/// Outcome of an experiment.
#[derive(Debug, Clone)]
pub struct ExperimentResult<P> {
    /// One aggregate per completed parameter set, in sweep order.
    pub results: Vec<AggregateResult<P>>,

    /// Whether the sweep stopped early because of the cancellation flag.
    pub cancelled: bool,

    /// Base seed the trial seeds were derived from.
    pub seed: u64,
}

/// A validated sweep, ready to run.
///
/// ```
/// use rastrigin_bench::experiment::{Experiment, SweepMode, TrialConfig};
/// use rastrigin_bench::fitness::Rastrigin;
/// use rastrigin_bench::ga::GaParams;
///
/// let objective = Rastrigin::default();
/// let sets = SweepMode::Default.generate(&GaParams::default().with_num_iters(5));
/// let trials = TrialConfig::default().with_repetitions(3).with_seed(1);
/// let experiment = Experiment::new(&objective, sets, trials).unwrap();
/// let outcome = experiment.run(|_| {}).unwrap();
/// assert_eq!(outcome.results.len(), 1);
/// ```
pub struct Experiment<'a, P: ParameterSet, O: Objective> {
    objective: &'a O,
    sets: Vec<P>,
    trials: TrialConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a, P: ParameterSet, O: Objective> Experiment<'a, P, O> {
    /// Validates the objective, the trial configuration and every parameter
    /// set up front, so a bad set fails before any trial runs.
    pub fn new(
        objective: &'a O,
        sets: Vec<P>,
        trials: TrialConfig,
    ) -> std::result::Result<Self, ConfigError> {
        objective.validate()?;
        trials.validate()?;
        for set in &sets {
            set.validate()?;
        }
        Ok(Self {
            objective,
            sets,
            trials,
            cancel: None,
        })
    }

    /// Stops the sweep before the next parameter set once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn sets(&self) -> &[P] {
        &self.sets
    }

    /// Runs every parameter set in order, calling `on_result` as each one
    /// completes.
    pub fn run<F>(&self, mut on_result: F) -> Result<ExperimentResult<P>>
    where
        F: FnMut(&AggregateResult<P>),
    {
        let seed = self.trials.seed.unwrap_or_else(rand::random);
        info!(
            engine = P::ENGINE,
            sets = self.sets.len(),
            repetitions = self.trials.repetitions,
            seed,
            "starting experiment"
        );

        let mut results = Vec::with_capacity(self.sets.len());
        let mut cancelled = false;

        for (index, params) in self.sets.iter().enumerate() {
            if let Some(ref flag) = self.cancel {
                if flag.load(Ordering::Relaxed) {
                    warn!(
                        completed = results.len(),
                        remaining = self.sets.len() - index,
                        "experiment cancelled"
                    );
                    cancelled = true;
                    break;
                }
            }

            info!(
                engine = P::ENGINE,
                set = index + 1,
                of = self.sets.len(),
                population = params.population(),
                "running parameter set"
            );
            let result = run_trials(params, self.objective, &self.trials, seed, index)?;
            info!(
                mean_fitness = result.mean_fitness,
                mean_ms = result.mean_millis(),
                "parameter set finished"
            );
            on_result(&result);
            results.push(result);
        }

        Ok(ExperimentResult {
            results,
            cancelled,
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::Rastrigin;
    use crate::ga::GaParams;
    use crate::pso::PsoParams;

    #[test]
    fn test_rejects_invalid_set_up_front() {
        let f = Rastrigin::default();
        let sets = vec![
            GaParams::default(),
            GaParams::default().with_tournament_size(500),
        ];
        assert!(matches!(
            Experiment::new(&f, sets, TrialConfig::default()),
            Err(ConfigError::TournamentTooLarge { .. })
        ));
    }

    #[test]
    fn test_runs_sets_in_order() {
        let f = Rastrigin::default();
        let defaults = PsoParams::default().with_num_particles(10).with_num_iters(5);
        let sets = sweep_mode::<PsoParams>("inertiaWeight")
            .unwrap()
            .generate(&defaults);
        let trials = TrialConfig::default().with_repetitions(2).with_seed(5);
        let experiment = Experiment::new(&f, sets.clone(), trials).unwrap();

        let mut seen = Vec::new();
        let outcome = experiment.run(|r| seen.push(r.params)).unwrap();

        assert!(!outcome.cancelled);
        assert_eq!(outcome.seed, 5);
        assert_eq!(seen, sets);
        assert_eq!(outcome.results.len(), SWEEP_LEN);
        assert!(outcome.results.iter().all(|r| r.trials.len() == 2));
    }

    #[test]
    fn test_same_seed_same_results() {
        let f = Rastrigin::default();
        let sets = vec![GaParams::default().with_pop_size(20).with_num_iters(10)];
        let trials = TrialConfig::default().with_repetitions(4).with_seed(77);

        let a = Experiment::new(&f, sets.clone(), trials).unwrap().run(|_| {}).unwrap();
        let b = Experiment::new(&f, sets, trials).unwrap().run(|_| {}).unwrap();
        assert_eq!(a.results[0].mean_fitness, b.results[0].mean_fitness);
    }

    #[test]
    fn test_cancel_before_first_set() {
        let f = Rastrigin::default();
        let sets = vec![GaParams::default(); 3];
        let flag = Arc::new(AtomicBool::new(true));
        let experiment = Experiment::new(&f, sets, TrialConfig::default())
            .unwrap()
            .with_cancel(flag);

        let outcome = experiment.run(|_| panic!("no set should run")).unwrap();
        assert!(outcome.cancelled);
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn test_cancel_between_sets() {
        let f = Rastrigin::default();
        let sets = vec![GaParams::default().with_pop_size(10).with_num_iters(2); 4];
        let flag = Arc::new(AtomicBool::new(false));
        let trials = TrialConfig::default().with_repetitions(1).with_seed(3);
        let experiment = Experiment::new(&f, sets, trials)
            .unwrap()
            .with_cancel(flag.clone());

        let outcome = experiment
            .run(|_| flag.store(true, Ordering::Relaxed))
            .unwrap();
        assert!(outcome.cancelled);
        assert_eq!(outcome.results.len(), 1);
    }
}
