//! Parameter sweep generation.
//!
//! A [`SweepMode`] turns one default parameter set into the ordered list
//! of parameter sets an experiment compares. Each mode has its own
//! generator function; [`SweepMode::generate`] only dispatches.

use super::ParameterSet;

/// Number of parameter sets produced by the budget and perturbation modes.
pub const SWEEP_LEN: usize = 10;

/// Strategy for deriving parameter sets from the defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepMode<F> {
    /// The defaults alone.
    Default,

    /// Population sizes traded against iterations under a fixed number of
    /// fitness evaluations: `iterations = budget / population`.
    Budget {
        budget: usize,
        populations: [usize; SWEEP_LEN],
    },

    /// One field set to `i * step` for `i` in `0..10`, everything else at
    /// the defaults.
    Perturb { field: F, step: f64 },
}

impl<F: Copy> SweepMode<F> {
    /// Overrides the step of a perturbation sweep. Other modes are
    /// returned unchanged.
    pub fn with_step(self, new_step: f64) -> Self {
        match self {
            SweepMode::Perturb { field, .. } => SweepMode::Perturb {
                field,
                step: new_step,
            },
            other => other,
        }
    }

    /// Overrides the evaluation budget of a budget sweep. Other modes are
    /// returned unchanged.
    pub fn with_budget(self, new_budget: usize) -> Self {
        match self {
            SweepMode::Budget { populations, .. } => SweepMode::Budget {
                budget: new_budget,
                populations,
            },
            other => other,
        }
    }

    /// Generates the parameter sets for this mode.
    pub fn generate<P: ParameterSet<Field = F>>(&self, defaults: &P) -> Vec<P> {
        match *self {
            SweepMode::Default => default_sweep(defaults),
            SweepMode::Budget {
                budget,
                ref populations,
            } => budget_sweep(defaults, budget, populations),
            SweepMode::Perturb { field, step } => perturbation_sweep(defaults, field, step),
        }
    }
}

/// Looks up a named sweep mode for parameter set `P`.
///
/// ```
/// use rastrigin_bench::experiment::{sweep_mode, SweepMode};
/// use rastrigin_bench::ga::{GaField, GaParams};
///
/// let mode = sweep_mode::<GaParams>("mutation").unwrap();
/// assert_eq!(mode, SweepMode::Perturb { field: GaField::ProbMutation, step: 0.01 });
/// assert!(sweep_mode::<GaParams>("velocity").is_none());
/// ```
pub fn sweep_mode<P: ParameterSet>(name: &str) -> Option<SweepMode<P::Field>> {
    P::SWEEPS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, mode)| *mode)
}

/// Names of every sweep mode known for `P`.
pub fn sweep_names<P: ParameterSet>() -> Vec<&'static str> {
    P::SWEEPS.iter().map(|(n, _)| *n).collect()
}

pub fn default_sweep<P: ParameterSet>(defaults: &P) -> Vec<P> {
    vec![*defaults]
}

pub fn budget_sweep<P: ParameterSet>(
    defaults: &P,
    budget: usize,
    populations: &[usize; SWEEP_LEN],
) -> Vec<P> {
    populations
        .iter()
        .map(|&population| {
            let iterations = budget.checked_div(population).unwrap_or(0);
            defaults.with_budget_split(population, iterations)
        })
        .collect()
}

pub fn perturbation_sweep<P: ParameterSet>(defaults: &P, field: P::Field, step: f64) -> Vec<P> {
    (0..SWEEP_LEN)
        .map(|i| defaults.with_field(field, i as f64 * step))
        .collect()
}
