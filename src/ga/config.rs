//! GA hyperparameters.
//!
//! [`GaParams`] is the immutable parameter set for one GA configuration.
//! Sweeps derive new values from it with the `with_*` builders; nothing
//! mutates a parameter set that an engine already holds.

use super::runner::GaEngine;
use crate::error::{ConfigError, ParamError, Result};
use crate::experiment::{ParameterSet, SweepMode};
use crate::fitness::Objective;
use crate::param_file::{parse_f64, parse_usize};

/// Hyperparameters of the genetic algorithm.
///
/// # Defaults
///
/// ```
/// use rastrigin_bench::ga::GaParams;
///
/// let params = GaParams::default();
/// assert_eq!(params.pop_size, 100);
/// assert_eq!(params.num_iters, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use rastrigin_bench::ga::GaParams;
///
/// let params = GaParams::default()
///     .with_pop_size(200)
///     .with_tournament_size(4)
///     .with_prob_mutation(0.05);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaParams {
    /// Number of individuals in every generation.
    pub pop_size: usize,

    /// Number of best individuals copied unchanged into the next generation.
    pub num_survivors: usize,

    /// Number of individuals sampled per tournament.
    ///
    /// - 2: light pressure, keeps diversity
    /// - 3-5: moderate pressure
    pub tournament_size: usize,

    /// Per-gene mutation probability (0.0–1.0).
    pub prob_mutation: f64,

    /// Per-pair crossover probability (0.0–1.0).
    pub prob_crossover: f64,

    /// Number of generations to run.
    pub num_iters: usize,
}

impl Default for GaParams {
    fn default() -> Self {
        Self {
            pop_size: 100,
            num_survivors: 1,
            tournament_size: 2,
            prob_mutation: 0.09,
            prob_crossover: 1.0,
            num_iters: 100,
        }
    }
}

impl GaParams {
    pub fn with_pop_size(mut self, n: usize) -> Self {
        self.pop_size = n;
        self
    }

    pub fn with_num_survivors(mut self, n: usize) -> Self {
        self.num_survivors = n;
        self
    }

    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    pub fn with_prob_mutation(mut self, p: f64) -> Self {
        self.prob_mutation = p;
        self
    }

    pub fn with_prob_crossover(mut self, p: f64) -> Self {
        self.prob_crossover = p;
        self
    }

    pub fn with_num_iters(mut self, n: usize) -> Self {
        self.num_iters = n;
        self
    }

    /// Number of slots filled by tournament selection each generation.
    pub fn offspring_count(&self) -> usize {
        self.pop_size.saturating_sub(self.num_survivors)
    }

    /// Validates the parameters.
    ///
    /// Rejects an empty population, survivors that leave no room for
    /// offspring, tournaments larger than the offspring pool, and
    /// probabilities outside `[0, 1]`.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.pop_size < 1 {
            return Err(ConfigError::TooSmall {
                field: "popSize",
                min: 1,
                value: self.pop_size,
            });
        }
        if self.num_survivors >= self.pop_size {
            return Err(ConfigError::SurvivorsFillPopulation {
                survivors: self.num_survivors,
                population: self.pop_size,
            });
        }
        if self.tournament_size < 1 {
            return Err(ConfigError::TooSmall {
                field: "tournamentSize",
                min: 1,
                value: self.tournament_size,
            });
        }
        if self.tournament_size > self.offspring_count() {
            return Err(ConfigError::TournamentTooLarge {
                tournament: self.tournament_size,
                offspring: self.offspring_count(),
            });
        }
        check_probability("probMutation", self.prob_mutation)?;
        check_probability("probCrossover", self.prob_crossover)?;
        Ok(())
    }
}

fn check_probability(field: &'static str, value: f64) -> std::result::Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotProbability { field, value })
    }
}

/// GA hyperparameters that a perturbation sweep can vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaField {
    ProbMutation,
    ProbCrossover,
}

impl ParameterSet for GaParams {
    type Field = GaField;

    const ENGINE: &'static str = "GA";

    const SWEEPS: &'static [(&'static str, SweepMode<GaField>)] = &[
        ("default", SweepMode::Default),
        (
            "budget",
            SweepMode::Budget {
                budget: 1_000_000,
                populations: [50, 100, 200, 500, 1000, 2000, 4000, 5000, 10_000, 20_000],
            },
        ),
        (
            "mutation",
            SweepMode::Perturb {
                field: GaField::ProbMutation,
                step: 0.01,
            },
        ),
        (
            "crossover",
            SweepMode::Perturb {
                field: GaField::ProbCrossover,
                step: 0.1,
            },
        ),
    ];

    fn population(&self) -> usize {
        self.pop_size
    }

    fn with_budget_split(self, population: usize, iterations: usize) -> Self {
        self.with_pop_size(population).with_num_iters(iterations)
    }

    fn with_field(self, field: GaField, value: f64) -> Self {
        match field {
            GaField::ProbMutation => self.with_prob_mutation(value),
            GaField::ProbCrossover => self.with_prob_crossover(value),
        }
    }

    fn field(&self, field: GaField) -> f64 {
        match field {
            GaField::ProbMutation => self.prob_mutation,
            GaField::ProbCrossover => self.prob_crossover,
        }
    }

    fn apply(&mut self, key: &str, value: &str) -> std::result::Result<(), ParamError> {
        match key {
            "popSize" => self.pop_size = parse_usize(key, value)?,
            "numSurvivors" => self.num_survivors = parse_usize(key, value)?,
            "tournamentSize" => self.tournament_size = parse_usize(key, value)?,
            "probMutation" => self.prob_mutation = parse_f64(key, value)?,
            "probCrossover" => self.prob_crossover = parse_f64(key, value)?,
            "numIters" => self.num_iters = parse_usize(key, value)?,
            _ => return Err(ParamError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    fn describe(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Probability of Mutation", self.prob_mutation.to_string()),
            ("Probability of Crossover", self.prob_crossover.to_string()),
            ("Population", self.pop_size.to_string()),
            ("Iterations", self.num_iters.to_string()),
            ("Tournament Size", self.tournament_size.to_string()),
            ("Number of Survivors", self.num_survivors.to_string()),
        ]
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        GaParams::validate(self)
    }

    fn run_once<O: Objective>(&self, objective: &O, seed: u64, parallel: bool) -> Result<f64> {
        let engine = GaEngine::new(objective, *self)?.with_parallel(parallel);
        Ok(engine.run(seed)?.best_fitness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = GaParams::default();
        assert_eq!(params.pop_size, 100);
        assert_eq!(params.num_survivors, 1);
        assert_eq!(params.tournament_size, 2);
        assert!((params.prob_mutation - 0.09).abs() < 1e-12);
        assert!((params.prob_crossover - 1.0).abs() < 1e-12);
        assert_eq!(params.num_iters, 100);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let params = GaParams::default()
            .with_pop_size(40)
            .with_num_survivors(4)
            .with_tournament_size(3)
            .with_prob_mutation(0.2)
            .with_prob_crossover(0.7)
            .with_num_iters(12);

        assert_eq!(params.pop_size, 40);
        assert_eq!(params.num_survivors, 4);
        assert_eq!(params.tournament_size, 3);
        assert_eq!(params.offspring_count(), 36);
        assert!((params.prob_mutation - 0.2).abs() < 1e-12);
        assert!((params.prob_crossover - 0.7).abs() < 1e-12);
        assert_eq!(params.num_iters, 12);
    }

    #[test]
    fn test_validate_empty_population() {
        let err = GaParams::default().with_pop_size(0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::TooSmall { field: "popSize", .. }));
    }

    #[test]
    fn test_validate_survivors_fill_population() {
        let params = GaParams::default().with_pop_size(5).with_num_survivors(5);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::SurvivorsFillPopulation { .. })
        ));
    }

    #[test]
    fn test_validate_tournament_too_large() {
        let params = GaParams::default()
            .with_pop_size(10)
            .with_num_survivors(2)
            .with_tournament_size(9);
        assert_eq!(
            params.validate(),
            Err(ConfigError::TournamentTooLarge {
                tournament: 9,
                offspring: 8
            })
        );

        let params = params.with_tournament_size(8);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_tournament() {
        let params = GaParams::default().with_tournament_size(0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_probabilities() {
        assert!(GaParams::default().with_prob_mutation(1.5).validate().is_err());
        assert!(GaParams::default().with_prob_crossover(-0.1).validate().is_err());
        assert!(GaParams::default().with_prob_mutation(f64::NAN).validate().is_err());
        assert!(GaParams::default().with_prob_mutation(0.0).validate().is_ok());
    }

    #[test]
    fn test_zero_iterations_allowed() {
        assert!(GaParams::default().with_num_iters(0).validate().is_ok());
    }

    #[test]
    fn test_apply_known_keys() {
        let mut params = GaParams::default();
        params.apply("popSize", "250").unwrap();
        params.apply("probCrossover", "0.6").unwrap();
        params.apply("numIters", " 40 ").unwrap();
        assert_eq!(params.pop_size, 250);
        assert!((params.prob_crossover - 0.6).abs() < 1e-12);
        assert_eq!(params.num_iters, 40);
    }

    #[test]
    fn test_apply_rejects_bad_value_without_change() {
        let mut params = GaParams::default();
        let err = params.apply("tournamentSize", "two").unwrap_err();
        assert!(matches!(err, ParamError::InvalidValue { .. }));
        assert_eq!(params, GaParams::default());
    }

    #[test]
    fn test_apply_unknown_key() {
        let mut params = GaParams::default();
        let err = params.apply("numParticles", "80").unwrap_err();
        assert_eq!(err.to_string(), "unknown parameter numParticles");
    }

    #[test]
    fn test_field_roundtrip() {
        let params = GaParams::default().with_field(GaField::ProbCrossover, 0.3);
        assert!((params.field(GaField::ProbCrossover) - 0.3).abs() < 1e-12);
        assert!((params.field(GaField::ProbMutation) - 0.09).abs() < 1e-12);
    }
}
