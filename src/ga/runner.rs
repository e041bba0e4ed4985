//! GA generation loop.
//!
//! [`GaEngine`] drives one run: initialize → (survivors → parents →
//! crossover → mutation → evaluate) × `num_iters`, tracking the best
//! individual seen in any generation.

use super::config::GaParams;
use super::operators::{Mutation, Operators};
use super::selection::{elite, Selection};
use super::types::{best_index, evaluate_all, mean_fitness, random_genes, Individual};
use crate::error::{BenchError, ConfigError, Result};
use crate::fitness::Objective;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Result of one GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The best individual found in any generation.
    pub best: Individual,

    /// Same as `best.fitness()`.
    pub best_fitness: f64,

    /// Number of generations executed after initialization.
    pub generations: usize,

    /// Mean fitness of the randomly initialized population.
    pub initial_mean_fitness: f64,

    /// Running best fitness: initial population first, then one entry per
    /// generation.
    pub fitness_history: Vec<f64>,
}

/// A validated GA configuration bound to an objective.
///
/// # Usage
///
/// ```
/// use rastrigin_bench::fitness::Rastrigin;
/// use rastrigin_bench::ga::{GaEngine, GaParams};
///
/// let objective = Rastrigin::default();
/// let params = GaParams::default().with_num_iters(20);
/// let engine = GaEngine::new(&objective, params).unwrap();
/// let result = engine.run(42).unwrap();
/// assert!(result.best_fitness <= result.initial_mean_fitness);
/// ```
#[derive(Debug, Clone)]
pub struct GaEngine<'a, O: Objective> {
    objective: &'a O,
    params: GaParams,
    operators: Operators,
    parallel: bool,
}

impl<'a, O: Objective> GaEngine<'a, O> {
    /// Validates `params` against `objective` and builds an engine with
    /// the default operator set.
    pub fn new(objective: &'a O, params: GaParams) -> std::result::Result<Self, ConfigError> {
        objective.validate()?;
        params.validate()?;
        Ok(Self {
            objective,
            params,
            operators: Operators::default(),
            parallel: false,
        })
    }

    /// Replaces the operator set.
    pub fn with_operators(mut self, operators: Operators) -> std::result::Result<Self, ConfigError> {
        if let Mutation::Gaussian { sigma } = operators.mutation {
            if !sigma.is_finite() {
                return Err(ConfigError::NotFinite {
                    field: "sigma",
                    value: sigma,
                });
            }
            if sigma < 0.0 {
                return Err(ConfigError::Negative {
                    field: "sigma",
                    value: sigma,
                });
            }
        }
        if let Some(Selection::Tournament(k)) = operators.selection {
            if k < 1 || k > self.params.offspring_count() {
                return Err(ConfigError::TournamentTooLarge {
                    tournament: k,
                    offspring: self.params.offspring_count(),
                });
            }
        }
        self.operators = operators;
        Ok(self)
    }

    /// Evaluates each generation's offspring with rayon.
    ///
    /// Random draws stay sequential, so a seeded run gives the same
    /// result either way.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn params(&self) -> &GaParams {
        &self.params
    }

    /// Runs with a generator seeded from `seed`.
    pub fn run(&self, seed: u64) -> Result<GaResult> {
        self.run_with_rng(&mut StdRng::seed_from_u64(seed))
    }

    /// Runs with a caller-supplied generator.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> Result<GaResult> {
        let mut population = self.initial_population(rng)?;
        let initial_mean_fitness = mean_fitness(&population);

        let mut best = population[best_index(&population).unwrap_or(0)].clone();
        let mut fitness_history = Vec::with_capacity(self.params.num_iters + 1);
        fitness_history.push(best.fitness());

        for gen in 0..self.params.num_iters {
            population = self.next_generation(&population, rng)?;

            if let Some(idx) = best_index(&population) {
                if population[idx].fitness() < best.fitness() {
                    best = population[idx].clone();
                }
            }
            fitness_history.push(best.fitness());
            trace!(generation = gen + 1, best = best.fitness(), "ga generation");
        }

        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            generations: self.params.num_iters,
            initial_mean_fitness,
            fitness_history,
        })
    }

    /// Samples and evaluates `pop_size` uniform individuals.
    pub fn initial_population<R: Rng>(&self, rng: &mut R) -> Result<Vec<Individual>> {
        let batch = (0..self.params.pop_size)
            .map(|_| random_genes(self.objective, rng))
            .collect();
        let population = evaluate_all(self.objective, batch, self.parallel);
        ensure_finite(&population)?;
        Ok(population)
    }

    /// Produces the next generation from `population`.
    ///
    /// The `num_survivors` best individuals are carried over unchanged;
    /// the remaining slots are filled by offspring of selected parents.
    /// The returned population always has `pop_size` members.
    pub fn next_generation<R: Rng>(
        &self,
        population: &[Individual],
        rng: &mut R,
    ) -> Result<Vec<Individual>> {
        let offspring_count = self.params.offspring_count();
        let selection = self
            .operators
            .selection
            .unwrap_or(Selection::Tournament(self.params.tournament_size));
        let bound = self.objective.bound();

        let mut offspring: Vec<Vec<f64>> = Vec::with_capacity(offspring_count + 1);
        while offspring.len() < offspring_count {
            let p1 = selection.select(population, rng);
            let p2 = selection.select(population, rng);
            let mut a = population[p1].genes().to_vec();
            let mut b = population[p2].genes().to_vec();

            if rng.random_range(0.0..1.0) < self.params.prob_crossover {
                self.operators.crossover.apply(&mut a, &mut b, rng);
            }
            self.operators
                .mutation
                .apply(&mut a, self.params.prob_mutation, bound, rng);
            offspring.push(a);

            if offspring.len() < offspring_count {
                self.operators
                    .mutation
                    .apply(&mut b, self.params.prob_mutation, bound, rng);
                offspring.push(b);
            }
        }

        let offspring = evaluate_all(self.objective, offspring, self.parallel);
        ensure_finite(&offspring)?;

        let mut next = elite(population, self.params.num_survivors);
        next.extend(offspring);
        debug_assert_eq!(next.len(), self.params.pop_size);
        Ok(next)
    }
}

fn ensure_finite(population: &[Individual]) -> Result<()> {
    match population.iter().find(|ind| !ind.fitness().is_finite()) {
        Some(ind) => Err(BenchError::NonFinite {
            engine: "GA",
            value: ind.fitness(),
        }),
        None => Ok(()),
    }
}

// ============================================================================
// Tests
// ============================================================================
