//! Population members.

use crate::fitness::Objective;
use rand::Rng;
use rayon::prelude::*;
use std::cmp::Ordering;

/// A real-valued candidate together with its cached fitness.
///
/// Individuals are evaluated exactly once, when they are built. Operators
/// never edit one in place: they produce new gene vectors which become
/// new individuals.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    genes: Vec<f64>,
    fitness: f64,
}

impl Individual {
    /// Scores `genes` and wraps them as an individual.
    pub fn evaluated<O: Objective>(genes: Vec<f64>, objective: &O) -> Self {
        let fitness = objective.evaluate(&genes);
        Self { genes, fitness }
    }

    /// Samples every component uniformly in `[-R, R]`.
    pub fn random<O: Objective, R: Rng>(objective: &O, rng: &mut R) -> Self {
        Self::evaluated(random_genes(objective, rng), objective)
    }

    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    /// Fitness value. Lower is better.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}

/// A fresh uniform vector inside the objective's box.
pub(crate) fn random_genes<O: Objective, R: Rng>(objective: &O, rng: &mut R) -> Vec<f64> {
    let r = objective.bound();
    (0..objective.dimension())
        .map(|_| rng.random_range(-r..=r))
        .collect()
}

/// Scores a batch of gene vectors, in parallel when requested.
///
/// Output order matches input order either way.
pub(crate) fn evaluate_all<O: Objective>(
    objective: &O,
    batch: Vec<Vec<f64>>,
    parallel: bool,
) -> Vec<Individual> {
    if parallel {
        batch
            .into_par_iter()
            .map(|genes| Individual::evaluated(genes, objective))
            .collect()
    } else {
        batch
            .into_iter()
            .map(|genes| Individual::evaluated(genes, objective))
            .collect()
    }
}

/// Total order on fitness, NaN sorting last.
pub(crate) fn compare_fitness(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Index of the lowest-fitness individual. First one wins ties.
pub(crate) fn best_index(population: &[Individual]) -> Option<usize> {
    population
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| compare_fitness(a.fitness, b.fitness))
        .map(|(i, _)| i)
}

/// Arithmetic mean fitness of a population.
pub(crate) fn mean_fitness(population: &[Individual]) -> f64 {
    if population.is_empty() {
        return f64::NAN;
    }
    population.iter().map(Individual::fitness).sum::<f64>() / population.len() as f64
}
