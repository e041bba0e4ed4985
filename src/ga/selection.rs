//! Survivor and parent selection.
//!
//! Survivors are chosen deterministically (elitism); parents are drawn
//! with a [`Selection`] strategy. Both assume **minimization**.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use super::types::{compare_fitness, Individual};
use rand::Rng;

/// Parent selection strategy.
///
/// # Examples
///
/// ```
/// use rastrigin_bench::ga::Selection;
///
/// // Binary tournament, the reference configuration
/// let sel = Selection::Tournament(2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Sample `k` individuals uniformly with replacement, keep the best.
    ///
    /// Higher `k` = stronger selection pressure.
    Tournament(usize),

    /// Linear ranking: weight of rank `i` (0 = best) is `n - i`.
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(2)
    }
}

impl Selection {
    /// Selects a parent index from `population`.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<R: Rng>(&self, population: &[Individual], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Tournament(k) => tournament(population, *k, rng),
            Selection::Rank => rank(population, rng),
        }
    }
}

/// Keeps the `n` best individuals, best first. Equal fitness keeps the
/// original population order.
pub fn elite(population: &[Individual], n: usize) -> Vec<Individual> {
    let mut order: Vec<usize> = (0..population.len()).collect();
    // sort_by is stable, so ties stay in index order
    order.sort_by(|&a, &b| compare_fitness(population[a].fitness(), population[b].fitness()));
    order
        .into_iter()
        .take(n)
        .map(|i| population[i].clone())
        .collect()
}

fn tournament<R: Rng>(population: &[Individual], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if population[idx].fitness() < population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}

fn rank<R: Rng>(population: &[Individual], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| compare_fitness(population[a].fitness(), population[b].fitness()));

    let total = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (rank, &idx) in order.iter().enumerate() {
        cumulative += (n - rank) as f64;
        if cumulative > threshold {
            return idx;
        }
    }

    order[n - 1]
}
