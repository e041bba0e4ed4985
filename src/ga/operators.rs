//! Real-vector variation operators.
//!
//! The generation loop only talks to an [`Operators`] bundle, so swapping
//! single-point crossover for uniform crossover, or reset mutation for
//! Gaussian mutation, never touches the loop itself.
//!
//! # Crossover
//!
//! - [`Crossover::SinglePoint`]: swap the suffixes after a random cut
//! - [`Crossover::Uniform`]: swap each gene with probability 1/2
//!
//! # Mutation
//!
//! - [`Mutation::Reset`]: replace a gene with a fresh uniform value
//! - [`Mutation::Gaussian`]: add N(0, σ·R) noise, clamped to the box

use rand::Rng;

/// Recombination of two parent vectors into two children.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Crossover {
    #[default]
    SinglePoint,
    Uniform,
}

/// Per-gene perturbation applied to every offspring.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Mutation {
    /// Resample the gene uniformly in `[-R, R]`.
    #[default]
    Reset,
    /// Add Gaussian noise with standard deviation `sigma * R`.
    Gaussian { sigma: f64 },
}

/// The variation operators used by a GA run.
///
/// ```
/// use rastrigin_bench::ga::{Crossover, Mutation, Operators};
///
/// let ops = Operators::default()
///     .with_crossover(Crossover::Uniform)
///     .with_mutation(Mutation::Gaussian { sigma: 0.1 });
/// assert_eq!(ops.selection, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Operators {
    /// Parent selection. `None` means tournament with the configured size.
    pub selection: Option<super::Selection>,
    pub crossover: Crossover,
    pub mutation: Mutation,
}

impl Operators {
    pub fn with_selection(mut self, selection: super::Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = mutation;
        self
    }
}

impl Crossover {
    /// Recombines `a` and `b` in place.
    ///
    /// # Panics
    /// Panics if the parents have different lengths.
    pub fn apply<R: Rng>(&self, a: &mut [f64], b: &mut [f64], rng: &mut R) {
        assert_eq!(a.len(), b.len(), "parents must have equal length");
        match self {
            Crossover::SinglePoint => single_point(a, b, rng),
            Crossover::Uniform => uniform(a, b, rng),
        }
    }
}

/// Cut in `1..n` so both children mix genes from both parents.
fn single_point<R: Rng>(a: &mut [f64], b: &mut [f64], rng: &mut R) {
    let n = a.len();
    if n < 2 {
        return;
    }
    let cut = rng.random_range(1..n);
    a[cut..].swap_with_slice(&mut b[cut..]);
}

fn uniform<R: Rng>(a: &mut [f64], b: &mut [f64], rng: &mut R) {
    for (x, y) in a.iter_mut().zip(b.iter_mut()) {
        if rng.random_bool(0.5) {
            std::mem::swap(x, y);
        }
    }
}

impl Mutation {
    /// Mutates each gene independently with probability `rate`.
    ///
    /// Results always stay inside `[-bound, bound]`.
    pub fn apply<R: Rng>(&self, genes: &mut [f64], rate: f64, bound: f64, rng: &mut R) {
        if rate <= 0.0 {
            return;
        }
        for gene in genes.iter_mut() {
            if rng.random_range(0.0..1.0) >= rate {
                continue;
            }
            *gene = match *self {
                Mutation::Reset => rng.random_range(-bound..=bound),
                Mutation::Gaussian { sigma } => {
                    (*gene + standard_normal(rng) * sigma * bound).clamp(-bound, bound)
                }
            };
        }
    }
}

/// Box-Muller draw from N(0, 1).
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.random_range(f64::EPSILON..1.0);
    let u2: f64 = rng.random_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
