//! PSO iteration loop.

use super::config::PsoParams;
use super::topology::Ring;
use super::types::Swarm;
use crate::error::{BenchError, ConfigError, Result};
use crate::fitness::Objective;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::trace;

/// Result of one PSO run.
#[derive(Debug, Clone)]
pub struct PsoResult {
    /// Best position visited by any particle.
    pub best_position: Vec<f64>,

    /// Fitness at `best_position`.
    pub best_fitness: f64,

    /// Number of update steps executed.
    pub iterations: usize,

    /// Mean fitness of the initial swarm.
    pub initial_mean_fitness: f64,

    /// Swarm best after initialization, then after every iteration.
    pub fitness_history: Vec<f64>,
}

/// A validated PSO configuration bound to an objective.
///
/// ```
/// use rastrigin_bench::fitness::Rastrigin;
/// use rastrigin_bench::pso::{PsoEngine, PsoParams};
///
/// let objective = Rastrigin::default();
/// let engine = PsoEngine::new(&objective, PsoParams::default()).unwrap();
/// let result = engine.run(42).unwrap();
/// assert!(result.best_fitness < result.initial_mean_fitness);
/// ```
#[derive(Debug, Clone)]
pub struct PsoEngine<'a, O: Objective> {
    objective: &'a O,
    params: PsoParams,
    ring: Ring,
    parallel: bool,
}

impl<'a, O: Objective> PsoEngine<'a, O> {
    /// Validates `params` and builds an engine whose ring radius is
    /// `num_particles / 10`.
    pub fn new(objective: &'a O, params: PsoParams) -> std::result::Result<Self, ConfigError> {
        objective.validate()?;
        params.validate()?;
        Ok(Self {
            objective,
            ring: Ring::new(params.neighborhood_radius()),
            params,
            parallel: false,
        })
    }

    /// Overrides the neighborhood topology.
    pub fn with_ring(mut self, ring: Ring) -> Self {
        self.ring = ring;
        self
    }

    /// Evaluates particles with rayon. Random draws stay sequential.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn params(&self) -> &PsoParams {
        &self.params
    }

    pub fn ring(&self) -> Ring {
        self.ring
    }

    /// Runs with a generator seeded from `seed`.
    pub fn run(&self, seed: u64) -> Result<PsoResult> {
        self.run_with_rng(&mut StdRng::seed_from_u64(seed))
    }

    /// Runs with a caller-supplied generator.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> Result<PsoResult> {
        let mut swarm = self.init_swarm(rng)?;
        let initial_mean_fitness = swarm.mean_fitness();

        let mut fitness_history = Vec::with_capacity(self.params.num_iters + 1);
        fitness_history.push(swarm.best_fitness());

        for iter in 0..self.params.num_iters {
            self.step(&mut swarm, rng)?;
            fitness_history.push(swarm.best_fitness());
            trace!(iteration = iter + 1, best = swarm.best_fitness(), "pso iteration");
        }

        Ok(PsoResult {
            best_fitness: swarm.best_fitness(),
            best_position: swarm.best_position().to_vec(),
            iterations: self.params.num_iters,
            initial_mean_fitness,
            fitness_history,
        })
    }

    /// Creates and evaluates a fresh swarm.
    pub fn init_swarm<R: Rng>(&self, rng: &mut R) -> Result<Swarm> {
        let swarm = Swarm::new(
            self.objective,
            self.params.num_particles,
            self.params.max_min_velocity,
            self.ring,
            rng,
        );
        ensure_finite(&swarm)?;
        Ok(swarm)
    }

    /// One iteration: move every particle, then re-evaluate and refresh
    /// the personal and swarm bests.
    ///
    /// A particle moves by its freshly computed velocity. Position and
    /// velocity are clamped afterwards, so `max_min_velocity` bounds the
    /// momentum carried into the next step rather than the step itself.
    ///
    /// Attractors are read from the bests as they stood before the step,
    /// so particle order does not matter.
    pub fn step<R: Rng>(&self, swarm: &mut Swarm, rng: &mut R) -> Result<()> {
        let p = &self.params;
        let bound = self.objective.bound();
        let vmax = p.max_min_velocity;

        let neighborhood_bests: Vec<Vec<f64>> = (0..swarm.particles.len())
            .map(|i| swarm.particles[swarm.neighborhood_best(i)].best_position.clone())
            .collect();

        let Swarm {
            particles,
            best_position: global_best,
            ..
        } = &mut *swarm;

        for (particle, nbest) in particles.iter_mut().zip(&neighborhood_bests) {
            for d in 0..particle.position.len() {
                let x = particle.position[d];
                let v = p.inertia_weight * particle.velocity[d]
                    + p.personal_weight * rng.random::<f64>() * (particle.best_position[d] - x)
                    + p.neigh_weight * rng.random::<f64>() * (nbest[d] - x)
                    + p.global_weight * rng.random::<f64>() * (global_best[d] - x);
                // the move uses the raw velocity; only the stored one is bounded
                particle.position[d] = (x + v).clamp(-bound, bound);
                particle.velocity[d] = v.clamp(-vmax, vmax);
            }
        }

        let objective = self.objective;
        if self.parallel {
            swarm
                .particles
                .par_iter_mut()
                .for_each(|particle| particle.evaluate(objective));
        } else {
            for particle in swarm.particles.iter_mut() {
                particle.evaluate(objective);
            }
        }
        ensure_finite(swarm)?;
        swarm.refresh_global_best();
        Ok(())
    }
}

fn ensure_finite(swarm: &Swarm) -> Result<()> {
    match swarm.particles.iter().find(|p| !p.fitness.is_finite()) {
        Some(p) => Err(BenchError::NonFinite {
            engine: "PSO",
            value: p.fitness,
        }),
        None => Ok(()),
    }
}
