//! Swarm state.

use super::topology::Ring;
use crate::fitness::Objective;
use rand::Rng;

/// One particle: where it is, where it is heading, and the best place it
/// has been.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    /// Fitness at the current position.
    pub fitness: f64,
    pub best_position: Vec<f64>,
    pub best_fitness: f64,
    /// Ring neighbors, including the particle itself.
    pub neighbors: Vec<usize>,
}

impl Particle {
    /// Uniform position in `[-R, R]`, uniform velocity in `[-vmax, vmax]`.
    /// The personal best starts at the initial position.
    pub(crate) fn random<O: Objective, R: Rng>(
        objective: &O,
        max_velocity: f64,
        neighbors: Vec<usize>,
        rng: &mut R,
    ) -> Self {
        let r = objective.bound();
        let dim = objective.dimension();
        let position: Vec<f64> = (0..dim).map(|_| rng.random_range(-r..=r)).collect();
        let velocity: Vec<f64> = (0..dim)
            .map(|_| rng.random_range(-max_velocity..=max_velocity))
            .collect();
        let fitness = objective.evaluate(&position);
        Self {
            best_position: position.clone(),
            best_fitness: fitness,
            position,
            velocity,
            fitness,
            neighbors,
        }
    }

    /// Re-scores the current position and promotes it to personal best if
    /// it improved.
    pub(crate) fn evaluate<O: Objective>(&mut self, objective: &O) {
        self.fitness = objective.evaluate(&self.position);
        if self.fitness < self.best_fitness {
            self.best_fitness = self.fitness;
            self.best_position.clone_from(&self.position);
        }
    }
}

/// The particles of one run and the best position any of them has found.
#[derive(Debug, Clone)]
pub struct Swarm {
    pub(crate) particles: Vec<Particle>,
    pub(crate) best_position: Vec<f64>,
    pub(crate) best_fitness: f64,
}

impl Swarm {
    pub(crate) fn new<O: Objective, R: Rng>(
        objective: &O,
        size: usize,
        max_velocity: f64,
        ring: Ring,
        rng: &mut R,
    ) -> Self {
        let particles: Vec<Particle> = (0..size)
            .map(|i| Particle::random(objective, max_velocity, ring.neighbors(i, size), rng))
            .collect();
        let mut swarm = Self {
            best_position: Vec::new(),
            best_fitness: f64::INFINITY,
            particles,
        };
        swarm.refresh_global_best();
        swarm
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn best_position(&self) -> &[f64] {
        &self.best_position
    }

    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    /// Index of the best personal best among the neighbors of particle `i`.
    pub fn neighborhood_best(&self, i: usize) -> usize {
        let mut best = i;
        for &j in &self.particles[i].neighbors {
            if self.particles[j].best_fitness < self.particles[best].best_fitness {
                best = j;
            }
        }
        best
    }

    /// Mean fitness at the current positions.
    pub fn mean_fitness(&self) -> f64 {
        if self.particles.is_empty() {
            return f64::NAN;
        }
        self.particles.iter().map(|p| p.fitness).sum::<f64>() / self.particles.len() as f64
    }

    /// Folds every personal best into the swarm best.
    pub(crate) fn refresh_global_best(&mut self) {
        for p in &self.particles {
            if p.best_fitness < self.best_fitness || self.best_position.is_empty() {
                self.best_fitness = p.best_fitness;
                self.best_position.clone_from(&p.best_position);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::Rastrigin;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_swarm_within_bounds() {
        let f = Rastrigin::default();
        let mut rng = StdRng::seed_from_u64(1);
        let swarm = Swarm::new(&f, 30, 0.04, Ring::new(3), &mut rng);

        assert_eq!(swarm.particles().len(), 30);
        for p in swarm.particles() {
            assert!(p.position.iter().all(|x| x.abs() <= 5.12));
            assert!(p.velocity.iter().all(|v| v.abs() <= 0.04));
            assert_eq!(p.best_position, p.position);
            assert_eq!(p.neighbors.len(), 7);
        }
        let min = swarm
            .particles()
            .iter()
            .map(|p| p.best_fitness)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(swarm.best_fitness(), min);
    }

    #[test]
    fn test_neighborhood_best_within_neighbors() {
        let f = Rastrigin::default();
        let mut rng = StdRng::seed_from_u64(2);
        let swarm = Swarm::new(&f, 20, 0.1, Ring::new(2), &mut rng);
        for i in 0..20 {
            let j = swarm.neighborhood_best(i);
            assert!(swarm.particles()[i].neighbors.contains(&j));
            for &k in &swarm.particles()[i].neighbors {
                assert!(swarm.particles()[j].best_fitness <= swarm.particles()[k].best_fitness);
            }
        }
    }

    #[test]
    fn test_evaluate_only_improves_personal_best() {
        let f = Rastrigin::new(2);
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = Particle::random(&f, 0.5, vec![0], &mut rng);
        p.position = vec![0.0, 0.0];
        p.evaluate(&f);
        assert_eq!(p.best_fitness, 0.0);

        p.position = vec![3.0, 3.0];
        p.evaluate(&f);
        assert!((p.fitness - 18.0).abs() < 1e-9);
        assert_eq!(p.best_fitness, 0.0);
        assert_eq!(p.best_position, vec![0.0, 0.0]);
    }
}
