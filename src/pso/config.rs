//! PSO hyperparameters.

use super::runner::PsoEngine;
use crate::error::{ConfigError, ParamError, Result};
use crate::experiment::{ParameterSet, SweepMode};
use crate::fitness::Objective;
use crate::param_file::{parse_f64, parse_usize};

/// Hyperparameters of the particle swarm optimizer.
///
/// The velocity update for particle `i`, dimension `d` is
///
/// ```text
/// v' = inertia_weight  · v
///    + personal_weight · r₁ · (pbest - x)
///    + neigh_weight    · r₂ · (nbest - x)
///    + global_weight   · r₃ · (gbest - x)
/// ```
///
/// where `nbest` is the best position in the particle's ring neighborhood
/// and `gbest` the best in the swarm. The particle moves to `x + v'`
/// clamped to the search box; `v'` is then clamped to `±max_min_velocity`
/// before it is kept for the next step.
///
/// ```
/// use rastrigin_bench::pso::PsoParams;
///
/// let params = PsoParams::default().with_num_particles(40).with_inertia_weight(0.7);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsoParams {
    /// Number of particles in the swarm.
    pub num_particles: usize,

    /// Number of velocity/position updates.
    pub num_iters: usize,

    /// Weight of the neighborhood-best attractor.
    pub neigh_weight: f64,

    /// Weight of the previous velocity.
    pub inertia_weight: f64,

    /// Weight of the personal-best attractor.
    pub personal_weight: f64,

    /// Weight of the swarm-best attractor.
    pub global_weight: f64,

    /// Per-component velocity bound.
    pub max_min_velocity: f64,
}

impl Default for PsoParams {
    fn default() -> Self {
        Self {
            num_particles: 80,
            num_iters: 125,
            neigh_weight: 0.25,
            inertia_weight: 0.5,
            personal_weight: 2.25,
            global_weight: 0.5,
            max_min_velocity: 0.04,
        }
    }
}

impl PsoParams {
    pub fn with_num_particles(mut self, n: usize) -> Self {
        self.num_particles = n;
        self
    }

    pub fn with_num_iters(mut self, n: usize) -> Self {
        self.num_iters = n;
        self
    }

    pub fn with_neigh_weight(mut self, w: f64) -> Self {
        self.neigh_weight = w;
        self
    }

    pub fn with_inertia_weight(mut self, w: f64) -> Self {
        self.inertia_weight = w;
        self
    }

    pub fn with_personal_weight(mut self, w: f64) -> Self {
        self.personal_weight = w;
        self
    }

    pub fn with_global_weight(mut self, w: f64) -> Self {
        self.global_weight = w;
        self
    }

    pub fn with_max_min_velocity(mut self, v: f64) -> Self {
        self.max_min_velocity = v;
        self
    }

    /// Ring radius used by default: one tenth of the swarm.
    pub fn neighborhood_radius(&self) -> usize {
        self.num_particles / 10
    }

    /// Validates the parameters.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.num_particles < 1 {
            return Err(ConfigError::TooSmall {
                field: "numParticles",
                min: 1,
                value: self.num_particles,
            });
        }
        for (field, value) in [
            ("neighWeight", self.neigh_weight),
            ("inertiaWeight", self.inertia_weight),
            ("personalWeight", self.personal_weight),
            ("globalWeight", self.global_weight),
            ("maxMinVelocity", self.max_min_velocity),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        if self.max_min_velocity < 0.0 {
            return Err(ConfigError::Negative {
                field: "maxMinVelocity",
                value: self.max_min_velocity,
            });
        }
        Ok(())
    }
}

/// PSO hyperparameters that a perturbation sweep can vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PsoField {
    NeighWeight,
    InertiaWeight,
    PersonalWeight,
    GlobalWeight,
    MaxMinVelocity,
}

const WEIGHT_STEP: f64 = 5.0;

impl ParameterSet for PsoParams {
    type Field = PsoField;

    const ENGINE: &'static str = "PSO";

    const SWEEPS: &'static [(&'static str, SweepMode<PsoField>)] = &[
        ("default", SweepMode::Default),
        (
            "budget",
            SweepMode::Budget {
                budget: 10_000,
                populations: [40, 50, 80, 100, 125, 200, 250, 400, 500, 1000],
            },
        ),
        (
            "neighWeight",
            SweepMode::Perturb {
                field: PsoField::NeighWeight,
                step: WEIGHT_STEP,
            },
        ),
        (
            "inertiaWeight",
            SweepMode::Perturb {
                field: PsoField::InertiaWeight,
                step: WEIGHT_STEP,
            },
        ),
        (
            "personalWeight",
            SweepMode::Perturb {
                field: PsoField::PersonalWeight,
                step: WEIGHT_STEP,
            },
        ),
        (
            "globalWeight",
            SweepMode::Perturb {
                field: PsoField::GlobalWeight,
                step: WEIGHT_STEP,
            },
        ),
        (
            "maxMinVelocity",
            SweepMode::Perturb {
                field: PsoField::MaxMinVelocity,
                step: WEIGHT_STEP,
            },
        ),
    ];

    fn population(&self) -> usize {
        self.num_particles
    }

    fn with_budget_split(self, population: usize, iterations: usize) -> Self {
        self.with_num_particles(population).with_num_iters(iterations)
    }

    fn with_field(self, field: PsoField, value: f64) -> Self {
        match field {
            PsoField::NeighWeight => self.with_neigh_weight(value),
            PsoField::InertiaWeight => self.with_inertia_weight(value),
            PsoField::PersonalWeight => self.with_personal_weight(value),
            PsoField::GlobalWeight => self.with_global_weight(value),
            PsoField::MaxMinVelocity => self.with_max_min_velocity(value),
        }
    }

    fn field(&self, field: PsoField) -> f64 {
        match field {
            PsoField::NeighWeight => self.neigh_weight,
            PsoField::InertiaWeight => self.inertia_weight,
            PsoField::PersonalWeight => self.personal_weight,
            PsoField::GlobalWeight => self.global_weight,
            PsoField::MaxMinVelocity => self.max_min_velocity,
        }
    }

    fn apply(&mut self, key: &str, value: &str) -> std::result::Result<(), ParamError> {
        match key {
            "numParticles" => self.num_particles = parse_usize(key, value)?,
            "numIters" => self.num_iters = parse_usize(key, value)?,
            "neighWeight" => self.neigh_weight = parse_f64(key, value)?,
            "inertiaWeight" => self.inertia_weight = parse_f64(key, value)?,
            "personalWeight" => self.personal_weight = parse_f64(key, value)?,
            "globalWeight" => self.global_weight = parse_f64(key, value)?,
            "maxMinVelocity" => self.max_min_velocity = parse_f64(key, value)?,
            _ => return Err(ParamError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    fn describe(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Number of Particles", self.num_particles.to_string()),
            ("Number of Iterations", self.num_iters.to_string()),
            ("Neighbourhood Weight", self.neigh_weight.to_string()),
            ("Inertia Weight", self.inertia_weight.to_string()),
            ("Personal Weight", self.personal_weight.to_string()),
            ("Global Weight", self.global_weight.to_string()),
            ("Velocity", self.max_min_velocity.to_string()),
        ]
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        PsoParams::validate(self)
    }

    fn run_once<O: Objective>(&self, objective: &O, seed: u64, parallel: bool) -> Result<f64> {
        let engine = PsoEngine::new(objective, *self)?.with_parallel(parallel);
        Ok(engine.run(seed)?.best_fitness)
    }
}
