//! Particle swarm optimization.
//!
//! Particles keep a position, a velocity and the best position they have
//! visited. Every iteration each velocity is pulled towards the particle's
//! own best, the best in its ring neighborhood, and the best in the whole
//! swarm, then clamped; positions follow and are clamped to the box.
//!
//! # Key Types
//!
//! - [`PsoParams`]: Hyperparameters (swarm size, weights, velocity bound)
//! - [`PsoEngine`]: Validated engine that executes one run
//! - [`Ring`]: 1-D neighborhood topology with wraparound
//!
//! # References
//!
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"
//! - Shi & Eberhart (1998), "A Modified Particle Swarm Optimizer"

mod config;
mod runner;
mod topology;
mod types;

pub use config::{PsoField, PsoParams};
pub use runner::{PsoEngine, PsoResult};
pub use topology::Ring;
pub use types::{Particle, Swarm};
