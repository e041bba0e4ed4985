//! Benchmark harness for two population-based optimizers on the Rastrigin
//! function.
//!
//! - **Genetic Algorithm (GA)**: real-valued genomes with elitist
//!   survivors, tournament selection, single-point crossover and per-gene
//!   reset mutation. Alternate operators plug in through
//!   [`ga::Operators`].
//! - **Particle Swarm Optimization (PSO)**: velocity/position updates
//!   driven by personal, ring-neighborhood and swarm-wide bests.
//! - **Experiments**: named parameter sweeps, repeated seeded trials run
//!   on the rayon pool, and order-independent aggregation of their best
//!   fitness and run time.
//!
//! # Architecture
//!
//! Each engine takes an immutable parameter value and a seed, owns its
//! population for the duration of one run and returns a result carrying
//! the best solution and its convergence history. Nothing is shared
//! between runs, so repetitions of a parameter set are independent and
//! may run in parallel.
//!
//! The `ga-bench` and `pso-bench` binaries read an optional parameter
//! file (see [`param_file`]) and print one [`report`] block per
//! parameter set.

pub mod cli;
pub mod error;
pub mod experiment;
pub mod fitness;
pub mod ga;
pub mod param_file;
pub mod pso;
pub mod report;
