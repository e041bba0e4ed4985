//! Genetic algorithm over real-valued vectors.
//!
//! Each generation keeps the best `num_survivors` individuals unchanged
//! (elitism) and fills the rest of the population with offspring of
//! tournament-selected parents, recombined by single-point crossover and
//! mutated gene by gene.
//!
//! # Key Types
//!
//! - [`GaParams`]: Hyperparameters (population size, survivors, rates)
//! - [`GaEngine`]: Validated engine that executes one run
//! - [`GaResult`]: Best individual and running-best history of a run
//! - [`Operators`]: Pluggable selection, crossover and mutation
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::{GaField, GaParams};
pub use operators::{Crossover, Mutation, Operators};
pub use runner::{GaEngine, GaResult};
pub use selection::{elite, Selection};
pub use types::Individual;
