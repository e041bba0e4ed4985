//! Particle swarm benchmark on the Rastrigin function.
//!
//! Usage: `pso-bench [PARAM_FILE]`

use clap::Parser;
use rastrigin_bench::cli::{self, Cli};
use rastrigin_bench::pso::PsoParams;
use std::process::ExitCode;

fn main() -> ExitCode {
    cli::init_tracing();
    cli::run::<PsoParams>(Cli::parse())
}
