//! Genetic algorithm benchmark on the Rastrigin function.
//!
//! Usage: `ga-bench [PARAM_FILE]`

use clap::Parser;
use rastrigin_bench::cli::{self, Cli};
use rastrigin_bench::ga::GaParams;
use std::process::ExitCode;

fn main() -> ExitCode {
    cli::init_tracing();
    cli::run::<GaParams>(Cli::parse())
}
