//! Command-line entry shared by `ga-bench` and `pso-bench`.

use crate::experiment::{sweep_mode, Experiment, ParameterSet, SweepMode};
use crate::fitness::Rastrigin;
use crate::param_file::{self, HarnessSettings};
use crate::report;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about = "Benchmark a metaheuristic on the 10-dimensional Rastrigin function")]
pub struct Cli {
    /// Parameter file with `key=value` lines. Built-in defaults are used
    /// for every key it does not set.
    pub param_file: Option<PathBuf>,
}

/// Installs the global subscriber: `info` by default, `RUST_LOG` overrides,
/// output on stderr so reports on stdout stay clean.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Resolves the sweep named in the harness settings, with its step and
/// budget overrides applied. Falls back to the defaults-only sweep.
pub fn resolve_sweep<P: ParameterSet>(harness: &HarnessSettings) -> SweepMode<P::Field> {
    let name = harness.sweep.as_deref().unwrap_or("default");
    let mut mode = sweep_mode::<P>(name).unwrap_or(SweepMode::Default);
    if let Some(step) = harness.step {
        mode = mode.with_step(step);
    }
    if let Some(budget) = harness.budget {
        mode = mode.with_budget(budget);
    }
    mode
}

/// Loads parameters, runs the sweep and prints one report block per
/// parameter set as it completes.
pub fn run<P: ParameterSet + Default>(cli: Cli) -> ExitCode {
    let file = match cli.param_file {
        Some(ref path) => param_file::load::<P>(path),
        None => {
            info!("no parameter file given, using defaults");
            param_file::ParamFile::default()
        }
    };

    let mode = resolve_sweep::<P>(&file.harness);
    let sets = mode.generate(&file.params);
    let trials = file.harness.trial_config();
    let objective = Rastrigin::default();

    let experiment = match Experiment::new(&objective, sets, trials) {
        Ok(experiment) => experiment,
        Err(e) => {
            error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    }) {
        warn!("cannot install Ctrl-C handler: {e}");
    }
    let experiment = experiment.with_cancel(cancel);

    match experiment.run(|result| print!("{}", report::render(result))) {
        Ok(outcome) => {
            if outcome.cancelled {
                warn!(
                    completed = outcome.results.len(),
                    "interrupted, remaining parameter sets skipped"
                );
            }
            info!(seed = outcome.seed, "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{GaField, GaParams};
    use crate::pso::PsoParams;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_path_only() {
        let cli = Cli::try_parse_from(["ga-bench", "params.txt"]).unwrap();
        assert_eq!(cli.param_file, Some(PathBuf::from("params.txt")));
        assert!(Cli::try_parse_from(["ga-bench"]).unwrap().param_file.is_none());
        assert!(Cli::try_parse_from(["ga-bench", "--sweep", "budget"]).is_err());
        assert!(Cli::try_parse_from(["ga-bench", "a", "b"]).is_err());
    }

    #[test]
    fn test_resolve_default_sweep() {
        let mode = resolve_sweep::<PsoParams>(&HarnessSettings::default());
        assert_eq!(mode, SweepMode::Default);
    }

    #[test]
    fn test_resolve_sweep_with_overrides() {
        let harness = HarnessSettings {
            sweep: Some("crossover".to_string()),
            step: Some(0.05),
            budget: Some(10),
            ..HarnessSettings::default()
        };
        assert_eq!(
            resolve_sweep::<GaParams>(&harness),
            SweepMode::Perturb {
                field: GaField::ProbCrossover,
                step: 0.05
            }
        );

        let harness = HarnessSettings {
            sweep: Some("budget".to_string()),
            budget: Some(20_000),
            ..HarnessSettings::default()
        };
        match resolve_sweep::<GaParams>(&harness) {
            SweepMode::Budget { budget, .. } => assert_eq!(budget, 20_000),
            other => panic!("unexpected mode {other:?}"),
        }
    }
}
