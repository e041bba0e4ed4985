//! Key/value parameter files.
//!
//! One `key=value` (or `key: value`) pair per line; blank lines and lines
//! starting with `#` or `!` are ignored. Engine keys are forwarded to
//! [`ParameterSet::apply`]; the harness keys `sweep`, `step`, `budget`,
//! `repetitions`, `seed`, `parallel` and `parallelEvaluation` configure
//! the experiment.
//!
//! Nothing in a parameter file is fatal. A missing file, a malformed line,
//! a bad value or an unknown key becomes a diagnostic and the affected
//! setting keeps its default.
//!
//! ```
//! use rastrigin_bench::ga::GaParams;
//! use rastrigin_bench::param_file;
//!
//! let file = param_file::parse::<GaParams>("popSize=200\nsweep=mutation\nnumIters=oops\n");
//! assert_eq!(file.params.pop_size, 200);
//! assert_eq!(file.params.num_iters, 100);
//! assert_eq!(file.harness.sweep.as_deref(), Some("mutation"));
//! assert_eq!(file.diagnostics.len(), 1);
//! ```

use crate::error::ParamError;
use crate::experiment::{sweep_mode, sweep_names, ParameterSet, TrialConfig};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Experiment settings read from a parameter file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarnessSettings {
    /// Name of the sweep mode to run.
    pub sweep: Option<String>,
    /// Step override for perturbation sweeps.
    pub step: Option<f64>,
    /// Evaluation budget override for budget sweeps.
    pub budget: Option<usize>,
    pub repetitions: Option<usize>,
    pub seed: Option<u64>,
    /// Run repetitions on the rayon pool.
    pub parallel: Option<bool>,
    /// Evaluate each generation or swarm step on the rayon pool.
    pub parallel_evaluation: Option<bool>,
}

impl HarnessSettings {
    /// Trial configuration with these settings applied over the defaults.
    pub fn trial_config(&self) -> TrialConfig {
        let mut config = TrialConfig::default();
        if let Some(n) = self.repetitions {
            config = config.with_repetitions(n);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(parallel) = self.parallel {
            config = config.with_parallel_trials(parallel);
        }
        if let Some(parallel) = self.parallel_evaluation {
            config = config.with_parallel_evaluation(parallel);
        }
        config
    }
}

/// Result of reading a parameter file.
#[derive(Debug)]
pub struct ParamFile<P> {
    /// Defaults with every valid engine key applied.
    pub params: P,
    pub harness: HarnessSettings,
    /// Every problem found, in file order.
    pub diagnostics: Vec<ParamError>,
}

impl<P: ParameterSet + Default> Default for ParamFile<P> {
    fn default() -> Self {
        Self {
            params: P::default(),
            harness: HarnessSettings::default(),
            diagnostics: Vec::new(),
        }
    }
}

/// Reads the parameter file at `path`.
///
/// Never fails: problems are logged at `warn` level and collected in
/// [`ParamFile::diagnostics`].
pub fn load<P: ParameterSet + Default>(path: &Path) -> ParamFile<P> {
    let file = match fs::read_to_string(path) {
        Ok(text) => parse(&text),
        Err(e) => ParamFile {
            diagnostics: vec![ParamError::Io(e)],
            ..ParamFile::default()
        },
    };

    for diagnostic in &file.diagnostics {
        warn!(path = %path.display(), "{diagnostic}; keeping default");
    }
    debug!(engine = P::ENGINE, params = ?file.params, harness = ?file.harness, "parameters loaded");
    file
}

/// Parses parameter-file text. Later occurrences of a key win.
pub fn parse<P: ParameterSet + Default>(text: &str) -> ParamFile<P> {
    let mut file = ParamFile::<P>::default();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let Some((key, value)) = split_entry(line) else {
            file.diagnostics.push(ParamError::MalformedLine {
                line: index + 1,
                text: line.to_string(),
            });
            continue;
        };

        let applied = match key {
            "sweep" => parse_sweep::<P>(value).map(|s| file.harness.sweep = Some(s)),
            "step" => parse_f64(key, value).map(|v| file.harness.step = Some(v)),
            "budget" => parse_usize(key, value).map(|v| file.harness.budget = Some(v)),
            "repetitions" => parse_usize(key, value).map(|v| file.harness.repetitions = Some(v)),
            "seed" => parse_number(key, value).map(|v| file.harness.seed = Some(v)),
            "parallel" => parse_bool(key, value).map(|v| file.harness.parallel = Some(v)),
            "parallelEvaluation" => {
                parse_bool(key, value).map(|v| file.harness.parallel_evaluation = Some(v))
            }
            _ => file.params.apply(key, value),
        };
        if let Err(e) = applied {
            file.diagnostics.push(e);
        }
    }

    file
}

/// Splits at the first `=` or `:`. Returns `None` when there is no
/// separator or the key is empty.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let at = line.find(['=', ':'])?;
    let key = line[..at].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, line[at + 1..].trim()))
}

fn parse_sweep<P: ParameterSet>(value: &str) -> Result<String, ParamError> {
    let name = value.trim();
    if sweep_mode::<P>(name).is_some() {
        Ok(name.to_string())
    } else {
        Err(ParamError::InvalidValue {
            key: "sweep".to_string(),
            value: value.to_string(),
            reason: format!("expected one of {}", sweep_names::<P>().join(", ")),
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ParamError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParamError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

fn parse_number<T>(key: &str, value: &str) -> Result<T, ParamError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ParamError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

pub(crate) fn parse_usize(key: &str, value: &str) -> Result<usize, ParamError> {
    parse_number(key, value)
}

pub(crate) fn parse_f64(key: &str, value: &str) -> Result<f64, ParamError> {
    parse_number(key, value)
}
