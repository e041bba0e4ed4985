//! Error types for the benchmark harness.

use thiserror::Error;

/// An engine or harness configuration that cannot produce a meaningful run.
///
/// Returned by the engine constructors and [`TrialConfig::validate`]
/// before any random draw is made.
///
/// [`TrialConfig::validate`]: crate::experiment::TrialConfig::validate
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        min: usize,
        value: usize,
    },

    #[error("numSurvivors ({survivors}) must be smaller than popSize ({population})")]
    SurvivorsFillPopulation { survivors: usize, population: usize },

    #[error(
        "tournamentSize ({tournament}) exceeds the {offspring} offspring slots left after survivor selection"
    )]
    TournamentTooLarge { tournament: usize, offspring: usize },

    #[error("{field} must be a probability in [0, 1], got {value}")]
    NotProbability { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("search bound must be positive and finite, got {0}")]
    InvalidBound(f64),
}

/// Problems found while reading a parameter file.
///
/// None of these are fatal: the loader logs them and keeps the defaults.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("cannot read parameter file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected `key=value`, got `{text}`")]
    MalformedLine { line: usize, text: String },

    #[error("invalid value `{value}` for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown parameter {0}")]
    UnknownKey(String),
}

/// Top-level error for engine runs and experiments.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{engine} produced a non-finite fitness ({value}); check the configuration")]
    NonFinite { engine: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, BenchError>;
