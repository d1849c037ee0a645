use std::path::PathBuf;

use thiserror::Error;

/// Problems with the team field handed to the engine.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry contains no teams")]
    Empty,

    #[error("bracket needs exactly {expected} teams, found {found}")]
    WrongSize { expected: usize, found: usize },

    #[error("team name {0:?} appears more than once")]
    DuplicateName(String),

    #[error("team {name:?} has seed {seed}, outside 1..={max}")]
    BadSeed { name: String, seed: u32, max: usize },

    #[error("seed {0} is assigned to more than one team")]
    DuplicateSeed(u32),

    #[error("both {0:?} and {1:?} claim home court")]
    MultipleHosts(String, String),

    #[error("team {name:?} has a non-finite rating")]
    BadRating { name: String },
}

/// Invalid run settings. Raised before any trial is simulated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "unknown prediction method {0:?} (expected rating_differential, record_based or calibrated_rating_differential)"
    )]
    UnknownMethod(String),

    #[error("trial count must be a positive integer")]
    ZeroTrials,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid model parameter {name} = {value}")]
    InvalidParam { name: &'static str, value: f64 },
}

/// Top-level error for engine entry points.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, SimError>;
