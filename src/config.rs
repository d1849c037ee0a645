//! Run configuration loading.
//!
//! Settings are resolved with the following priority (highest to lowest):
//! 1. Command-line flags (applied by the binary)
//! 2. Environment variables (`BIGEAST_<KEY>`)
//! 3. `bigeast.toml`
//! 4. Built-in defaults
//!
//! ```text
//! method = "calibrated_rating_differential"
//! trials = 100000
//! seed = 7
//! registry = "teams/big_east_2025.toml"
//!
//! [params]
//! squeeze_factor = 0.75
//! ```
//!
//! Malformed values are errors and are never replaced by defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::constants::{DEFAULT_SEED, DEFAULT_TRIALS};
use crate::error::{ConfigError, Result};
use crate::registry::Registry;
use crate::win_prob::{ModelParams, PredictionMethod, Predictor};

/// Default config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "bigeast.toml";

pub const ENV_METHOD: &str = "BIGEAST_METHOD";
pub const ENV_TRIALS: &str = "BIGEAST_TRIALS";
pub const ENV_SEED: &str = "BIGEAST_SEED";
pub const ENV_REGISTRY: &str = "BIGEAST_REGISTRY";

/// Fully resolved settings for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub method: PredictionMethod,
    pub trials: usize,
    pub seed: u64,
    pub registry_path: Option<PathBuf>,
    pub params: ModelParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            method: PredictionMethod::CalibratedRatingDifferential,
            trials: DEFAULT_TRIALS,
            seed: DEFAULT_SEED,
            registry_path: None,
            params: ModelParams::default(),
        }
    }
}

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    method: Option<String>,
    trials: Option<usize>,
    seed: Option<u64>,
    registry: Option<PathBuf>,
    params: Option<ModelParams>,
}

impl SimulationConfig {
    /// Parse a TOML document on top of the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, Path::new("<inline>"))
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = SimulationConfig::default();
        if let Some(method) = file.method {
            config.method = method.parse()?;
        }
        if let Some(trials) = file.trials {
            config.trials = trials;
        }
        if let Some(seed) = file.seed {
            config.seed = seed;
        }
        if let Some(registry) = file.registry {
            // Relative registry paths are relative to the config file
            config.registry_path = Some(match path.parent() {
                Some(dir) if registry.is_relative() && !dir.as_os_str().is_empty() => {
                    dir.join(registry)
                }
                _ => registry,
            });
        }
        if let Some(params) = file.params {
            config.params = params;
        }
        Ok(config)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_METHOD) {
            self.method = v.parse()?;
        }
        if let Some(v) = lookup(ENV_TRIALS) {
            self.trials = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TRIALS,
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup(ENV_SEED) {
            self.seed = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_SEED,
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup(ENV_REGISTRY) {
            self.registry_path = Some(PathBuf::from(v));
        }
        Ok(self)
    }

    /// Fail fast on settings that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(ConfigError::ZeroTrials.into());
        }
        self.params.validate()?;
        Ok(())
    }

    pub fn predictor(&self) -> Result<Predictor> {
        Ok(Predictor::with_params(self.method, self.params)?)
    }

    /// The configured registry file, or the built-in Big East field.
    pub fn load_registry(&self) -> Result<Registry> {
        match &self.registry_path {
            Some(path) => Registry::load(path),
            None => Ok(Registry::big_east_2025()),
        }
    }
}

/// Resolve configuration from file and environment.
///
/// An explicit `path` must exist. Without one, `bigeast.toml` in the working
/// directory is used if present, otherwise the defaults. The result is not
/// validated; callers layer their own overrides on top and then call
/// [`SimulationConfig::validate`].
pub fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    let config = match path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            SimulationConfig::load_from_path(path)?
        }
        None => {
            let default_path = Path::new(CONFIG_FILE_NAME);
            if default_path.exists() {
                info!("Loading config from {}", default_path.display());
                SimulationConfig::load_from_path(default_path)?
            } else {
                debug!("No {} found, using built-in defaults", CONFIG_FILE_NAME);
                SimulationConfig::default()
            }
        }
    };

    config.apply_overrides(|key| std::env::var(key).ok())
}
