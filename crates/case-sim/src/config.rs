//! Engine configuration.

use case_econ::CurrencyBook;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Hard upper bound on until-best openings.
pub const DEFAULT_UNTIL_BEST_CAP: u64 = 500_000;

/// Engine configuration parameters.
///
/// A `currencies` section replaces the default book entirely, so a file that
/// wants to keep "diamonds" must list it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for reproducible runs; OS entropy when absent.
    pub rng_seed: Option<u64>,
    /// Safety cap for the until-best hunt (> 0).
    pub until_best_cap: u64,
    /// Tier tables for tiered currencies.
    pub currencies: CurrencyBook,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            until_best_cap: DEFAULT_UNTIL_BEST_CAP,
            currencies: CurrencyBook::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("until_best_cap must be > 0")]
    ZeroCap,
}

impl EngineConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.until_best_cap == 0 {
            return Err(ConfigError::ZeroCap);
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Random source for one engine call: seeded when configured.
    pub fn rng(&self) -> ChaCha8Rng {
        match self.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}
