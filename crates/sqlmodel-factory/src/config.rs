//! Seeding run configuration.
//!
//! # Environment Variables
//!
//! - `SQLMODEL_SEED_DETERMINISTIC=1` - Associate every available key instead
//!   of a random count (for reproducible test suites)
//! - `SQLMODEL_SEED=<u64>` - Fixed seed for the random generator

use crate::error::{ConfigError, Error, Result};
use crate::random::StdSeedRng;
use std::env;

/// Environment variable toggling deterministic mode.
pub const DETERMINISTIC_ENV: &str = "SQLMODEL_SEED_DETERMINISTIC";

/// Environment variable holding a fixed generator seed.
pub const SEED_ENV: &str = "SQLMODEL_SEED";

/// The parent builder as seen by pivot population.
pub trait ParentBuilder {
    /// Randomized decisions are replaced by maximal values when true.
    fn is_deterministic(&self) -> bool;
}

/// Options for one seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedConfig {
    /// Replace random fan-out with the full available count
    pub deterministic: bool,
    /// Fixed generator seed (entropy when unset)
    pub seed: Option<u64>,
}

impl SeedConfig {
    /// Create a configuration with defaults (random mode, entropy seed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from `SQLMODEL_SEED_DETERMINISTIC` and `SQLMODEL_SEED`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(DETERMINISTIC_ENV) {
            config.deterministic = parse_flag(DETERMINISTIC_ENV, &raw)?;
        }
        if let Some(raw) = lookup(SEED_ENV) {
            let seed = raw.trim().parse::<u64>().map_err(|e| {
                Error::Config(ConfigError {
                    message: format!("{SEED_ENV} must be an unsigned integer, got '{raw}'"),
                    source: Some(Box::new(e)),
                })
            })?;
            config.seed = Some(seed);
        }
        tracing::debug!(
            deterministic = config.deterministic,
            seed = ?config.seed,
            "Loaded seed configuration"
        );
        Ok(config)
    }

    /// Set deterministic mode.
    #[must_use]
    pub fn deterministic(mut self, enabled: bool) -> Self {
        self.deterministic = enabled;
        self
    }

    /// Set a fixed generator seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the random generator for this run.
    pub fn rng(&self) -> StdSeedRng {
        match self.seed {
            Some(seed) => StdSeedRng::seeded(seed),
            None => StdSeedRng::from_entropy(),
        }
    }
}

impl ParentBuilder for SeedConfig {
    fn is_deterministic(&self) -> bool {
        self.deterministic
    }
}

impl<B: ParentBuilder + ?Sized> ParentBuilder for &B {
    fn is_deterministic(&self) -> bool {
        (**self).is_deterministic()
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(Error::Config(ConfigError {
            message: format!("{key} must be a boolean flag, got '{raw}'"),
            source: None,
        })),
    }
}
