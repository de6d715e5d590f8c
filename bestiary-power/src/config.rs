//! Rebalance configuration
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::speed::SpeedTable;

/// Errors raised when the rebalance configuration is invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("speed table must hold {expected} entries (got {actual})")]
    SpeedTableLength { expected: usize, actual: usize },
    #[error("speed table entry for speed {speed} must be at least 1")]
    ZeroEnergy { speed: usize },
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options controlling a power evaluation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PowerConfig {
    /// Overwrite level, rarity and experience from the computed power.
    #[serde(default)]
    pub rebalance: bool,
    /// Replacement speed-to-energy table.
    #[serde(default)]
    pub speed_table: Option<Vec<u8>>,
    /// Write the diagnostic power dump after the run.
    #[serde(default)]
    pub dump: bool,
}

impl PowerConfig {
    /// Load configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the result fails
    /// validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if a custom speed table is malformed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.speed_table().map(|_| ())
    }

    /// Resolve the speed table, falling back to the built-in one.
    ///
    /// # Errors
    ///
    /// Returns an error if a custom speed table is malformed.
    pub fn speed_table(&self) -> Result<SpeedTable, ConfigError> {
        match &self.speed_table {
            Some(values) => SpeedTable::from_energy(values.clone()),
            None => Ok(SpeedTable::default()),
        }
    }

    #[must_use]
    pub fn with_rebalance(mut self, rebalance: bool) -> Self {
        self.rebalance = rebalance;
        self
    }
}
