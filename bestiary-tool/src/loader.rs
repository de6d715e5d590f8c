use std::fs;
use std::path::{Path, PathBuf};

use bestiary_power::{BestiaryData, BestiaryError, BestiaryLoader, ConfigError, PowerConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Bestiary {
        path: PathBuf,
        #[source]
        source: BestiaryError,
    },
    #[error("{}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

/// Loads the monster table and optional configuration from JSON files.
#[derive(Debug, Clone)]
pub struct JsonFileLoader {
    bestiary_path: PathBuf,
    config_path: Option<PathBuf>,
}

impl JsonFileLoader {
    pub const fn new(bestiary_path: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self {
            bestiary_path,
            config_path,
        }
    }
}

fn read(path: &Path) -> Result<String, LoaderError> {
    fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl BestiaryLoader for JsonFileLoader {
    type Error = LoaderError;

    fn load_bestiary(&self) -> Result<BestiaryData, Self::Error> {
        let json = read(&self.bestiary_path)?;
        let data = BestiaryData::from_json(&json).map_err(|source| LoaderError::Bestiary {
            path: self.bestiary_path.clone(),
            source,
        })?;
        log::debug!(
            "loaded {} templates from {}",
            data.len(),
            self.bestiary_path.display()
        );
        Ok(data)
    }

    fn load_config(&self) -> Result<PowerConfig, Self::Error> {
        let Some(path) = &self.config_path else {
            return Ok(PowerConfig::default());
        };
        let json = read(path)?;
        PowerConfig::from_json(&json).map_err(|source| LoaderError::Config {
            path: path.clone(),
            source,
        })
    }
}
