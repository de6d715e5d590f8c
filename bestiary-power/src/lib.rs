//! Bestiary Power
//!
//! Platform-agnostic monster power evaluation. Estimates each template's
//! worst-case damage and effective hit points, normalizes the resulting power
//! against per-depth population averages, and optionally rebalances level,
//! experience and rarity from the result. This crate performs no filesystem
//! or terminal access.

pub mod config;
pub mod constants;
pub mod damage;
pub mod data;
pub mod depth;
pub mod dump;
pub mod flags;
pub mod normalize;
pub mod numbers;
pub mod race;
pub mod speed;
pub mod spells;
pub mod toughness;

// Re-export commonly used types
pub use config::{ConfigError, PowerConfig};
pub use damage::{DamageEstimate, DamageEstimator};
pub use data::{BestiaryData, BestiaryError};
pub use depth::{DepthAggregates, DepthBucket, population_weight};
pub use dump::{POWER_DUMP_HEADER, write_power_dump};
pub use flags::{FlagSet, RaceFlag, RaceFlags, SpellFlag, SpellFlags};
pub use normalize::{
    PassSummary, PowerError, PowerNormalizer, PowerOutcome, derive_level, derive_rarity,
    experience_for, raw_power,
};
pub use race::{Blow, BlowEffect, BlowMethod, BlowSet, DerivedStats, Dice, MonsterRace};
pub use speed::SpeedTable;
pub use spells::spell_danger;
pub use toughness::{estimate_effective_hp, hide_bonus, resist_score};

/// Trait for abstracting bestiary loading.
/// Platform-specific implementations should provide this
pub trait BestiaryLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the monster template table
    ///
    /// # Errors
    ///
    /// Returns an error if the bestiary cannot be loaded.
    fn load_bestiary(&self) -> Result<BestiaryData, Self::Error>;

    /// Load the evaluation configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config(&self) -> Result<PowerConfig, Self::Error>;
}

/// A normalized bestiary together with the settings and summary of the run.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub bestiary: BestiaryData,
    pub config: PowerConfig,
    pub outcome: PowerOutcome,
}

/// Ties a loader to the power normalizer.
pub struct PowerEngine<L>
where
    L: BestiaryLoader,
{
    loader: L,
}

impl<L> PowerEngine<L>
where
    L: BestiaryLoader,
{
    pub const fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Load the bestiary and configuration, then normalize.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails, the configuration is invalid, or
    /// the normalizer cannot allocate its scratch storage.
    pub fn evaluate(&self) -> Result<Evaluation, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let config = self.loader.load_config().map_err(Into::into)?;
        self.evaluate_with(config)
    }

    /// Load the bestiary and normalize it with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails, the configuration is invalid, or
    /// the normalizer cannot allocate its scratch storage.
    pub fn evaluate_with(&self, config: PowerConfig) -> Result<Evaluation, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let mut bestiary = self.loader.load_bestiary().map_err(Into::into)?;
        let normalizer = PowerNormalizer::from_config(&config)?;
        log::info!(
            "normalizing {} templates (rebalance: {})",
            bestiary.len(),
            normalizer.rebalance()
        );
        let outcome = normalizer.run(&mut bestiary.races)?;
        Ok(Evaluation {
            bestiary,
            config,
            outcome,
        })
    }
}
