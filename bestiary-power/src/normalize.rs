//! Three-pass power normalization against per-depth population averages.
//!
//! Each pass has two strictly ordered phases. The first estimates damage and
//! toughness for every template, optionally re-derives level and experience,
//! and accumulates the per-depth totals. The second divides every template's
//! raw power by the averages at its depth and optionally re-derives rarity.
//! No aggregate is read until every template has been accumulated.
use std::collections::TryReserveError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, PowerConfig};
use crate::constants::{
    EXPERIENCE_DIVISOR, EXPERIENCE_OVERFLOW_HP, MAX_DERIVED_LEVEL, NORMALIZATION_PASSES,
};
use crate::damage::DamageEstimator;
use crate::depth::DepthAggregates;
use crate::flags::RaceFlag;
use crate::numbers::{divide_if_positive, round_two_figures, saturate_u8, scale};
use crate::race::MonsterRace;
use crate::speed::SpeedTable;
use crate::toughness::estimate_effective_hp;

/// Fatal normalization failures.
#[derive(Debug, Error)]
pub enum PowerError {
    #[error("could not reserve power storage for {records} records")]
    Allocation {
        records: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Changes made during one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PassSummary {
    /// One-based pass number.
    pub pass: usize,
    pub levels_changed: usize,
    pub rarities_changed: usize,
    /// Templates whose depth had no population to normalize against.
    pub unpopulated: usize,
}

/// Result of a full normalization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerOutcome {
    /// Sum of every template's final scaled power.
    pub total_power: i64,
    pub passes: Vec<PassSummary>,
    /// Per-depth totals from the final pass.
    pub aggregates: DepthAggregates,
}

/// Runs the fixed three-pass normalization over a template table.
#[derive(Debug, Clone, Default)]
pub struct PowerNormalizer {
    speed: SpeedTable,
    rebalance: bool,
}

impl PowerNormalizer {
    #[must_use]
    pub const fn new(speed: SpeedTable, rebalance: bool) -> Self {
        Self { speed, rebalance }
    }

    /// Build a normalizer from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured speed table is malformed.
    pub fn from_config(config: &PowerConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.speed_table()?, config.rebalance))
    }

    #[must_use]
    pub const fn rebalance(&self) -> bool {
        self.rebalance
    }

    #[must_use]
    pub const fn speed_table(&self) -> &SpeedTable {
        &self.speed
    }

    /// Evaluate and normalize every template in place.
    ///
    /// With rebalancing off only the derived statistics change; level,
    /// rarity and experience are left exactly as supplied (apart from
    /// level-0 templates, whose experience is always 0).
    ///
    /// # Errors
    ///
    /// Returns [`PowerError::Allocation`] if scratch storage for the raw
    /// power scores cannot be reserved. No template is touched in that case.
    pub fn run(&self, races: &mut [MonsterRace]) -> Result<PowerOutcome, PowerError> {
        let mut power = Vec::new();
        power
            .try_reserve_exact(races.len())
            .map_err(|source| PowerError::Allocation {
                records: races.len(),
                source,
            })?;
        power.resize(races.len(), 0_i64);

        let mut aggregates = DepthAggregates::new();
        let mut passes = Vec::with_capacity(NORMALIZATION_PASSES);
        for pass in 1..=NORMALIZATION_PASSES {
            let summary = self.run_pass(pass, races, &mut power, &mut aggregates);
            log::info!(
                "pass {}: {} levels changed, {} rarities changed, {} unpopulated",
                summary.pass,
                summary.levels_changed,
                summary.rarities_changed,
                summary.unpopulated
            );
            passes.push(summary);
        }

        let total_power = races
            .iter()
            .map(|race| race.derived.scaled_power)
            .fold(0_i64, i64::saturating_add);
        log::info!(
            "evaluated {} templates, total scaled power {total_power}",
            races.len()
        );

        Ok(PowerOutcome {
            total_power,
            passes,
            aggregates,
        })
    }

    fn run_pass(
        &self,
        pass: usize,
        races: &mut [MonsterRace],
        power: &mut [i64],
        aggregates: &mut DepthAggregates,
    ) -> PassSummary {
        let mut summary = PassSummary {
            pass,
            ..PassSummary::default()
        };
        aggregates.reset();

        let estimator = DamageEstimator::new(&self.speed);
        for (race, raw) in races.iter_mut().zip(power.iter_mut()) {
            let dam = estimator.estimate_max_damage(race).damage;
            let hp = estimate_effective_hp(race);

            if race.level == 0 {
                race.experience = 0;
            } else if self.rebalance {
                let level = if race.is_unique() {
                    race.level
                } else {
                    derive_level(hp, dam, race.derived.highest_threat)
                };
                if level != race.level {
                    summary.levels_changed += 1;
                    race.level = level;
                }
                race.experience = experience_for(hp, dam, level);
            }

            let stored_hp = (hp / 2).max(1);
            race.derived.hp = stored_hp;

            let energy = self.speed.energy_for(race);
            *raw = raw_power(race, stored_hp, dam, energy);
            aggregates.accumulate(race, stored_hp, dam, energy);

            log::debug!(
                "pass {pass} #{} {}: level {} hp {stored_hp} dam {dam} threat {} power {}",
                race.index,
                race.name,
                race.level,
                race.derived.highest_threat,
                *raw
            );
        }

        for (race, raw) in races.iter_mut().zip(power.iter()) {
            let bucket = aggregates.bucket_for(race);
            let average_hp = bucket.average_hp();
            let average_dam = bucket.average_dam();

            race.derived.power = (*raw).max(1);
            race.derived.scaled_power =
                divide_if_positive(divide_if_positive(*raw, average_hp), average_dam).max(1);

            if average_hp.is_none() {
                if race.level > 0 {
                    summary.unpopulated += 1;
                }
                continue;
            }

            if self.rebalance && race.level > 0 && race.rarity > 0 {
                let rarity = derive_rarity(race.derived.scaled_power);
                if rarity != race.rarity {
                    summary.rarities_changed += 1;
                    race.rarity = rarity;
                }
            }
        }

        if summary.unpopulated > 0 {
            log::warn!(
                "pass {pass}: {} templates sit at depths with no population",
                summary.unpopulated
            );
        }
        summary
    }
}

/// Raw power from halved hit points and damage, adjusted for groups,
/// escorts and breeding.
#[must_use]
pub fn raw_power(race: &MonsterRace, hp: i64, dam: i64, energy: i64) -> i64 {
    let mut power = hp.saturating_mul(dam);

    // Average in-level group size is 5
    if !race.is_unique() {
        if race.has_flag(RaceFlag::Friend) {
            power = power.saturating_mul(2);
        } else if race.has_flag(RaceFlag::Friends) {
            power = power.saturating_mul(5);
        }
    }

    if race.has_flag(RaceFlag::Escorts) {
        power = power.saturating_mul(3);
    } else if race.has_flag(RaceFlag::Escort) {
        power = power.saturating_mul(2);
    }

    // Fast breeders that get through walls or doors are much worse
    if race.has_flag(RaceFlag::Multiply) {
        let boosted = if race.flags.has_any(&RaceFlag::WALL_BYPASS) {
            power.saturating_mul(energy)
        } else if race.flags.has_any(&RaceFlag::DOOR_BYPASS) {
            scale(power, energy.saturating_mul(3), 2)
        } else {
            scale(power, energy, 2)
        };
        power = power.max(boosted);
    }

    power
}

/// Candidate depth for a non-unique template.
#[must_use]
pub fn derive_level(hp: i64, dam: i64, threat: i64) -> u8 {
    let steps = level_steps(scale(hp, dam, EXPERIENCE_DIVISOR), threat);
    log::trace!("level derivation: hp {hp} dam {dam} threat {threat} -> {steps} steps");
    band_level(steps)
}

/// Step count of the `j * j` subtraction curve over experience and threat.
#[must_use]
pub fn level_steps(mut mexp: i64, mut threat: i64) -> i64 {
    let mut j: i64 = 1;
    while mexp > j + 4 || threat > j + 5 {
        mexp = mexp.saturating_sub(j.saturating_mul(j));
        threat = threat.saturating_sub(j + 4);
        j += 1;
    }
    j
}

/// Compress large step counts into the deep level bands.
#[must_use]
pub fn band_level(steps: i64) -> u8 {
    let level = if steps > 250 {
        90 + (steps - 250) / 20
    } else if steps > 130 {
        70 + (steps - 130) / 6
    } else if steps > 40 {
        40 + (steps - 40) / 3
    } else {
        steps
    };
    saturate_u8(level.min(MAX_DERIVED_LEVEL))
}

/// Rarity from normalized power using the same subtraction curve.
#[must_use]
pub fn derive_rarity(power: i64) -> u8 {
    let mut remaining = power;
    let mut j: i64 = 1;
    while remaining > j {
        remaining = remaining.saturating_sub(j.saturating_mul(j));
        j += 1;
    }
    saturate_u8(j)
}

/// Experience award for a template at `level`, rounded to two significant
/// figures and never below 1.
#[must_use]
pub fn experience_for(hp: i64, dam: i64, level: u8) -> i64 {
    let level = i64::from(level).max(1);
    let raw = if hp > EXPERIENCE_OVERFLOW_HP {
        (hp / EXPERIENCE_DIVISOR).saturating_mul(dam / level)
    } else {
        scale(hp, dam, level * EXPERIENCE_DIVISOR)
    };
    round_two_figures(raw).max(1)
}
