//! Per-depth population totals used as normalization divisors.
use serde::{Deserialize, Serialize};

use crate::constants::{
    AVERAGE_SCALE, MAX_DEPTH, OVERFLOW_DEPTHS, OVERFLOW_DIVISOR, POPULATION_BASE,
    POPULATION_FRIEND, POPULATION_FRIENDS,
};
use crate::flags::RaceFlag;
use crate::numbers::{depth_index, scale};
use crate::race::MonsterRace;

/// Totals for a single depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepthBucket {
    pub depth: usize,
    pub total_hp: i64,
    pub total_dam: i64,
    pub count: i64,
}

impl DepthBucket {
    /// Average hit points per weighted monster, `None` when the bucket is empty.
    #[must_use]
    pub fn average_hp(&self) -> Option<i64> {
        self.average(self.total_hp)
    }

    /// Average damage per weighted monster, `None` when the bucket is empty.
    #[must_use]
    pub fn average_dam(&self) -> Option<i64> {
        self.average(self.total_dam)
    }

    fn average(&self, total: i64) -> Option<i64> {
        if self.count == 0 || self.total_hp == 0 || self.total_dam == 0 {
            return None;
        }
        Some(total.saturating_mul(AVERAGE_SCALE) / self.count)
    }
}

/// Running totals of hit points, damage and weighted population for every
/// depth. A monster contributes to its own depth and every deeper one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthAggregates {
    buckets: Vec<DepthBucket>,
}

impl Default for DepthAggregates {
    fn default() -> Self {
        Self::new()
    }
}

impl DepthAggregates {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: (0..MAX_DEPTH)
                .map(|depth| DepthBucket {
                    depth,
                    ..DepthBucket::default()
                })
                .collect(),
        }
    }

    /// Zero every bucket.
    pub fn reset(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = DepthBucket {
                depth: bucket.depth,
                ..DepthBucket::default()
            };
        }
    }

    #[must_use]
    pub fn bucket(&self, depth: usize) -> DepthBucket {
        self.buckets
            .get(depth.min(MAX_DEPTH - 1))
            .copied()
            .unwrap_or_default()
    }

    /// Bucket covering a race's current level.
    #[must_use]
    pub fn bucket_for(&self, race: &MonsterRace) -> DepthBucket {
        self.bucket(depth_index(race.level))
    }

    pub fn buckets(&self) -> impl Iterator<Item = &DepthBucket> {
        self.buckets.iter()
    }

    /// True when no monster has contributed to any depth.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|bucket| bucket.count == 0)
    }

    /// Add one race's halved hit points and damage to its depth and every
    /// deeper one. Level-0, unique and hand-placed races are skipped.
    ///
    /// `energy` is the race's speed energy, used to weight multipliers.
    pub fn accumulate(&mut self, race: &MonsterRace, hp: i64, dam: i64, energy: i64) {
        if race.level == 0 || !race.spawns_naturally() {
            return;
        }
        let rarity = i64::from(race.rarity);
        let weight = population_weight(race, energy);
        let mut hp = hp;
        let mut dam = dam;

        for bucket in self.buckets.iter_mut().skip(depth_index(race.level)) {
            if OVERFLOW_DEPTHS.contains(&bucket.depth) && usize::from(race.level) < bucket.depth {
                hp /= OVERFLOW_DIVISOR;
                dam /= OVERFLOW_DIVISOR;
            }

            // Very rare monsters count less towards the level's totals, and
            // the reduction carries into every deeper level
            let count = if rarity > weight {
                hp = scale(hp, weight, rarity);
                dam = scale(dam, weight, rarity);
                rarity
            } else {
                weight
            };

            bucket.total_hp = bucket.total_hp.saturating_add(hp);
            bucket.total_dam = bucket.total_dam.saturating_add(dam);
            bucket.count += count / rarity;
        }
    }
}

/// Population weight: groups and multipliers stand in for several monsters.
#[must_use]
pub fn population_weight(race: &MonsterRace, energy: i64) -> i64 {
    let base = if race.has_flag(RaceFlag::Friend) {
        POPULATION_FRIEND
    } else if race.has_flag(RaceFlag::Friends) {
        POPULATION_FRIENDS
    } else {
        POPULATION_BASE
    };

    if !race.has_flag(RaceFlag::Multiply) {
        return base;
    }
    let spread = if race.flags.has_any(&RaceFlag::WALL_BYPASS) {
        energy
    } else if race.flags.has_any(&RaceFlag::DOOR_BYPASS) {
        energy * 3 / 2
    } else {
        energy / 2
    };
    spread.max(1) * base
}
