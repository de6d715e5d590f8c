//! Maximum damage a monster can deal over a ten-round window.
use serde::{Deserialize, Serialize};

use crate::constants::{
    ACCURACY_BASE, ACCURACY_CAP, ACCURACY_PER_LEVEL, CONTACT_FLAT_WEIGHT, CONTACT_SPEED_DIVISOR,
    DAMAGE_ROUNDS, RANDOM_MOVE_CONNECT_DIVISOR, SPELL_FREQ_FLOOR, SPELL_SAVE_BASE,
    STATIONARY_INVISIBLE_DIVISOR, STATIONARY_MELEE_DIVISOR,
};
use crate::flags::{RaceFlag, SpellFlag};
use crate::numbers::scale;
use crate::race::MonsterRace;
use crate::speed::SpeedTable;
use crate::spells::spell_danger;

/// Result of a damage estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DamageEstimate {
    /// Combined damage after speed scaling; never below 1.
    pub damage: i64,
    /// Combined damage before speed scaling, adjusted for grouping and
    /// multiplication.
    pub threat: i64,
    pub melee: i64,
    pub spell: i64,
}

/// Estimates worst-case damage output using a shared speed table.
#[derive(Debug, Clone, Copy)]
pub struct DamageEstimator<'a> {
    speed: &'a SpeedTable,
}

impl<'a> DamageEstimator<'a> {
    #[must_use]
    pub const fn new(speed: &'a SpeedTable) -> Self {
        Self { speed }
    }

    /// Estimate damage and record the melee, spell and threat figures on the
    /// race.
    pub fn estimate_max_damage(&self, race: &mut MonsterRace) -> DamageEstimate {
        let estimate = self.estimate(race);
        race.derived.melee_dam = estimate.melee;
        race.derived.spell_dam = estimate.spell;
        race.derived.highest_threat = estimate.threat;
        estimate
    }

    /// Estimate damage without touching the race.
    #[must_use]
    pub fn estimate(&self, race: &MonsterRace) -> DamageEstimate {
        let energy = self.speed.energy_for(race);
        let spell = spell_window(race);
        let melee = melee_window(race, energy);

        let combined = spell.saturating_add(melee);
        let damage = scale(combined, energy, DAMAGE_ROUNDS).max(1);

        let mut threat = combined;
        if race.has_flag(RaceFlag::Multiply) {
            threat = scale(threat, energy, 5);
        }
        if race.has_flag(RaceFlag::Friends) {
            threat = threat.saturating_mul(2);
        } else if race.has_flag(RaceFlag::Friend) {
            threat = scale(threat, 3, 2);
        }

        DamageEstimate {
            damage,
            threat,
            melee,
            spell,
        }
    }
}

/// Spell danger over the window, scaled by casting frequency.
fn spell_window(race: &MonsterRace) -> i64 {
    let danger = spell_danger(race).saturating_mul(DAMAGE_ROUNDS);
    if danger == 0 {
        return 0;
    }
    // Always get at least one shot
    let freq = i64::from(race.freq_spell).max(SPELL_FREQ_FLOOR);
    scale(danger, freq, 100)
}

/// Sum of maximum blow damage with effect penalties and method multipliers.
fn blow_damage(race: &MonsterRace) -> i64 {
    if race.has_flag(RaceFlag::NeverBlow) {
        return 0;
    }
    let level = i64::from(race.level);
    race.active_blows()
        .map(|blow| {
            let base = blow.dice.max_damage();
            blow.method.scale(blow.effect.apply_penalty(base, level))
        })
        .sum()
}

fn melee_window(race: &MonsterRace, energy: i64) -> i64 {
    let level = race.effective_level();
    let mut melee = blow_damage(race);

    // Wall bypassers can always reach the target
    melee = if race.flags.has_any(&RaceFlag::WALL_BYPASS) {
        melee.saturating_mul(DAMAGE_ROUNDS)
    } else {
        melee.saturating_mul(CONTACT_FLAT_WEIGHT) + scale(melee, energy, CONTACT_SPEED_DIVISOR)
    };

    let accuracy = (ACCURACY_BASE + level * ACCURACY_PER_LEVEL).min(ACCURACY_CAP);
    melee = scale(melee, accuracy, 100);

    if !race.has_flag(RaceFlag::Multiply) {
        melee = erratic_reduction(race, melee);
        melee = stationary_reduction(race, melee, level);
    }

    melee.max(1)
}

fn erratic_reduction(race: &MonsterRace, melee: i64) -> i64 {
    if !race.flags.has_any(&RaceFlag::ERRATIC) {
        return melee;
    }
    let mut reduce = 100;
    if race.has_flag(RaceFlag::Rand25) {
        reduce -= 25;
    }
    if race.has_flag(RaceFlag::Rand50) {
        reduce -= 50;
    }
    reduce += (100 - reduce) / RANDOM_MOVE_CONNECT_DIVISOR;
    scale(melee, reduce, 100)
}

fn stationary_reduction(race: &MonsterRace, melee: i64, level: i64) -> i64 {
    if !race.has_flag(RaceFlag::NeverMove) {
        return melee;
    }
    if race.spell_flags.has_any(&SpellFlag::CLOSE_DISTANCE) {
        let freq = i64::from(race.freq_spell);
        let mut reduced = melee / 5 + scale(melee, 4 * freq, 500);
        if !race.has_flag(RaceFlag::Stupid) {
            let success = (SPELL_SAVE_BASE + (level + 3) / 4).min(100);
            reduced = reduced / 5 + scale(reduced, 4 * success, 500);
        }
        reduced
    } else if race.has_flag(RaceFlag::Invisible) {
        melee / STATIONARY_INVISIBLE_DIVISOR
    } else {
        melee / STATIONARY_MELEE_DIVISOR
    }
}
