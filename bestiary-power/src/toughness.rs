//! Effective hit points adjusted for resistances, evasion and defences.
use crate::constants::{
    ARMOUR_LEVEL_BASE, RESIST_BASE, RESIST_HOLE_FLOOR, RESIST_PER_IMMUNITY, RESIST_SCALE,
};
use crate::flags::{RaceFlag, SpellFlag};
use crate::numbers::scale;
use crate::race::MonsterRace;

/// Effective hit points of a race; never below 1.
#[must_use]
pub fn estimate_effective_hp(race: &MonsterRace) -> i64 {
    let level = i64::from(race.level);
    let mut hp = race.avg_hp;

    // High hit points count for less on a stationary monster with no reach
    if race.has_flag(RaceFlag::NeverMove) && !race.has_ranged_attack() {
        hp = (hp / 2).max(1);
    }

    if race.has_spell(SpellFlag::Heal) {
        hp = scale(hp, 6, 5);
    }
    if race.has_flag(RaceFlag::Regenerate) {
        hp = scale(hp, 10, 9);
    }
    if race.has_flag(RaceFlag::PassWall) {
        hp = scale(hp, 3, 2);
    }

    if race.has_flag(RaceFlag::Invisible) {
        hp = scale(hp, level + hide_bonus(race) + 1, level.max(1));
    }

    if race.spell_flags.has_any(&SpellFlag::ESCAPES) {
        hp = scale(hp, 6, 5);
    }

    if race.has_flag(RaceFlag::Multiply) {
        hp = hp.saturating_mul(2);
    }

    let resists = resist_score(race);
    let armour = race.armour_class + resists;
    let divisor = ARMOUR_LEVEL_BASE + level;
    hp = hp.saturating_add(if resists < armour / 3 {
        scale(hp, resists, divisor)
    } else {
        scale(hp, armour, 3) / divisor
    });

    hp.max(1)
}

/// Bonus for being hard to detect by mind-reading.
#[must_use]
pub fn hide_bonus(race: &MonsterRace) -> i64 {
    if race.has_flag(RaceFlag::EmptyMind) {
        return 2;
    }
    i64::from(race.has_flag(RaceFlag::ColdBlood)) + i64::from(race.has_flag(RaceFlag::WeirdMind))
}

/// Scaled resistance score blended with armour class.
#[must_use]
pub fn resist_score(race: &MonsterRace) -> i64 {
    let immunities = RaceFlag::ELEMENT_IMMUNITIES
        .iter()
        .filter(|flag| race.has_flag(**flag))
        .count();
    let mut resists = RESIST_BASE + RESIST_PER_IMMUNITY * i64::try_from(immunities).unwrap_or(0);

    resists *= match resists {
        12.. => 6,
        10..=11 => 4,
        8..=9 => 3,
        6..=7 => 2,
        _ => 1,
    };

    // Defensive holes weaken an otherwise resistant monster
    if resists >= 6 {
        if race.has_flag(RaceFlag::HurtRock) {
            resists -= 1;
        }
        if race.has_flag(RaceFlag::HurtLight) {
            resists -= 1;
        }
        if !race.has_flag(RaceFlag::NoSleep) {
            resists -= 3;
        }
        if !race.has_flag(RaceFlag::NoFear) {
            resists -= 2;
        }
        if !race.has_flag(RaceFlag::NoConf) {
            resists -= 2;
        }
        if !race.has_flag(RaceFlag::NoStun) {
            resists -= 1;
        }
        resists = resists.max(RESIST_HOLE_FLOOR);
    }

    if resists >= 3 {
        let high = RaceFlag::HIGH_RESISTS
            .iter()
            .filter(|flag| race.has_flag(**flag))
            .count();
        resists += i64::try_from(high).unwrap_or(0);
    }

    resists * RESIST_SCALE
}
