//! Worst-case danger values for breaths, spells and summons.
//!
//! Every ability resolves to a single figure and the monster's spell danger is
//! the running maximum over the abilities it has. Damage is always assumed to
//! be maximised and the target's resistance minimised.
use crate::flags::SpellFlag;
use crate::race::MonsterRace;

/// Resistance a target may hold against an element, at its weakest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resist {
    Unresistable,
    /// Single base-element resistance (one third damage).
    Basic,
    /// High resistance, leaving `numerator / 7` of the damage.
    High(i64),
}

impl Resist {
    const fn weakest(self, damage: i64) -> i64 {
        match self {
            Self::Unresistable => damage,
            Self::Basic => (damage + 2) / 3,
            Self::High(numerator) => damage * numerator / 7,
        }
    }
}

/// Extra danger credited once a breath becomes the strongest ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreathBonus {
    Flat(i64),
    /// `damage * 5 / 4` plus a flat amount.
    Amplified(i64),
    /// `damage * 5 / 4` plus the monster level.
    AmplifiedByLevel,
    /// Side effects that hurt shallow characters most.
    InverseLevel,
}

#[derive(Debug, Clone, Copy)]
struct Breath {
    spell: SpellFlag,
    divisor: i64,
    cap: i64,
    resist: Resist,
    bonus: BreathBonus,
}

impl Breath {
    const fn new(
        spell: SpellFlag,
        divisor: i64,
        cap: i64,
        resist: Resist,
        bonus: BreathBonus,
    ) -> Self {
        Self {
            spell,
            divisor,
            cap,
            resist,
            bonus,
        }
    }

    /// Fold this breath into the running danger. The comparison is made
    /// against the resisted breath damage before its bonus.
    fn fold(&self, current: i64, hp: i64, level: i64) -> i64 {
        let damage = self.resist.weakest((hp / self.divisor).min(self.cap));
        if current >= damage {
            return current;
        }
        match self.bonus {
            BreathBonus::Flat(bonus) => damage + bonus,
            BreathBonus::Amplified(bonus) => damage * 5 / 4 + bonus,
            BreathBonus::AmplifiedByLevel => damage * 5 / 4 + level,
            BreathBonus::InverseLevel => damage + inverse_level(level),
        }
    }
}

/// Breaths in evaluation order; order matters because each comparison uses
/// the unbonused damage.
const BREATHS: [Breath; 18] = [
    Breath::new(SpellFlag::BrAcid, 3, 1600, Resist::Basic, BreathBonus::Flat(20)),
    Breath::new(SpellFlag::BrElec, 3, 1600, Resist::Basic, BreathBonus::Flat(10)),
    Breath::new(SpellFlag::BrFire, 3, 1600, Resist::Basic, BreathBonus::Flat(10)),
    Breath::new(SpellFlag::BrCold, 3, 1600, Resist::Basic, BreathBonus::Flat(10)),
    Breath::new(SpellFlag::BrPois, 3, 800, Resist::Basic, BreathBonus::AmplifiedByLevel),
    Breath::new(SpellFlag::BrNeth, 6, 550, Resist::High(6), BreathBonus::InverseLevel),
    Breath::new(SpellFlag::BrChao, 6, 500, Resist::High(6), BreathBonus::InverseLevel),
    Breath::new(SpellFlag::BrDise, 6, 500, Resist::High(6), BreathBonus::Flat(50)),
    Breath::new(SpellFlag::BrShar, 6, 500, Resist::High(6), BreathBonus::Amplified(5)),
    Breath::new(SpellFlag::BrLight, 6, 400, Resist::High(4), BreathBonus::Flat(10)),
    Breath::new(SpellFlag::BrDark, 6, 400, Resist::High(4), BreathBonus::Flat(10)),
    Breath::new(SpellFlag::BrSoun, 6, 500, Resist::High(5), BreathBonus::Flat(20)),
    Breath::new(SpellFlag::BrNexu, 3, 250, Resist::High(6), BreathBonus::Flat(20)),
    Breath::new(SpellFlag::BrTime, 3, 150, Resist::Unresistable, BreathBonus::InverseLevel),
    Breath::new(SpellFlag::BrIner, 6, 200, Resist::Unresistable, BreathBonus::Flat(30)),
    Breath::new(SpellFlag::BrGrav, 3, 200, Resist::Unresistable, BreathBonus::Flat(30)),
    Breath::new(SpellFlag::BrPlas, 6, 150, Resist::Unresistable, BreathBonus::Flat(30)),
    Breath::new(SpellFlag::BrWall, 6, 200, Resist::Unresistable, BreathBonus::Flat(30)),
];

const fn inverse_level(level: i64) -> i64 {
    2000 / (level + 1)
}

/// Fixed danger of a non-breath ability at the given monster level.
fn ability_danger(spell: SpellFlag, level: i64) -> Option<i64> {
    use SpellFlag as S;

    let basic = Resist::Basic;
    let value = match spell {
        // Balls
        S::BaAcid => basic.weakest(15 + level * 3) + 20,
        S::BaElec => basic.weakest(8 + level * 3 / 2) + 10,
        S::BaFire => basic.weakest(10 + level * 7 / 2) + 10,
        S::BaCold => basic.weakest(10 + level * 3 / 2) + 10,
        S::BaPois => 8,
        S::BaNeth => Resist::High(6).weakest(150 + level) + inverse_level(level),
        S::BaWate => 50 + level * 5 / 2 + 20,
        S::BaMana => level * 5 + 100 + 100,
        S::BaDark => Resist::High(4).weakest(level * 5 + 100) + 10,
        // Direct attacks the player can save against count half
        S::DrainMana => 5,
        S::MindBlast => 64 / 2,
        S::BrainSmash => 180 / 2,
        S::Cause1 => 24 / 2,
        S::Cause2 => 64 / 2,
        S::Cause3 => 150 / 2,
        S::Cause4 => 225 / 2,
        // Bolts
        S::BoAcid => basic.weakest(56 + level / 3) + 20,
        S::BoElec => basic.weakest(32 + level / 3) + 10,
        S::BoFire => basic.weakest(72 + level / 3) + 10,
        S::BoCold => basic.weakest(48 + level / 3) + 10,
        S::BoNeth => Resist::High(6).weakest(55 + level * 3 / 2) + inverse_level(level),
        S::BoWate => 100 + level + 20,
        S::BoMana => 50 + level * 7 / 2,
        S::BoPlas => 66 + level,
        S::BoIcee => basic.weakest(36 + level),
        // Projectiles
        S::Arrow1 => 6,
        S::Arrow2 => 18,
        S::Arrow3 => 30,
        S::Arrow4 => 42,
        S::Boulder => (1 + level / 7) * 12,
        S::Missile => 8,
        // Annoyances
        S::Scare | S::Darkness => 5,
        S::Blind | S::Conf | S::Traps => 10,
        S::Slow | S::Blink => 15,
        S::Hold | S::TeleTo | S::TeleAway | S::Forget => 25,
        S::Haste => 70,
        S::Heal => 30,
        S::TeleLevel => 40,
        // Summons
        S::SKin => level * 2,
        S::Shriek | S::SDemon | S::SUndead | S::SDragon => level * 3 / 2,
        S::SHiDemon => 250,
        S::SMonster => 40,
        S::SMonsters => 80,
        S::SAnimal => 30,
        S::SSpider => 20,
        S::SHound => 100,
        S::SHydra | S::SAngel => 150,
        S::SHiUndead | S::SHiDragon => 400,
        S::SWraith => 450,
        S::SUnique => 500,
        // Self-teleport is an escape, not a threat
        S::Tport => return None,
        S::BrAcid
        | S::BrElec
        | S::BrFire
        | S::BrCold
        | S::BrPois
        | S::BrNeth
        | S::BrChao
        | S::BrDise
        | S::BrShar
        | S::BrLight
        | S::BrDark
        | S::BrSoun
        | S::BrNexu
        | S::BrTime
        | S::BrIner
        | S::BrGrav
        | S::BrPlas
        | S::BrWall => return None,
    };
    Some(value)
}

/// Highest single-ability danger for one round, before the ten-round window
/// and casting frequency are applied.
#[must_use]
pub fn spell_danger(race: &MonsterRace) -> i64 {
    let hp = race.avg_hp;
    let level = race.effective_level();

    let breath = BREATHS
        .iter()
        .filter(|breath| race.has_spell(breath.spell))
        .fold(0, |current, breath| breath.fold(current, hp, level));

    race.spell_flags
        .iter()
        .filter_map(|spell| ability_danger(spell, level))
        .fold(breath, i64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caster(level: u8, hp: i64, spells: &[SpellFlag]) -> MonsterRace {
        let mut race = MonsterRace::new(1, "Test caster");
        race.level = level;
        race.avg_hp = hp;
        for spell in spells {
            race.spell_flags.insert(*spell);
        }
        race
    }

    #[test]
    fn no_spells_means_no_danger() {
        assert_eq!(spell_danger(&caster(10, 100, &[])), 0);
    }

    #[test]
    fn fire_breath_scales_with_hp_and_cap() {
        // 300 / 3 = 100, resisted to 34, plus 10
        assert_eq!(spell_danger(&caster(20, 300, &[SpellFlag::BrFire])), 44);
        // capped at 1600 before resistance
        assert_eq!(spell_danger(&caster(20, 30_000, &[SpellFlag::BrFire])), 544);
    }

    #[test]
    fn breath_comparison_ignores_previous_bonus() {
        // acid: 60/3 = 20 -> 7 + 20 = 27; fire resists to the same 7, below 27
        let race = caster(5, 60, &[SpellFlag::BrAcid, SpellFlag::BrFire]);
        assert_eq!(spell_danger(&race), 27);
        // nether at level 9: 600/6 = 100 -> 85, plus 2000/10
        let race = caster(9, 600, &[SpellFlag::BrNeth]);
        assert_eq!(spell_danger(&race), 285);
    }

    #[test]
    fn annoyances_and_summons_share_the_running_maximum() {
        let race = caster(30, 10, &[SpellFlag::Blink, SpellFlag::Scare, SpellFlag::SKin]);
        assert_eq!(spell_danger(&race), 60);
        let race = caster(30, 10, &[SpellFlag::SUnique, SpellFlag::Haste]);
        assert_eq!(spell_danger(&race), 500);
        let race = caster(30, 10, &[SpellFlag::Tport]);
        assert_eq!(spell_danger(&race), 0);
    }

    #[test]
    fn level_zero_counts_as_level_one() {
        let race = caster(0, 10, &[SpellFlag::BaAcid]);
        // 15 + 3 = 18 -> resisted to 6, plus 20
        assert_eq!(spell_danger(&race), 26);
    }
}
