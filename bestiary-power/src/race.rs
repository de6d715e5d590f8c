//! Monster race templates: raw combat inputs plus the derived statistics the
//! normalizer writes back.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{
    BLOW_CRIPPLING_PENALTY, BLOW_DRAIN_HIGH_PENALTY, BLOW_DRAIN_LOW_PENALTY, BLOW_ELEMENT_PENALTY,
    BLOW_MAJOR_PENALTY, BLOW_MINOR_PENALTY, BLOW_SEVERE_PENALTY, BLOW_SHATTER_PENALTY, MAX_BLOWS,
    NORMAL_SPEED,
};
use crate::flags::{RaceFlag, RaceFlags, SpellFlag, SpellFlags};

/// How a melee blow is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlowMethod {
    /// Empty slot.
    #[default]
    None,
    Hit,
    Touch,
    Punch,
    Kick,
    Claw,
    Bite,
    Sting,
    Butt,
    Crush,
    Engulf,
    Crawl,
    Drool,
    Spit,
    Gaze,
    Wail,
    Spore,
    Beg,
    Insult,
    Moan,
}

impl BlowMethod {
    /// Stunning methods are the most dangerous.
    #[must_use]
    pub const fn stuns(self) -> bool {
        matches!(self, Self::Punch | Self::Kick | Self::Butt | Self::Crush)
    }

    #[must_use]
    pub const fn cuts(self) -> bool {
        matches!(self, Self::Claw | Self::Bite)
    }

    /// Apply the method multiplier to a blow's damage.
    #[must_use]
    pub const fn scale(self, damage: i64) -> i64 {
        if self.stuns() {
            damage * 4 / 3
        } else if self.cuts() {
            damage * 7 / 5
        } else {
            damage
        }
    }
}

/// Side effect carried by a melee blow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlowEffect {
    #[default]
    None,
    Hurt,
    Poison,
    UnBonus,
    UnPower,
    EatGold,
    EatItem,
    EatFood,
    EatLight,
    Acid,
    Elec,
    Fire,
    Cold,
    Blind,
    Confuse,
    Terrify,
    Paralyze,
    LoseStr,
    LoseInt,
    LoseWis,
    LoseDex,
    LoseCon,
    LoseChr,
    LoseAll,
    Shatter,
    Exp10,
    Exp20,
    Exp40,
    Exp80,
    Hallu,
}

impl BlowEffect {
    /// Add the fixed danger penalty for this effect to a blow's damage.
    #[must_use]
    pub const fn apply_penalty(self, damage: i64, level: i64) -> i64 {
        match self {
            Self::EatGold | Self::EatItem | Self::EatFood | Self::EatLight | Self::LoseChr => {
                damage + BLOW_MINOR_PENALTY
            }
            Self::Poison => damage * 5 / 4 + level,
            Self::Terrify | Self::Elec | Self::Cold | Self::Fire => damage + BLOW_ELEMENT_PENALTY,
            Self::Acid
            | Self::Blind
            | Self::Confuse
            | Self::LoseStr
            | Self::LoseInt
            | Self::LoseWis
            | Self::LoseDex
            | Self::Hallu => damage + BLOW_MAJOR_PENALTY,
            Self::UnBonus | Self::UnPower | Self::LoseCon => damage + BLOW_SEVERE_PENALTY,
            Self::Paralyze | Self::LoseAll => damage + BLOW_CRIPPLING_PENALTY,
            Self::Exp10 | Self::Exp20 => damage + BLOW_DRAIN_LOW_PENALTY,
            Self::Exp40 | Self::Exp80 => damage + BLOW_DRAIN_HIGH_PENALTY,
            Self::Shatter => damage + BLOW_SHATTER_PENALTY,
            Self::None | Self::Hurt => damage,
        }
    }
}

/// Damage dice, e.g. `3d8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dice {
    pub count: u16,
    pub sides: u16,
}

impl Dice {
    #[must_use]
    pub const fn new(count: u16, sides: u16) -> Self {
        Self { count, sides }
    }

    /// Highest possible roll.
    #[must_use]
    pub fn max_damage(self) -> i64 {
        i64::from(self.count) * i64::from(self.sides)
    }
}

/// One melee attack slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Blow {
    #[serde(default)]
    pub method: BlowMethod,
    #[serde(default)]
    pub effect: BlowEffect,
    #[serde(default)]
    pub dice: Dice,
}

impl Blow {
    #[must_use]
    pub const fn new(method: BlowMethod, effect: BlowEffect, dice: Dice) -> Self {
        Self {
            method,
            effect,
            dice,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.method, BlowMethod::None)
    }
}

/// Blow slots stored inline; only the first [`MAX_BLOWS`] are evaluated.
pub type BlowSet = SmallVec<[Blow; MAX_BLOWS]>;

/// Statistics recomputed on every normalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DerivedStats {
    /// Melee damage over the ten-round window, before speed scaling.
    #[serde(default)]
    pub melee_dam: i64,
    /// Spell and breath damage over the ten-round window.
    #[serde(default)]
    pub spell_dam: i64,
    /// Grouping- and speed-adjusted danger figure driving level derivation.
    #[serde(default)]
    pub highest_threat: i64,
    /// Effective hit points, halved to keep power products in range.
    #[serde(default)]
    pub hp: i64,
    /// Raw toughness times damage score.
    #[serde(default)]
    pub power: i64,
    /// Power normalized against the population at the race's depth.
    #[serde(default)]
    pub scaled_power: i64,
}

/// A monster species definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterRace {
    pub index: usize,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_symbol")]
    pub symbol: char,
    #[serde(default)]
    pub level: u8,
    #[serde(default = "default_speed")]
    pub speed: u8,
    #[serde(default)]
    pub armour_class: i64,
    #[serde(default)]
    pub avg_hp: i64,
    /// Inverse spawn weight; zero marks hand-placed monsters.
    #[serde(default)]
    pub rarity: u8,
    #[serde(default)]
    pub experience: i64,
    #[serde(default)]
    pub blows: BlowSet,
    #[serde(default)]
    pub flags: RaceFlags,
    #[serde(default)]
    pub spell_flags: SpellFlags,
    /// Chance in percent to cast a spell each turn.
    #[serde(default)]
    pub freq_spell: u8,
    /// Chance in percent to use an innate attack each turn.
    #[serde(default)]
    pub freq_innate: u8,
    #[serde(default)]
    pub derived: DerivedStats,
}

fn default_symbol() -> char {
    '?'
}

const fn default_speed() -> u8 {
    NORMAL_SPEED
}

impl Default for MonsterRace {
    fn default() -> Self {
        Self {
            index: 0,
            name: String::new(),
            symbol: default_symbol(),
            level: 0,
            speed: default_speed(),
            armour_class: 0,
            avg_hp: 0,
            rarity: 0,
            experience: 0,
            blows: BlowSet::new(),
            flags: RaceFlags::new(),
            spell_flags: SpellFlags::new(),
            freq_spell: 0,
            freq_innate: 0,
            derived: DerivedStats::default(),
        }
    }
}

impl MonsterRace {
    /// Create a named race with default combat inputs.
    #[must_use]
    pub fn new(index: usize, name: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn has_flag(&self, flag: RaceFlag) -> bool {
        self.flags.has(flag)
    }

    #[must_use]
    pub fn has_spell(&self, spell: SpellFlag) -> bool {
        self.spell_flags.has(spell)
    }

    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.has_flag(RaceFlag::Unique)
    }

    /// Randomly spawned, non-unique monsters feed the per-depth population.
    #[must_use]
    pub fn spawns_naturally(&self) -> bool {
        self.rarity > 0 && !self.is_unique()
    }

    /// Level used by damage formulas; town monsters count as level 1.
    #[must_use]
    pub fn effective_level(&self) -> i64 {
        i64::from(self.level.max(1))
    }

    /// Blow slots that carry an attack.
    pub fn active_blows(&self) -> impl Iterator<Item = &Blow> {
        self.blows
            .iter()
            .take(MAX_BLOWS)
            .filter(|blow| !blow.is_empty())
    }

    /// Whether the race can use ranged spells or innate attacks at all.
    #[must_use]
    pub const fn has_ranged_attack(&self) -> bool {
        self.freq_spell > 0 || self.freq_innate > 0
    }
}
