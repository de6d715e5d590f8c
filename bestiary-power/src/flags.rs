//! Capability tags describing monster movement, defence, behaviour and spells.
use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;

/// Inline-allocated, duplicate-free set of capability tags.
///
/// Tags are kept in insertion order and serialize as a plain list. Repeated
/// tags in the input list are dropped on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlagSet<T>(SmallVec<[T; 8]>)
where
    T: Copy + PartialEq;

impl<T> FlagSet<T>
where
    T: Copy + PartialEq,
{
    #[must_use]
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Returns true when the tag is present.
    #[must_use]
    pub fn has(&self, tag: T) -> bool {
        self.0.contains(&tag)
    }

    /// Returns true when any of the tags is present.
    #[must_use]
    pub fn has_any(&self, tags: &[T]) -> bool {
        tags.iter().any(|tag| self.has(*tag))
    }

    /// Adds a tag if it is not already present.
    pub fn insert(&mut self, tag: T) {
        if !self.has(tag) {
            self.0.push(tag);
        }
    }

    /// Removes a tag, returning whether it was present.
    pub fn remove(&mut self, tag: T) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| *existing != tag);
        self.0.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Default for FlagSet<T>
where
    T: Copy + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'de, T> Deserialize<'de> for FlagSet<T>
where
    T: Copy + PartialEq + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<T>::deserialize(deserializer).map(Self::from_iter)
    }
}

impl<T> FromIterator<T> for FlagSet<T>
where
    T: Copy + PartialEq,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl<T, const N: usize> From<[T; N]> for FlagSet<T>
where
    T: Copy + PartialEq,
{
    fn from(tags: [T; N]) -> Self {
        tags.into_iter().collect()
    }
}

/// Movement, defence and behaviour traits of a monster race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceFlag {
    Unique,
    NeverBlow,
    NeverMove,
    Rand25,
    Rand50,
    KillWall,
    PassWall,
    OpenDoor,
    BashDoor,
    Multiply,
    Stupid,
    Invisible,
    /// Appears with a few companions.
    Friend,
    /// Appears with a large group.
    Friends,
    Escort,
    Escorts,
    Regenerate,
    EmptyMind,
    ColdBlood,
    WeirdMind,
    ImAcid,
    ImElec,
    ImFire,
    ImCold,
    ImPois,
    ImWater,
    ResNeth,
    ResNexus,
    ResDise,
    HurtRock,
    HurtLight,
    NoSleep,
    NoFear,
    NoConf,
    NoStun,
}

impl RaceFlag {
    /// Basic elemental immunities counted by the resistance score.
    pub const ELEMENT_IMMUNITIES: [Self; 5] = [
        Self::ImAcid,
        Self::ImFire,
        Self::ImCold,
        Self::ImElec,
        Self::ImPois,
    ];

    /// Secondary resistances that add to an already resistant score.
    pub const HIGH_RESISTS: [Self; 4] = [
        Self::ImWater,
        Self::ResNeth,
        Self::ResNexus,
        Self::ResDise,
    ];

    /// Traits that let a monster reach the player through rock.
    pub const WALL_BYPASS: [Self; 2] = [Self::KillWall, Self::PassWall];

    /// Traits that let a monster get through closed doors.
    pub const DOOR_BYPASS: [Self; 2] = [Self::OpenDoor, Self::BashDoor];

    /// Partial random movement traits.
    pub const ERRATIC: [Self; 2] = [Self::Rand25, Self::Rand50];
}

/// Spell, breath and innate ability tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellFlag {
    // Breaths
    BrAcid,
    BrElec,
    BrFire,
    BrCold,
    BrPois,
    BrNeth,
    BrChao,
    BrDise,
    BrShar,
    BrLight,
    BrDark,
    BrSoun,
    BrNexu,
    BrTime,
    BrIner,
    BrGrav,
    BrPlas,
    BrWall,
    // Balls
    BaAcid,
    BaElec,
    BaFire,
    BaCold,
    BaPois,
    BaNeth,
    BaWate,
    BaMana,
    BaDark,
    // Direct
    DrainMana,
    MindBlast,
    BrainSmash,
    Cause1,
    Cause2,
    Cause3,
    Cause4,
    // Bolts
    BoAcid,
    BoElec,
    BoFire,
    BoCold,
    BoNeth,
    BoWate,
    BoMana,
    BoPlas,
    BoIcee,
    // Projectiles
    Arrow1,
    Arrow2,
    Arrow3,
    Arrow4,
    Boulder,
    Missile,
    // Annoyances
    Scare,
    Blind,
    Conf,
    Slow,
    Hold,
    Haste,
    Heal,
    Blink,
    Tport,
    TeleTo,
    TeleAway,
    TeleLevel,
    Darkness,
    Traps,
    Forget,
    // Summons
    SKin,
    Shriek,
    SHiDemon,
    SMonster,
    SMonsters,
    SAnimal,
    SSpider,
    SHound,
    SHydra,
    SAngel,
    SDemon,
    SUndead,
    SDragon,
    SHiUndead,
    SHiDragon,
    SWraith,
    SUnique,
}

impl SpellFlag {
    /// Spells that let a stationary monster bring the player into reach.
    pub const CLOSE_DISTANCE: [Self; 2] = [Self::TeleTo, Self::Blink];

    /// Spells that let a monster escape the fight.
    pub const ESCAPES: [Self; 3] = [Self::Tport, Self::TeleAway, Self::TeleLevel];
}

/// Set of race traits.
pub type RaceFlags = FlagSet<RaceFlag>;
/// Set of spell abilities.
pub type SpellFlags = FlagSet<SpellFlag>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_deduplicates_and_preserves_order() {
        let mut flags = RaceFlags::new();
        flags.insert(RaceFlag::NeverMove);
        flags.insert(RaceFlag::Invisible);
        flags.insert(RaceFlag::NeverMove);
        assert_eq!(flags.len(), 2);
        assert_eq!(
            flags.iter().collect::<Vec<_>>(),
            vec![RaceFlag::NeverMove, RaceFlag::Invisible]
        );
        assert!(flags.remove(RaceFlag::NeverMove));
        assert!(!flags.remove(RaceFlag::NeverMove));
        assert!(!flags.has(RaceFlag::NeverMove));
    }

    #[test]
    fn has_any_checks_membership() {
        let flags = RaceFlags::from([RaceFlag::PassWall]);
        assert!(flags.has_any(&RaceFlag::WALL_BYPASS));
        assert!(!flags.has_any(&RaceFlag::DOOR_BYPASS));
        assert!(!RaceFlags::default().has_any(&RaceFlag::WALL_BYPASS));
    }

    #[test]
    fn flags_serialize_as_snake_case_list() {
        let spells = SpellFlags::from([SpellFlag::BrFire, SpellFlag::SHiDemon]);
        let json = serde_json::to_string(&spells).unwrap();
        assert_eq!(json, r#"["br_fire","s_hi_demon"]"#);
        let parsed: SpellFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spells);
    }

    #[test]
    fn repeated_tags_load_once() {
        let flags: RaceFlags =
            serde_json::from_str(r#"["unique","never_move","unique"]"#).unwrap();
        assert_eq!(flags.len(), 2);
        assert_eq!(
            flags.iter().collect::<Vec<_>>(),
            vec![RaceFlag::Unique, RaceFlag::NeverMove]
        );
        let json = serde_json::to_string(&flags).unwrap();
        assert_eq!(json, r#"["unique","never_move"]"#);
        assert!(serde_json::from_str::<RaceFlags>(r#"["not_a_flag"]"#).is_err());
    }
}
