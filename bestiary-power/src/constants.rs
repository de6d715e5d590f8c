//! Centralized balance and tuning constants for monster power evaluation.
//!
//! These values define the deterministic math for the rebalancer. Keeping
//! them together ensures that the power curve can only be adjusted via code
//! changes reviewed in version control, rather than through the content data.

// Table shape --------------------------------------------------------------
/// Number of depth levels tracked by the per-depth aggregates.
pub const MAX_DEPTH: usize = 128;
/// Melee blow slots per monster race.
pub const MAX_BLOWS: usize = 4;
/// Refinement passes performed by the normalizer. Downstream content relies
/// on exactly this many.
pub const NORMALIZATION_PASSES: usize = 3;
/// Deepest level the level derivation may assign.
pub const MAX_DERIVED_LEVEL: i64 = 99;

// Speed --------------------------------------------------------------------
/// Speed rating of an unhasted, normal-speed monster.
pub const NORMAL_SPEED: u8 = 110;
/// Speed bonus granted to monsters that can haste themselves.
pub const HASTE_SPEED_BONUS: usize = 5;
/// Entries in the speed-to-energy table.
pub const ENERGY_TABLE_LEN: usize = 200;

// Damage window ------------------------------------------------------------
pub(crate) const DAMAGE_ROUNDS: i64 = 10;
pub(crate) const SPELL_FREQ_FLOOR: i64 = 10;
pub(crate) const CONTACT_FLAT_WEIGHT: i64 = 3;
pub(crate) const CONTACT_SPEED_DIVISOR: i64 = 7;
pub(crate) const ACCURACY_BASE: i64 = 45;
pub(crate) const ACCURACY_PER_LEVEL: i64 = 3;
pub(crate) const ACCURACY_CAP: i64 = 95;
pub(crate) const RANDOM_MOVE_CONNECT_DIVISOR: i64 = 8;
pub(crate) const STATIONARY_MELEE_DIVISOR: i64 = 5;
pub(crate) const STATIONARY_INVISIBLE_DIVISOR: i64 = 3;
pub(crate) const SPELL_SAVE_BASE: i64 = 75;

// Blow effect penalties ----------------------------------------------------
pub(crate) const BLOW_MINOR_PENALTY: i64 = 5;
pub(crate) const BLOW_ELEMENT_PENALTY: i64 = 10;
pub(crate) const BLOW_MAJOR_PENALTY: i64 = 20;
pub(crate) const BLOW_SEVERE_PENALTY: i64 = 30;
pub(crate) const BLOW_CRIPPLING_PENALTY: i64 = 40;
pub(crate) const BLOW_DRAIN_LOW_PENALTY: i64 = 5;
pub(crate) const BLOW_DRAIN_HIGH_PENALTY: i64 = 10;
pub(crate) const BLOW_SHATTER_PENALTY: i64 = 300;

// Toughness ----------------------------------------------------------------
pub(crate) const RESIST_BASE: i64 = 1;
pub(crate) const RESIST_PER_IMMUNITY: i64 = 2;
pub(crate) const RESIST_HOLE_FLOOR: i64 = 5;
pub(crate) const RESIST_SCALE: i64 = 25;
pub(crate) const ARMOUR_LEVEL_BASE: i64 = 150;

// Normalization ------------------------------------------------------------
pub(crate) const EXPERIENCE_DIVISOR: i64 = 25;
pub(crate) const EXPERIENCE_OVERFLOW_HP: i64 = 10_000;
pub(crate) const POPULATION_BASE: i64 = 10;
pub(crate) const POPULATION_FRIEND: i64 = 20;
pub(crate) const POPULATION_FRIENDS: i64 = 50;
pub(crate) const AVERAGE_SCALE: i64 = 10;
/// Depths at which shallower monsters' contributions are divided by ten to
/// keep the running totals in range.
pub(crate) const OVERFLOW_DEPTHS: [usize; 3] = [90, 65, 40];
pub(crate) const OVERFLOW_DIVISOR: i64 = 10;
