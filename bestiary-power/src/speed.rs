//! Speed rating to energy-per-game-turn lookup.
use crate::config::ConfigError;
use crate::constants::{ENERGY_TABLE_LEN, HASTE_SPEED_BONUS};
use crate::flags::SpellFlag;
use crate::race::MonsterRace;

/// Energy gained per game turn at each speed; 110 is normal speed.
#[rustfmt::skip]
const DEFAULT_ENERGY: [u8; ENERGY_TABLE_LEN] = [
    /* Slow */     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
    /* Slow */     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
    /* Slow */     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
    /* Slow */     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
    /* Slow */     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
    /* Slow */     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
    /* S-50 */     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
    /* S-40 */     2,  2,  2,  2,  2,  2,  2,  2,  2,  2,
    /* S-30 */     2,  2,  2,  2,  2,  2,  2,  3,  3,  3,
    /* S-20 */     3,  3,  3,  3,  3,  4,  4,  4,  4,  4,
    /* S-10 */     5,  5,  5,  5,  6,  6,  7,  7,  8,  9,
    /* Norm */    10, 11, 12, 13, 14, 15, 16, 17, 18, 19,
    /* F+10 */    20, 21, 22, 23, 24, 25, 26, 27, 28, 29,
    /* F+20 */    30, 31, 32, 33, 34, 35, 36, 36, 37, 37,
    /* F+30 */    38, 38, 39, 39, 40, 40, 40, 41, 41, 41,
    /* F+40 */    42, 42, 42, 43, 43, 43, 44, 44, 44, 44,
    /* F+50 */    45, 45, 45, 45, 45, 46, 46, 46, 46, 46,
    /* F+60 */    47, 47, 47, 47, 47, 48, 48, 48, 48, 48,
    /* F+70 */    49, 49, 49, 49, 49, 49, 49, 49, 49, 49,
    /* Fast */    49, 49, 49, 49, 49, 49, 49, 49, 49, 49,
];

/// Read-only speed-to-energy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedTable {
    energy: Vec<u8>,
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            energy: DEFAULT_ENERGY.to_vec(),
        }
    }
}

impl SpeedTable {
    /// Build a table from explicit energy values.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not hold exactly
    /// [`ENERGY_TABLE_LEN`] entries or any entry is zero.
    pub fn from_energy(energy: Vec<u8>) -> Result<Self, ConfigError> {
        if energy.len() != ENERGY_TABLE_LEN {
            return Err(ConfigError::SpeedTableLength {
                expected: ENERGY_TABLE_LEN,
                actual: energy.len(),
            });
        }
        if let Some(speed) = energy.iter().position(|value| *value == 0) {
            return Err(ConfigError::ZeroEnergy { speed });
        }
        Ok(Self { energy })
    }

    /// Energy for a raw speed rating, clamped into the table.
    #[must_use]
    pub fn energy(&self, speed: usize) -> i64 {
        let index = speed.min(self.energy.len().saturating_sub(1));
        self.energy.get(index).copied().map_or(1, i64::from)
    }

    /// Energy for a race, including the self-haste bonus.
    #[must_use]
    pub fn energy_for(&self, race: &MonsterRace) -> i64 {
        let bonus = if race.has_spell(SpellFlag::Haste) {
            HASTE_SPEED_BONUS
        } else {
            0
        };
        self.energy(usize::from(race.speed) + bonus)
    }
}
