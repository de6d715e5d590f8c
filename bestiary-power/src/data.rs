use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::race::MonsterRace;

/// Errors raised while decoding a bestiary.
#[derive(Debug, Error)]
pub enum BestiaryError {
    #[error("invalid bestiary JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("monster index {index} is used by more than one race")]
    DuplicateIndex { index: usize },
}

/// Container for a full monster template table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BestiaryData {
    #[serde(default)]
    pub races: Vec<MonsterRace>,
}

impl BestiaryData {
    /// Create an empty bestiary (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self { races: Vec::new() }
    }

    /// Load a bestiary from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or two races share an
    /// index.
    pub fn from_json(json: &str) -> Result<Self, BestiaryError> {
        let data: Self = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    /// Create a bestiary from pre-built races
    #[must_use]
    pub fn from_races(races: Vec<MonsterRace>) -> Self {
        Self { races }
    }

    /// Serialize the table, derived statistics included.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, BestiaryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every race index is unique.
    ///
    /// # Errors
    ///
    /// Returns the first repeated index.
    pub fn validate(&self) -> Result<(), BestiaryError> {
        let mut seen = HashSet::with_capacity(self.races.len());
        for race in &self.races {
            if !seen.insert(race.index) {
                return Err(BestiaryError::DuplicateIndex { index: race.index });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.races.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.races.is_empty()
    }

    #[must_use]
    pub fn find(&self, index: usize) -> Option<&MonsterRace> {
        self.races.iter().find(|race| race.index == index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{RaceFlag, SpellFlag};
    use crate::race::{BlowEffect, BlowMethod};

    #[test]
    fn test_bestiary_from_json() {
        let json = r#"{
            "races": [
                {
                    "index": 3,
                    "name": "Grip, Farmer Maggot's Dog",
                    "symbol": "C",
                    "level": 2,
                    "speed": 120,
                    "armour_class": 30,
                    "avg_hp": 5,
                    "rarity": 1,
                    "experience": 30,
                    "blows": [
                        { "method": "bite", "effect": "hurt", "dice": { "count": 1, "sides": 6 } }
                    ],
                    "flags": ["unique", "rand25"],
                    "spell_flags": []
                },
                { "index": 4, "name": "Scruffy dog", "spell_flags": ["shriek"] }
            ]
        }"#;

        let data = BestiaryData::from_json(json).unwrap();
        assert_eq!(data.len(), 2);
        let grip = data.find(3).unwrap();
        assert_eq!(grip.symbol, 'C');
        assert!(grip.is_unique());
        assert!(grip.has_flag(RaceFlag::Rand25));
        assert_eq!(grip.blows[0].method, BlowMethod::Bite);
        assert_eq!(grip.blows[0].effect, BlowEffect::Hurt);
        assert_eq!(grip.derived.power, 0);

        let dog = data.find(4).unwrap();
        assert_eq!(dog.speed, 110);
        assert_eq!(dog.symbol, '?');
        assert!(dog.has_spell(SpellFlag::Shriek));
    }

    #[test]
    fn duplicate_indices_are_rejected() {
        let json = r#"{ "races": [ { "index": 1, "name": "a" }, { "index": 1, "name": "b" } ] }"#;
        let err = BestiaryData::from_json(json).unwrap_err();
        assert!(matches!(err, BestiaryError::DuplicateIndex { index: 1 }));
    }

    #[test]
    fn pretty_json_round_trips() {
        let mut race = MonsterRace::new(9, "Jackal");
        race.derived.scaled_power = 12;
        let data = BestiaryData::from_races(vec![race]);
        let json = data.to_json_pretty().unwrap();
        assert!(json.contains("\"scaled_power\": 12"));
        assert_eq!(BestiaryData::from_json(&json).unwrap(), data);
    }

    #[test]
    fn empty_bestiary() {
        let data = BestiaryData::empty();
        assert!(data.is_empty());
        assert_eq!(BestiaryData::from_json("{}").unwrap(), data);
    }
}
