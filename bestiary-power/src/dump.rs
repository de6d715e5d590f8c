//! Pipe-delimited diagnostic table of derived power figures.
use std::io::{self, Write};

use crate::race::MonsterRace;

/// Column header of the power dump.
pub const POWER_DUMP_HEADER: &str = "ridx|level|rarity|d_char|name|pwr|scaled|melee|spell|hp";

/// Write one row per named race after the header.
///
/// # Errors
///
/// Returns any error raised by the writer.
pub fn write_power_dump<W: Write>(races: &[MonsterRace], writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{POWER_DUMP_HEADER}")?;
    for race in races.iter().filter(|race| !race.name.is_empty()) {
        writeln!(
            writer,
            "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
            race.index,
            race.level,
            race.rarity,
            race.symbol,
            race.name,
            race.derived.power,
            race.derived.scaled_power,
            race.derived.melee_dam,
            race.derived.spell_dam,
            race.derived.hp
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_unnamed_slots() {
        let mut jackal = MonsterRace::new(5, "Jackal");
        jackal.symbol = 'C';
        jackal.level = 1;
        jackal.rarity = 1;
        jackal.derived.power = 40;
        jackal.derived.scaled_power = 2;
        jackal.derived.melee_dam = 12;
        jackal.derived.hp = 4;
        let races = vec![MonsterRace::default(), jackal];

        let mut out = Vec::new();
        write_power_dump(&races, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![POWER_DUMP_HEADER, "5|1|1|C|Jackal|40|2|12|0|4"]);
    }
}
