use std::io::Write;

use anyhow::Result;
use bestiary_power::numbers::i64_to_f64;
use bestiary_power::{Evaluation, MonsterRace, PassSummary};
use colored::Colorize;
use serde::Serialize;

const TOP_TEMPLATES: usize = 10;

/// Condensed run summary for machine consumption.
#[derive(Debug, Serialize)]
pub struct JsonSummary<'a> {
    pub templates: usize,
    pub rebalance: bool,
    pub total_power: i64,
    pub passes: &'a [PassSummary],
    pub strongest: Vec<RankedTemplate<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RankedTemplate<'a> {
    pub index: usize,
    pub name: &'a str,
    pub level: u8,
    pub power: i64,
    pub scaled_power: i64,
}

impl<'a> From<&'a MonsterRace> for RankedTemplate<'a> {
    fn from(race: &'a MonsterRace) -> Self {
        Self {
            index: race.index,
            name: &race.name,
            level: race.level,
            power: race.derived.power,
            scaled_power: race.derived.scaled_power,
        }
    }
}

/// Named templates ordered by scaled power, strongest first.
fn strongest(evaluation: &Evaluation) -> Vec<&MonsterRace> {
    let mut races: Vec<&MonsterRace> = evaluation
        .bestiary
        .races
        .iter()
        .filter(|race| !race.name.is_empty())
        .collect();
    races.sort_by(|a, b| {
        b.derived
            .scaled_power
            .cmp(&a.derived.scaled_power)
            .then(a.index.cmp(&b.index))
    });
    races.truncate(TOP_TEMPLATES);
    races
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    evaluation: &Evaluation,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Bestiary Power Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=========================".cyan())?;
    writeln!(out, "Templates: {}", evaluation.bestiary.len())?;
    let mode = if evaluation.config.rebalance {
        "rebalance".yellow()
    } else {
        "evaluate only".green()
    };
    writeln!(out, "Mode: {mode}")?;
    writeln!(
        out,
        "Total scaled power: {}",
        evaluation.outcome.total_power.to_string().bold()
    )?;
    if !evaluation.bestiary.is_empty() {
        let templates = i64::try_from(evaluation.bestiary.len()).unwrap_or(i64::MAX);
        let mean = i64_to_f64(evaluation.outcome.total_power) / i64_to_f64(templates);
        writeln!(out, "Mean scaled power: {mean:.1}")?;
    }
    writeln!(out)?;

    for pass in &evaluation.outcome.passes {
        writeln!(
            out,
            "Pass {}: {} levels changed, {} rarities changed",
            pass.pass, pass.levels_changed, pass.rarities_changed
        )?;
        if pass.unpopulated > 0 {
            writeln!(
                out,
                "   {}",
                format!("{} templates at unpopulated depths", pass.unpopulated).red()
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "{}", "⚔️  Strongest Templates".bright_yellow().bold())?;
    writeln!(out, "{}", "======================".yellow())?;
    for (rank, race) in strongest(evaluation).into_iter().enumerate() {
        writeln!(
            out,
            "{:>2}. {:<32} L{:<3} power {:>10}  scaled {:>6}",
            rank + 1,
            race.name.bold(),
            race.level,
            race.derived.power,
            race.derived.scaled_power
        )?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(out: &mut W, evaluation: &Evaluation) -> Result<()> {
    let summary = JsonSummary {
        templates: evaluation.bestiary.len(),
        rebalance: evaluation.config.rebalance,
        total_power: evaluation.outcome.total_power,
        passes: &evaluation.outcome.passes,
        strongest: strongest(evaluation)
            .into_iter()
            .map(RankedTemplate::from)
            .collect(),
    };
    let json_output = serde_json::to_string_pretty(&summary)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

/// Per-depth aggregate rows from the final pass.
pub fn generate_csv_report<W: Write + ?Sized>(out: &mut W, evaluation: &Evaluation) -> Result<()> {
    writeln!(out, "depth,total_hp,total_dam,count")?;
    for bucket in evaluation.outcome.aggregates.buckets() {
        writeln!(
            out,
            "{},{},{},{}",
            bucket.depth, bucket.total_hp, bucket.total_dam, bucket.count
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestiary_power::{BestiaryData, PowerConfig, PowerNormalizer, SpeedTable};

    fn evaluation() -> Evaluation {
        let mut bestiary = BestiaryData::from_json(include_str!(
            "../../bestiary-power/data/sample_bestiary.json"
        ))
        .unwrap();
        let outcome = PowerNormalizer::new(SpeedTable::default(), false)
            .run(&mut bestiary.races)
            .unwrap();
        Evaluation {
            bestiary,
            config: PowerConfig::default(),
            outcome,
        }
    }

    #[test]
    fn csv_lists_every_depth() {
        let mut out = Vec::new();
        generate_csv_report(&mut out, &evaluation()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("depth,total_hp,total_dam,count\n0,0,0,0\n"));
        assert_eq!(text.lines().count(), 129);
    }

    #[test]
    fn json_summary_ranks_named_templates() {
        let evaluation = evaluation();
        let mut out = Vec::new();
        generate_json_report(&mut out, &evaluation).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["templates"], 12);
        assert_eq!(value["passes"].as_array().unwrap().len(), 3);
        let strongest = value["strongest"].as_array().unwrap();
        assert_eq!(strongest.len(), 10);
        assert!(strongest.iter().all(|entry| entry["name"] != ""));
        assert_eq!(value["total_power"], evaluation.outcome.total_power);
    }

    #[test]
    fn console_report_mentions_totals() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        generate_console_report(&mut out, &evaluation()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Templates: 12"));
        assert!(text.contains("Pass 3:"));
        assert!(text.contains("Strongest Templates"));
    }
}
