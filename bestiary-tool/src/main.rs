mod loader;
mod reports;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use bestiary_power::{BestiaryData, BestiaryLoader, Evaluation, PowerConfig, PowerEngine};
use loader::JsonFileLoader;

/// Dump location used when the configuration asks for one without a path.
const DEFAULT_DUMP_PATH: &str = "mon_power.txt";

#[derive(Debug, Parser)]
#[command(name = "bestiary", version)]
#[command(
    about = "Evaluate monster combat power and rebalance depth, experience and rarity"
)]
struct Args {
    /// Monster table to evaluate (JSON)
    #[arg(long, short)]
    input: PathBuf,

    /// Optional evaluation configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overwrite level, experience and rarity from the computed power
    #[arg(long)]
    rebalance: bool,

    /// Write the updated monster table to this path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the pipe-delimited power dump to this path
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "console", "csv"])]
    report: String,

    /// Optional path to write the report instead of stdout
    #[arg(long)]
    report_output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let loader = JsonFileLoader::new(args.input.clone(), args.config.clone());
    let config = apply_overrides(loader.load_config()?, &args);
    let dump_path = resolve_dump_path(&args, &config);

    let engine = PowerEngine::new(loader);
    let evaluation = engine
        .evaluate_with(config)
        .with_context(|| format!("failed to evaluate {}", args.input.display()))?;

    if let Some(path) = &args.output {
        write_table(path, &evaluation.bestiary)?;
    }
    if let Some(path) = &dump_path {
        write_dump(path, &evaluation.bestiary)?;
    }
    write_reports(&args, &evaluation)?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Command-line flags take precedence over the configuration file.
fn apply_overrides(config: PowerConfig, args: &Args) -> PowerConfig {
    let rebalance = config.rebalance || args.rebalance;
    PowerConfig {
        dump: config.dump || args.dump.is_some(),
        ..config.with_rebalance(rebalance)
    }
}

fn resolve_dump_path(args: &Args, config: &PowerConfig) -> Option<PathBuf> {
    match &args.dump {
        Some(path) => Some(path.clone()),
        None if config.dump => Some(PathBuf::from(DEFAULT_DUMP_PATH)),
        None => None,
    }
}

fn write_table(path: &Path, bestiary: &BestiaryData) -> Result<()> {
    let json = bestiary.to_json_pretty()?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("wrote updated table to {}", path.display());
    Ok(())
}

fn write_dump(path: &Path, bestiary: &BestiaryData) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    bestiary_power::write_power_dump(&bestiary.races, &mut writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("wrote power dump to {}", path.display());
    Ok(())
}

fn write_reports(args: &Args, evaluation: &Evaluation) -> Result<()> {
    let mut output_target = OutputTarget::new(args.report_output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, evaluation)?,
        "csv" => reports::generate_csv_report(&mut output_target, evaluation)?,
        _ => {
            if evaluation.bestiary.is_empty() {
                writeln!(&mut output_target, "{}", "No templates evaluated.".yellow())?;
            } else {
                reports::generate_console_report(&mut output_target, evaluation)?;
            }
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            // Keep escape codes out of report files
            colored::control::set_override(false);
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
