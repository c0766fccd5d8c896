//! neodb CLI - inspect and query NASA's near-Earth object datasets

mod commands;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand};
use neodb::config;
use neodb::extract::{load_approaches, load_neos};
use neodb::ui::Spinner;
use neodb::{build_database, LinkReport, NeoDatabase};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "neodb")]
#[command(version)]
#[command(about = "Near-Earth object database - link NEOs with their close approaches and query them")]
#[command(long_about = r#"
neodb loads NASA's NEO catalog (CSV) and close-approach data (JSON), links
them by designation, and lets you:
  • Inspect a single NEO by designation or name
  • Query close approaches by date, distance, velocity, diameter and hazard
  • Save query results as CSV or JSON

Example usage:
  neodb inspect --pdes 433
  neodb query --start-date 2020-01-01 --max-distance 0.05 --hazardous
  neodb query --date 2029-04-13 --outfile results.json
"#)]
struct Cli {
    /// Path to the NEO catalog (CSV)
    #[arg(long, global = true)]
    neofile: Option<PathBuf>,

    /// Path to the close-approach data (JSON)
    #[arg(long, global = true)]
    cadfile: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one NEO, looked up by designation or name
    Inspect(InspectArgs),

    /// Find close approaches matching every given constraint
    Query(QueryArgs),

    /// Show how the datasets linked together
    Stats,

    /// Write a starter neodb.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["pdes", "name"])))]
pub(crate) struct InspectArgs {
    /// Primary designation, e.g. 433
    #[arg(short, long)]
    pub pdes: Option<String>,

    /// IAU name, e.g. Eros
    #[arg(short, long)]
    pub name: Option<String>,

    /// Also list the NEO's close approaches
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args)]
pub(crate) struct QueryArgs {
    /// Only approaches on this date (YYYY-MM-DD)
    #[arg(long, value_parser = neodb::datetime::parse_date)]
    pub date: Option<NaiveDate>,

    /// Only approaches on or after this date (YYYY-MM-DD)
    #[arg(long, value_parser = neodb::datetime::parse_date)]
    pub start_date: Option<NaiveDate>,

    /// Only approaches on or before this date (YYYY-MM-DD)
    #[arg(long, value_parser = neodb::datetime::parse_date)]
    pub end_date: Option<NaiveDate>,

    /// Minimum approach distance in au
    #[arg(long)]
    pub min_distance: Option<f64>,

    /// Maximum approach distance in au
    #[arg(long)]
    pub max_distance: Option<f64>,

    /// Minimum relative velocity in km/s
    #[arg(long)]
    pub min_velocity: Option<f64>,

    /// Maximum relative velocity in km/s
    #[arg(long)]
    pub max_velocity: Option<f64>,

    /// Minimum NEO diameter in km
    #[arg(long)]
    pub min_diameter: Option<f64>,

    /// Maximum NEO diameter in km
    #[arg(long)]
    pub max_diameter: Option<f64>,

    /// Only potentially hazardous NEOs
    #[arg(long, conflicts_with = "not_hazardous")]
    pub hazardous: bool,

    /// Only NEOs not marked potentially hazardous
    #[arg(long)]
    pub not_hazardous: bool,

    /// Only approaches of the NEO with this designation
    #[arg(long)]
    pub designation: Option<String>,

    /// Only approaches of the NEO with this name
    #[arg(long)]
    pub name: Option<String>,

    /// Maximum number of results (0 for all)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Write results to a .csv or .json file instead of the terminal
    #[arg(short, long)]
    pub outfile: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// Print the `{"ok": true, ...}` envelope used by `--json`
pub(crate) fn emit_success(
    output_mode: OutputMode,
    command: &str,
    data: serde_json::Value,
) -> anyhow::Result<()> {
    if output_mode.is_human() {
        return Ok(());
    }
    let envelope = serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn emit_error(command: &str, err: &anyhow::Error) {
    let envelope = serde_json::json!({
        "ok": false,
        "command": command,
        "error": format!("{:#}", err),
    });
    println!("{}", envelope);
}

fn main() {
    let cli = Cli::parse();
    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };
    let command = match cli.command {
        Commands::Inspect(_) => "inspect",
        Commands::Query(_) => "query",
        Commands::Stats => "stats",
        Commands::Init { .. } => "init",
    };

    if let Err(err) = run(cli, output_mode) {
        if output_mode.is_human() {
            neodb::ui::error(&format!("{:#}", err));
        } else {
            emit_error(command, &err);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, output_mode: OutputMode) -> anyhow::Result<()> {
    let Cli { neofile, cadfile, config: config_flag, debug, command, .. } = cli;
    let config_path = config_flag.unwrap_or_else(config::default_config_path);

    if let Commands::Init { force } = command {
        init_logging(debug, None)?;
        return commands::run_init(&config_path, force, output_mode);
    }

    let config = config::load_config(Some(&config_path))?.unwrap_or_default();
    init_logging(debug, config.log_dir.as_deref())?;

    let (db, report) = load_database(
        &config.resolve_neofile(neofile),
        &config.resolve_cadfile(cadfile),
    )?;

    match command {
        Commands::Inspect(args) => commands::run_inspect(&db, &args, output_mode),
        Commands::Query(args) => commands::run_query(&db, &args, &config, output_mode),
        Commands::Stats => commands::run_stats(&db, &report, output_mode),
        Commands::Init { .. } => Ok(()),
    }
}

fn init_logging(debug: bool, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let name = format!("neodb_{}.log", chrono::Local::now().format("%Y-%m-%d"));
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(name))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

fn load_database(neofile: &Path, cadfile: &Path) -> anyhow::Result<(NeoDatabase, LinkReport)> {
    let spinner = Spinner::new(&format!("Loading NEOs from {}", neofile.display()));
    let loaded = load_and_link(&spinner, neofile, cadfile);
    spinner.finish_and_clear();

    let (db, report) = loaded?;
    tracing::debug!("{}", report);
    if !report.is_clean() {
        tracing::warn!(
            "{} dangling close approaches, {} duplicate designations",
            report.dangling.len(),
            report.duplicate_designations.len()
        );
    }
    Ok((db, report))
}

fn load_and_link(
    spinner: &Spinner,
    neofile: &Path,
    cadfile: &Path,
) -> anyhow::Result<(NeoDatabase, LinkReport)> {
    let neos = load_neos(neofile)
        .with_context(|| format!("cannot load NEOs from {}", neofile.display()))?;

    spinner.set_message(&format!("Loading close approaches from {}", cadfile.display()));
    let approaches = load_approaches(cadfile)
        .with_context(|| format!("cannot load close approaches from {}", cadfile.display()))?;

    spinner.set_message("Linking");
    Ok(build_database(neos, approaches))
}
