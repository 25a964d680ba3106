use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tripcraft::{Candidate, NameResolver, PlannerConfig, logging, plan_trip};

#[derive(Parser)]
#[command(
    name = "tripcraft",
    version,
    about = "Multi-day itinerary synthesis from scored candidate places"
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true, env = "TRIPCRAFT_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble a day-by-day plan and print it as JSON
    Plan {
        /// JSON file with an array of candidates
        #[arg(long)]
        candidates: PathBuf,
        /// Trip length in days
        #[arg(long)]
        days: usize,
    },
    /// Resolve a free-text place reference against known names
    Resolve {
        /// Text to resolve
        #[arg(long)]
        name: String,
        /// JSON file with an array of candidates whose names are matched too
        #[arg(long)]
        candidates: Option<PathBuf>,
        /// Known place names
        names: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PlannerConfig::load_from_path(cli.config.clone())?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging);

    match cli.command {
        Command::Plan { candidates, days } => {
            if days == 0 {
                bail!("Trip must be at least one day long");
            }
            let pool = read_candidates(&candidates)?;
            let trip = plan_trip(&pool, days, &config);
            if !trip.missing_categories.is_empty() {
                tracing::warn!("Candidate pool is short of {:?}", trip.missing_categories);
            }
            println!("{}", serde_json::to_string_pretty(&trip)?);
        }
        Command::Resolve {
            name,
            candidates,
            mut names,
        } => {
            if let Some(path) = candidates {
                let pool = read_candidates(&path)?;
                names.extend(pool.iter().map(|c| c.display_name().to_string()));
            }
            if names.is_empty() {
                bail!("No place names to resolve against");
            }
            match NameResolver::resolve(&name, &names) {
                Some(found) => println!("{}", serde_json::to_string_pretty(&found)?),
                None => bail!("No match for '{name}'"),
            }
        }
    }

    Ok(())
}

fn read_candidates(path: &Path) -> Result<Vec<Candidate>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read candidates from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse candidates in {}", path.display()))
}
