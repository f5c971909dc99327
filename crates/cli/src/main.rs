mod commands;
mod config;
mod destination;
mod logging;

use cassie_core::{Direction, FileSelection};
use clap::{Parser, Subcommand};
use commands::*;
use config::{CassieConfig, EnvConfig, LogFormat};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "cassie")]
#[command(about = "Apply and roll back filename-dated schema migrations")]
#[command(version)]
struct Cli {
    /// Directory holding the migration scripts (falls back to the working directory)
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    /// Destination database url, overrides DATABASE_URL and the CASSIE_DB_* parts
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format: plain, pretty, json
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply every up script, oldest first
    Up {
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply every down script, newest first
    Down {
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the ordered migration plan without touching the database
    Plan {
        /// Only show one direction
        #[arg(long, short, value_parser = Direction::from_str)]
        direction: Option<Direction>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show discovered migrations and whether they are ready to run
    Status,

    /// Check that the destination database is reachable
    Verify,

    /// Create a new up/down migration pair dated today
    New {
        /// Free-text description, becomes part of the filename
        description: String,

        /// Script file extension
        #[arg(long, default_value = "cql")]
        ext: String,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<CassieConfig> {
    let mut config = CassieConfig::from_env()?;

    if let Some(path) = &cli.path {
        config.migrations_dir = Some(path.clone());
    }
    if let Some(url) = &cli.database_url {
        config.database.url = Some(url.clone());
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.to_lowercase();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = LogFormat::from_str(format)?;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    logging::init_logging(&config.logging).map_err(|e| anyhow::anyhow!(e))?;

    let selection = match &config.migrations_dir {
        Some(dir) => FileSelection::new(dir)?,
        None => FileSelection::current_dir()?,
    };
    tracing::debug!(root = %selection.operations_path().display(), "resolved migration directory");

    match cli.command {
        Commands::Up { json } => migrate::up(&selection, config.database, json).await?,
        Commands::Down { json } => migrate::down(&selection, config.database, json).await?,
        Commands::Plan { direction, json } => plan::run(&selection, direction, json)?,
        Commands::Status => status::run(&selection)?,
        Commands::Verify => verify::run(config.database).await?,
        Commands::New { description, ext } => new::run(&selection, &description, &ext)?,
    }

    Ok(())
}
