//! Roster Forge - Development Tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use roster_core::config::RosterConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "roster-tools")]
#[command(about = "Development tools for Roster Forge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate army book files
    Validate {
        /// Army book RON files or directories
        #[arg(default_value = "assets/data/army_books")]
        paths: Vec<PathBuf>,
    },
    /// Print a saved roster
    Summary {
        /// Army book RON files or directories
        #[arg(long = "book", required = true)]
        books: Vec<PathBuf>,
        /// Engine configuration RON file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Saved roster JSON
        save: PathBuf,
    },
}

fn load_config(path: Option<PathBuf>) -> Result<RosterConfig, String> {
    let Some(path) = path else {
        return Ok(RosterConfig::default());
    };
    let source = std::fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
    RosterConfig::from_ron_str(&source).map_err(|e| format!("{}: {e}", path.display()))
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { paths } => {
            tracing::info!("Validating {} army book path(s)", paths.len());
            let failures = roster_tools::validate::validate_paths(&paths);
            if failures.is_empty() {
                tracing::info!("Validation passed");
            } else {
                tracing::error!("Validation failed: {} file(s)", failures.len());
                std::process::exit(1);
            }
        }
        Commands::Summary {
            books,
            config,
            save,
        } => {
            let result = load_config(config).and_then(|config| {
                let registry =
                    roster_tools::validate::load_army_books(&books).map_err(|e| e.to_string())?;
                roster_tools::summary::summarize_file(&registry, &config, &save)
                    .map_err(|e| e.to_string())
            });
            match result {
                Ok(text) => print!("{text}"),
                Err(e) => {
                    tracing::error!("Summary failed: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
