//! # Trip Recommender CLI (`trec`)
//!
//! ## Usage
//!
//! ```bash
//! trec --config ./config/trec.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `trec init` | Create the SQLite database and schema |
//! | `trec import <file>` | Load itineraries from a JSON export |
//! | `trec stats` | Show itinerary counts and a sample record |
//! | `trec recommend` | Print recommendations for a budget and categories |
//! | `trec serve` | Start the HTTP recommendation server |
//! | `trec completions <shell>` | Print shell completions |
//!
//! ## Examples
//!
//! ```bash
//! trec init
//! trec import ./itineraries.json
//! trec recommend --budget 5000 --category beach --category surf
//! trec serve
//! ```

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use trip_recommender::{config, import, logging, migrate, recommend_cmd, server, stats};

/// Trip Recommender CLI — budget- and category-driven itinerary recommendations.
///
/// All commands except `completions` read a TOML configuration file given
/// by `--config`.
#[derive(Parser)]
#[command(
    name = "trec",
    about = "Trip Recommender — budget- and category-driven itinerary recommendations",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/trec.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent: running it on an existing database is safe.
    Init,

    /// Import itineraries from a JSON export.
    ///
    /// The file must hold a JSON array of itinerary documents. Existing
    /// itineraries with the same id are replaced.
    Import {
        /// Path to the JSON file.
        file: PathBuf,

        /// Parse and validate without writing to the database.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show itinerary counts per category and a sample record.
    Stats,

    /// Recommend itineraries closest to a budget.
    ///
    /// Prints the same JSON body the HTTP endpoint returns. Exits with
    /// status 1 when nothing matched.
    Recommend {
        /// Budget in the store's currency unit.
        #[arg(long, allow_negative_numbers = true)]
        budget: f64,

        /// Category to match; repeat for several.
        #[arg(long = "category", required = true)]
        categories: Vec<String>,
    },

    /// Start the HTTP recommendation server.
    ///
    /// Binds to `[server].bind` and serves `POST /services/recommend`.
    Serve,

    /// Print shell completions to stdout.
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "trec", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;
    logging::init(&cfg.logging);

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Import { file, dry_run } => {
            import::run_import(&cfg, &file, dry_run).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Recommend { budget, categories } => {
            if !recommend_cmd::run_recommend(&cfg, budget, categories).await? {
                std::process::exit(1);
            }
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Completions { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
