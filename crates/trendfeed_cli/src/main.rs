//! Trendfeed CLI - command-line interface for the crawler.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "trendfeed")]
#[command(version)]
#[command(about = "A GitHub popular-repository crawler")]
#[command(
    long_about = "Trendfeed periodically discovers highly starred GitHub repositories via the \
search API and maintains a local snapshot of their metadata and README \
content, using ETag-conditional requests to skip unchanged READMEs."
)]
#[command(after_long_help = r#"EXAMPLES
    Run one discovery pass with the configured query:
        $ trendfeed crawl

    Crawl only Go and Rust repositories:
        $ trendfeed crawl --languages go,rust

    Run on the configured cron cadence (default: every 3 hours):
        $ trendfeed schedule

    Manually ingest a single repository:
        $ trendfeed ingest rust-lang/rust

CONFIGURATION
    Trendfeed reads configuration from:
      1. ~/.config/trendfeed/config.toml (or $XDG_CONFIG_HOME/trendfeed/config.toml)
      2. ./trendfeed.toml
      3. Environment variables (TRENDFEED_* prefix)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    TRENDFEED_DATABASE_URL    Database connection string (default: ~/.local/state/trendfeed/trendfeed.db)
    TRENDFEED_GITHUB_TOKEN    GitHub personal access token
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Run one discovery pass over the search endpoint
    Crawl {
        #[command(flatten)]
        args: CrawlArgs,
    },
    /// Run discovery on the configured cron cadence until interrupted
    Schedule {
        #[command(flatten)]
        args: CrawlArgs,
    },
    /// Upsert a single repository by its owner/name composite
    Ingest {
        /// Repository identifier, e.g. "rust-lang/rust"
        full_name: String,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

/// Discovery parameters; unset flags fall back to config values.
#[derive(Debug, Clone, clap::Args)]
struct CrawlArgs {
    /// Base search query (default from config or "stars:>5000")
    #[arg(short, long)]
    query: Option<String>,

    /// Comma-separated language filters, e.g. "go,rust"
    #[arg(short, long)]
    languages: Option<String>,

    /// Search page size (default from config or 50)
    #[arg(short, long)]
    per_page: Option<u32>,

    /// Maximum number of search pages (default from config or 3)
    #[arg(short, long)]
    max_pages: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("trendfeed=info,trendfeed_cli=info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    // Load configuration (config file -> env vars -> defaults)
    let config = config::Config::load();

    let cli = Cli::parse();

    let database_url = config
        .database_url()
        .expect("Failed to determine database URL - this should not happen");

    // Ensure the database directory exists for SQLite
    if database_url.starts_with("sqlite://") {
        let db_path = database_url.trim_start_matches("sqlite://");
        // Strip query parameters (e.g., ?mode=rwc) before path operations
        let db_path = db_path.split('?').next().unwrap_or(db_path);
        let db_path = std::path::Path::new(db_path);

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
    }

    match cli.command {
        Commands::Migrate { action } => {
            commands::migrate::handle_migrate(action, &database_url).await?;
        }
        Commands::Crawl { args } => {
            commands::crawl::handle_crawl(args, &config, &database_url).await?;
        }
        Commands::Schedule { args } => {
            commands::crawl::handle_schedule(args, &config, &database_url).await?;
        }
        Commands::Ingest { full_name } => {
            commands::ingest::handle_ingest(&full_name, &config, &database_url).await?;
        }
    }

    Ok(())
}
