use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use fixturedesk::config::Config;
use fixturedesk::db::{self, MemoryStore, PgStore, Store};
use fixturedesk::{api, cli, services};

#[derive(Parser)]
#[command(name = "fixturedesk")]
#[command(about = "Read-only API over league fixtures, predictions and model features")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Overrides PORT
        #[arg(short, long)]
        port: Option<u16>,
        /// Serve from an in-process store instead of Postgres
        #[arg(long)]
        memory: bool,
    },
    /// Create the schema and seed sample data
    InitDb,
    /// Report probability sums and fixture consistency problems
    Audit,
    /// Print the Poisson correct-score grid for a fixture
    Scoregrid {
        #[arg(short, long)]
        fixture: i32,
        #[arg(short, long, default_value_t = services::DEFAULT_MAX_GOALS)]
        max_goals: u8,
    },
}

async fn serve(config: &Config, port: Option<u16>, memory: bool) -> Result<()> {
    let store: Arc<dyn Store> = if memory {
        tracing::warn!("Using the in-memory store; data is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(PgStore::connect(&config.db).await?)
    };

    // A database that cannot be initialized is fatal at startup.
    db::init_database(store.as_ref()).await?;

    let port = port.unwrap_or(config.port);
    tracing::info!("Starting fixturedesk API server on port {}", port);
    api::serve(port, store).await
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Some(Commands::Serve { port, memory }) => serve(&config, port, memory).await?,
        Some(Commands::InitDb) => {
            tracing::info!("Initializing database...");
            cli::init_db(&config).await?;
        }
        Some(Commands::Audit) => cli::audit(&config).await?,
        Some(Commands::Scoregrid { fixture, max_goals }) => {
            cli::scoregrid(&config, fixture, max_goals).await?;
        }
        None => serve(&config, None, false).await?,
    }

    Ok(())
}
