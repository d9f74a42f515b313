//! Memory Match - unified CLI
//!
//! Serves the game over HTTP and offers a few database maintenance commands.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use memory_match::{GameRepository, GameService, ServerConfig, router};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    let config = base.with_env()?;

    match cli.command {
        Command::Serve { port, host } => {
            let config = config.with_overrides(host, port, cli.database_url)?;
            run_http_server(config).await
        }
        Command::Migrate => {
            let config = config.with_overrides(None, None, cli.database_url)?;
            run_migrations(config)
        }
        Command::Leaderboard => {
            let config = config.with_overrides(None, None, cli.database_url)?;
            print_leaderboard(config)
        }
    }
}

/// Run the HTTP game server
#[instrument(skip(config), fields(addr = %config.bind_address()))]
async fn run_http_server(config: ServerConfig) -> Result<()> {
    let repository = GameRepository::open(config.database_url().clone())?;
    let app = router(GameService::new(repository));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("Server ready at http://{}/", config.bind_address());
    info!(
        "Routes: POST /game/new, POST /game/{{id}}/play, GET /game/{{id}}, \
         GET /game/{{id}}/history, GET /game/leaderboard, GET /api-docs/openapi.json"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Apply migrations and report how many ran
#[instrument(skip(config))]
fn run_migrations(config: ServerConfig) -> Result<()> {
    let repository = GameRepository::new(config.database_url().clone())?;
    let applied = repository.run_migrations()?;
    info!(applied, database = %config.database_url(), "Database is up to date");
    Ok(())
}

/// Print the leaderboard to stdout
#[instrument(skip(config))]
fn print_leaderboard(config: ServerConfig) -> Result<()> {
    let service = GameService::new(GameRepository::open(config.database_url().clone())?);
    let entries = service.leaderboard()?;
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
