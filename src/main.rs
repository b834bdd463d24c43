use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;
use sqlx::migrate::Migrator;
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use salesdash_core::cli::{Cli, Commands, DbCommands};
use salesdash_core::config::Config;
use salesdash_core::{cli, create_app, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = Config::from_env()?;

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config).await,
        Commands::Seed => cli::handle_seed(&config).await,
        Commands::Db(DbCommands::Migrate) => cli::handle_db_migrate(&config).await,
        Commands::Config => cli::handle_config_validate(&config),
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    // Database pool; a connection failure here aborts startup
    let pool = db::create_pool(config).await?;

    // Run migrations
    let migrator = Migrator::new(Path::new("./migrations")).await?;
    migrator.run(&pool).await?;
    tracing::info!("Database migrations completed");

    let frontend_origin: HeaderValue = config
        .frontend_origin
        .parse()
        .context("FRONTEND_ORIGIN is not a valid header value")?;

    let app_state = AppState { db: pool };
    let app = create_app(app_state, frontend_origin);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
