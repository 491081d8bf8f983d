#![warn(clippy::all, clippy::pedantic)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use statusboard_service::{Config, LatestStatus, ProbeExecutor, ProbeScheduler, StatusStore, open_store};
use tracing::info;

mod error;
mod routes;
mod state;

use error::AppError;
use logger::init_tracing;
use state::AppState;

/// Single-target uptime monitor with a status page
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    init_tracing();

    let args = Args::parse();
    let config = Config::from_config(args.config.as_ref())?;

    if args.print_config {
        println!("{config}");
        return Ok(());
    }
    info!("{}", config);

    let store = open_store(&config.database.path).await.map_err(AppError::Database)?;
    let store: Arc<dyn StatusStore> = store;
    let latest = Arc::new(LatestStatus::new());

    let executor = ProbeExecutor::new(
        config.monitor.target_url.clone(),
        Duration::from_secs(config.monitor.timeout_seconds),
        store.clone(),
        latest.clone(),
    )
    .map_err(AppError::Checker)?;
    ProbeScheduler::new(Arc::new(executor), Duration::from_secs(config.monitor.interval_seconds)).start();

    let state = web::Data::new(AppState {
        store,
        latest,
        target_url: config.monitor.target_url.clone(),
        history_days: config.server.history_days,
    });

    info!("Listening on {}:{}", config.server.bind, config.server.port);
    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes::routes))
        .bind((config.server.bind.as_str(), config.server.port))?
        .run()
        .await?;

    Ok(())
}
