use std::{process::ExitCode, sync::Arc};

use log::{error, info};

use crate::{
    app::construct_app, config::ServerConfig, deck::DeckGenerator,
    persistence::players::PlayerRepositoryImpl,
};

mod app;
mod config;
mod deck;
mod http;
mod logs;
mod persistence;
mod player;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logs::init_logger(&config.log) {
        eprintln!("Failed to initialize logger: {}", e);
        return ExitCode::FAILURE;
    }

    let player_repository =
        match PlayerRepositoryImpl::connect(&config.redis_url, config.redis_db, config.store_timeout)
            .await
        {
            Ok(repo) => repo,
            Err(e) => {
                error!("Failed to connect to redis: {}", e);
                return ExitCode::FAILURE;
            }
        };

    let app = construct_app(
        Arc::new(Box::new(player_repository)),
        DeckGenerator::from_os_rng(),
    );

    info!("Starting application");

    if let Err(e) = http::run(app, &config.bind_address(), shutdown_signal()).await {
        error!("HTTP server failed: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
