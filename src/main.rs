//! boxmark server entry point.

use std::process::ExitCode;

use boxmark::{AppState, Args, LabelStore, LogLevel, ServerConfig};
use clap::Parser;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let config = match ServerConfig::resolve(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(config.log_level);
    log::debug!("Resolved configuration: {:?}", config);

    // Unparseable persisted labels must stop startup
    let store = match LabelStore::load(&config.images_dir, &config.labels_dir) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to load labels: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let listener = match TcpListener::bind(config.bind.as_str()).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind {}: {}", config.bind, e);
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(store, &config.assets_dir, &config.templates_dir);
    if let Err(e) = boxmark::serve(listener, state).await {
        log::error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_logging(level: LogLevel) {
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();
}
