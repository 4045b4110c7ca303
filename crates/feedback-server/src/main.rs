//! Feedback Server
//!
//! Collects name/message submissions and serves them back newest first.
//! Backed either by SQLite (the `/api` JSON surface) or by process memory
//! (an HTML page with form posts).

mod config;
mod extractors;
mod handlers;
mod routes;
mod storage;

use anyhow::{Context, Result};
use feedback_core::FeedbackStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, ServerConfig};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FeedbackStore>,
    pub list_limit: usize,
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[FATAL] Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(config.log_format) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Feedback Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server(config).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("feedback_server=info,tower_http=info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.finish())?,
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
    }
    Ok(())
}

async fn run_server(config: ServerConfig) -> Result<()> {
    info!(
        "Config loaded: store={}, bind={}, list_limit={}",
        config.store,
        config.socket_addr(),
        config.list_limit
    );

    let store = storage::open(&config).await?;

    if config.seed_demo_data {
        match storage::seed_demo_data(store.as_ref()).await {
            Ok(0) => info!("Store already has data, skipping demo seed"),
            Ok(n) => info!("Seeded {} demo feedback records", n),
            Err(e) => warn!("Failed to seed demo data: {}", e),
        }
    }

    let state = AppState {
        store,
        list_limit: config.list_limit,
    };
    let app = routes::build_router(state, config.store);

    let addr: SocketAddr = config
        .socket_addr()
        .parse()
        .context("Failed to parse bind address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Server listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
