use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use samlvalidate_core::{load_config, validate_config, MemoryUsageStore, UsageStore};
use samlvalidate_server::{api::create_router, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("SAMLVALIDATE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        version = VERSION,
        config_hash = &config_hash[..16],
        services = config.services.len(),
        users_with_attributes = config.attributes.len(),
        udc_identifier = config.saml.udc_identifier,
        "Configuration loaded successfully"
    );

    // Wire collaborators and the usage tracking writer
    let usage_store: Arc<dyn UsageStore> = Arc::new(MemoryUsageStore::new());
    let (state, tracking_writer) = AppState::from_config(&config, usage_store);
    let writer_handle = tokio::spawn(tracking_writer.run());

    // Periodically drop expired tickets and the usage of ended sessions
    let purger = state.purger();
    let purge_interval = config.tickets.purge_interval();
    let purge_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(purge_interval);
        interval.tick().await;
        loop {
            interval.tick().await;
            match purger.purge() {
                Ok(summary) if summary.tickets.total() == 0 => {}
                Ok(summary) => info!(
                    service_tickets = summary.tickets.service_tickets,
                    sessions = summary.tickets.sessions.len(),
                    usage_records = summary.usage_records,
                    "Purged expired tickets"
                ),
                Err(e) => warn!(error = %e, "Ticket purge failed"),
            }
        }
    });

    // Create router
    let app = create_router(Arc::new(state));

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    purge_handle.abort();
    let _ = purge_handle.await;

    // The router owned the last tracking handle, so the writer drains and exits.
    let _ = writer_handle.await;
    info!("Tracking writer stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
