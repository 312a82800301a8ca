//! VerseCast controller (versecast-controller) - Main entry point
//!
//! Loads the song catalog, restores the saved playlist and serves the
//! controller and display pages.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use versecast_common::config::{prepare_root_folder, TomlConfig};
use versecast_common::db::init_database;
use versecast_common::EventBus;
use versecast_controller::catalog::load_catalog;
use versecast_controller::config::{Args, Settings};
use versecast_controller::storage::{MemoryPlaylistStore, PlaylistStore, SqlitePlaylistStore};
use versecast_controller::{api, AppState, Controller, Session};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml_config =
        TomlConfig::load_or_default(args.config.as_deref()).context("Failed to load config file")?;
    let settings = Settings::resolve(&args, &toml_config).context("Invalid configuration")?;

    // RUST_LOG wins over the configured filter
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting VerseCast controller (versecast-controller) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Root folder: {}", settings.root_folder.display());

    let store: Arc<dyn PlaylistStore> = if settings.ephemeral {
        info!("Ephemeral mode: playlist is kept in memory only");
        Arc::new(MemoryPlaylistStore::new())
    } else {
        let db_path = prepare_root_folder(&settings.root_folder)
            .context("Failed to prepare root folder")?;
        info!("Database path: {}", db_path.display());
        let pool = init_database(&db_path)
            .await
            .context("Failed to initialize database")?;
        Arc::new(SqlitePlaylistStore::new(pool))
    };

    info!("Loading catalog from {}", settings.catalog);
    let catalog = load_catalog(&settings.catalog).await;

    let events = EventBus::new(settings.event_capacity);
    let controller = Controller::new(catalog, settings.chorus_placement);
    let session = Arc::new(Session::new(
        controller,
        store,
        Arc::new(events.clone()),
    ));

    if let Err(e) = session.restore().await {
        warn!("Stored playlist could not be restored, starting empty: {}", e);
    }

    let app = api::build_router(AppState { session, events });

    api::run(settings.addr, app, shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
