//! HTTP server setup and routing
//!
//! Sets up the axum router: controller and display pages, the playlist and
//! presenter API, and the SSE stream display pages listen on.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use versecast_common::EventBus;

use crate::session::Session;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Controller session; every mutation goes through it
    pub session: Arc<Session>,
    /// Broadcast channel SSE clients subscribe to
    pub events: EventBus,
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Pages and static assets
        .route("/", get(super::ui::controller_page))
        .route("/display", get(super::ui::display_page))
        .route("/static/controller.js", get(super::ui::controller_js))
        .route("/static/display.js", get(super::ui::display_js))
        .route("/static/versecast.css", get(super::ui::stylesheet))

        // Health endpoint
        .route("/health", get(super::handlers::health))

        // Catalog search
        .route("/api/songs", get(super::handlers::search_songs))

        // Playlist management
        .route("/api/playlist", get(super::handlers::get_playlist))
        .route("/api/playlist", post(super::handlers::add_song))
        .route("/api/playlist/reorder", post(super::handlers::reorder_playlist))
        .route("/api/playlist/clear", post(super::handlers::clear_playlist))
        .route("/api/playlist/export", get(super::handlers::export_playlist))
        .route("/api/playlist/import", post(super::handlers::import_playlist))
        .route("/api/playlist/:id", delete(super::handlers::remove_entry))
        .route("/api/playlist/:id/verses", get(super::handlers::open_entry))

        // Presenter control
        .route("/api/presenter", get(super::handlers::get_presenter))
        .route("/api/presenter/select", post(super::handlers::select_verse))
        .route("/api/presenter/next", post(super::handlers::next_verse))
        .route("/api/presenter/previous", post(super::handlers::previous_verse))
        .route("/api/presenter/blank", post(super::handlers::blank_display))

        // SSE event stream
        .route("/events", get(super::sse::event_stream))

        .with_state(state)

        // Display pages may be opened from another origin on the LAN
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serve `app` on `addr` until `shutdown` resolves
pub async fn run<F>(addr: SocketAddr, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    info!("Listening on http://{}", addr);
    info!("Display page: http://{}/display", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
