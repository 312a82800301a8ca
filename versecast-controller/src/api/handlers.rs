//! HTTP request handlers
//!
//! Each handler turns a request into a `Command`, dispatches it through the
//! session and returns the reply as JSON.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::ApiResult;
use super::server::AppState;
use crate::controller::{Command, Reply};
use crate::playlist::{EntryId, PlaylistEntry};
use crate::presenter::Presenter;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
pub struct AddSongRequest {
    song_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    old_index: usize,
    new_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    index: usize,
}

// ============================================================================
// Health
// ============================================================================

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "versecast-controller".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Catalog
// ============================================================================

/// GET /api/songs?q= - Search the catalog (empty query lists every song)
pub async fn search_songs(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Reply>> {
    debug!("Search request: '{}'", query.q);
    let reply = state.session.dispatch(Command::Search { query: query.q }).await?;
    Ok(Json(reply))
}

// ============================================================================
// Playlist
// ============================================================================

/// GET /api/playlist
pub async fn get_playlist(State(state): State<AppState>) -> Json<Vec<PlaylistEntry>> {
    Json(state.session.playlist().await)
}

/// POST /api/playlist - Format a catalog song and append it
pub async fn add_song(
    State(state): State<AppState>,
    Json(req): Json<AddSongRequest>,
) -> ApiResult<(StatusCode, Json<Reply>)> {
    info!("Add song request: catalog index {}", req.song_index);
    let reply = state
        .session
        .dispatch(Command::AddSong {
            song_index: req.song_index,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(reply)))
}

/// DELETE /api/playlist/:id
///
/// Removing an id that is not in the playlist succeeds and changes nothing.
pub async fn remove_entry(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> ApiResult<StatusCode> {
    info!("Remove entry request: {}", id);
    state.session.dispatch(Command::Remove { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/playlist/reorder - Move one entry to a new position
pub async fn reorder_playlist(
    State(state): State<AppState>,
    Json(req): Json<ReorderRequest>,
) -> ApiResult<Json<Reply>> {
    info!("Reorder request: {} -> {}", req.old_index, req.new_index);
    let reply = state
        .session
        .dispatch(Command::Reorder {
            old_index: req.old_index,
            new_index: req.new_index,
        })
        .await?;
    Ok(Json(reply))
}

/// POST /api/playlist/clear
pub async fn clear_playlist(State(state): State<AppState>) -> ApiResult<Json<Reply>> {
    info!("Clear playlist request");
    Ok(Json(state.session.dispatch(Command::Clear).await?))
}

/// GET /api/playlist/export - Playlist as a `playlist.json` download
pub async fn export_playlist(State(state): State<AppState>) -> ApiResult<Response> {
    let json = state.session.export().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"playlist.json\"",
            ),
        ],
        json,
    )
        .into_response())
}

/// POST /api/playlist/import - Replace the playlist with an uploaded file
///
/// The request body is the file content; `Content-Type` carries the file's
/// MIME type.
pub async fn import_playlist(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Reply>> {
    let mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    info!("Import request: {} bytes of '{}'", body.len(), mime);

    let reply = state
        .session
        .dispatch(Command::Import {
            mime,
            contents: body.to_vec(),
        })
        .await?;
    Ok(Json(reply))
}

/// GET /api/playlist/:id/verses - Open an entry in the presenter
pub async fn open_entry(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> ApiResult<Json<Reply>> {
    Ok(Json(state.session.dispatch(Command::Open { id }).await?))
}

// ============================================================================
// Presenter
// ============================================================================

/// GET /api/presenter
pub async fn get_presenter(State(state): State<AppState>) -> Json<Presenter> {
    Json(state.session.presenter().await)
}

/// POST /api/presenter/select - Select one line and broadcast it
pub async fn select_verse(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> ApiResult<Json<Reply>> {
    debug!("Select verse request: {}", req.index);
    let reply = state
        .session
        .dispatch(Command::Select { index: req.index })
        .await?;
    Ok(Json(reply))
}

/// POST /api/presenter/next
pub async fn next_verse(State(state): State<AppState>) -> ApiResult<Json<Reply>> {
    Ok(Json(state.session.dispatch(Command::Next).await?))
}

/// POST /api/presenter/previous
pub async fn previous_verse(State(state): State<AppState>) -> ApiResult<Json<Reply>> {
    Ok(Json(state.session.dispatch(Command::Previous).await?))
}

/// POST /api/presenter/blank - Clear the display
pub async fn blank_display(State(state): State<AppState>) -> ApiResult<Json<Reply>> {
    info!("Blank display request");
    Ok(Json(state.session.dispatch(Command::Blank).await?))
}
