//! Controller and display pages
//!
//! Pages, scripts and styles are embedded at compile time.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

const CONTROLLER_HTML: &str = include_str!("../../static/controller.html");
const DISPLAY_HTML: &str = include_str!("../../static/display.html");
const CONTROLLER_JS: &str = include_str!("../../static/controller.js");
const DISPLAY_JS: &str = include_str!("../../static/display.js");
const VERSECAST_CSS: &str = include_str!("../../static/versecast.css");

/// GET / - Operator page: search, playlist, verse list
pub async fn controller_page() -> Html<&'static str> {
    Html(CONTROLLER_HTML)
}

/// GET /display - Audience page showing the current and next verse
pub async fn display_page() -> Html<&'static str> {
    Html(DISPLAY_HTML)
}

/// GET /static/controller.js
pub async fn controller_js() -> Response {
    asset("application/javascript", CONTROLLER_JS)
}

/// GET /static/display.js
pub async fn display_js() -> Response {
    asset("application/javascript", DISPLAY_JS)
}

/// GET /static/versecast.css
pub async fn stylesheet() -> Response {
    asset("text/css", VERSECAST_CSS)
}

fn asset(content_type: &'static str, body: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
        ],
        body,
    )
        .into_response()
}
