//! HTTP API for versecast-controller
//!
//! REST endpoints for catalog search, playlist management and presenter
//! control, plus the SSE stream and the two embedded pages.

pub mod error;
pub mod handlers;
pub mod server;
pub mod sse;
pub mod ui;

pub use error::{ApiError, ApiResult};
pub use server::{build_router, run, AppState};
