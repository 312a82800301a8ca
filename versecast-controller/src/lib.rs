//! versecast-controller library interface
//!
//! Lyrics controller: search a song catalog, build a playlist, and broadcast
//! the selected verse to display pages. Exposed as a library so integration
//! tests can drive the router directly.

pub mod api;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod formatter;
pub mod playlist;
pub mod presenter;
pub mod relay;
pub mod search;
pub mod session;
pub mod storage;

pub use api::{build_router, AppState};
pub use controller::{Command, Controller, Effect, Outcome, Reply};
pub use error::{Error, Result};
pub use session::Session;
