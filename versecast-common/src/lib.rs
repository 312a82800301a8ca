//! # VerseCast Common Library
//!
//! Shared code for the VerseCast services:
//! - Error and result types
//! - Configuration loading and root folder resolution
//! - Broadcast event types and the EventBus
//! - SSE streaming helpers
//! - SQLite initialization and the key-value settings table

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod sse;

pub use error::{Error, Result};
pub use events::{BroadcastMessage, EventBus, VerseCastEvent};
