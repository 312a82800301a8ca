//! Shared error type
//!
//! Only the failures the shared code can actually produce: SQLite access,
//! file I/O, and configuration or stored-setting values that do not parse.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// SQLite query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Config file or root folder could not be read or created
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file or stored setting holds an unusable value
    #[error("Configuration error: {0}")]
    Config(String),
}
