//! Command-line arguments and settings resolution for versecast-controller
//!
//! clap merges the command line with `VERSECAST_*` environment variables;
//! anything still unset falls through to the TOML config file and then to
//! the compiled defaults.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use versecast_common::config::{resolve_root_folder, TomlConfig, CATALOG_FILE_NAME, ROOT_FOLDER_ENV};

use crate::catalog::CatalogSource;
use crate::error::{Error, Result};
use crate::formatter::ChorusPlacement;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5760;

/// Default bind address (local operator only)
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";

/// Default broadcast buffer size
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "versecast_controller=info,tower_http=info";

/// Command-line arguments for versecast-controller
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "versecast-controller")]
#[command(about = "Lyrics controller and verse broadcast service for VerseCast")]
#[command(version)]
pub struct Args {
    /// Config file (default: <config_dir>/versecast/config.toml)
    #[arg(short, long, env = "VERSECAST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data directory holding the database and default catalog
    /// (also read from VERSECAST_ROOT_FOLDER)
    #[arg(short, long)]
    pub root_folder: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "VERSECAST_PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "VERSECAST_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Song catalog: file path or http(s) URL
    #[arg(long, env = "VERSECAST_CATALOG")]
    pub catalog: Option<String>,

    /// Chorus placement: after_each_stanza or once
    #[arg(long, env = "VERSECAST_CHORUS_PLACEMENT")]
    pub chorus_placement: Option<String>,

    /// tracing filter directive (RUST_LOG takes precedence)
    #[arg(long, env = "VERSECAST_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Broadcast channel buffer size
    #[arg(long, env = "VERSECAST_EVENT_CAPACITY")]
    pub event_capacity: Option<usize>,

    /// Keep the playlist in memory only (nothing is written to disk)
    #[arg(long)]
    pub ephemeral: bool,
}

/// Fully resolved runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub root_folder: PathBuf,
    pub addr: SocketAddr,
    pub catalog: CatalogSource,
    pub chorus_placement: ChorusPlacement,
    pub log_filter: String,
    pub event_capacity: usize,
    pub ephemeral: bool,
}

impl Settings {
    /// Merge arguments over the config file over compiled defaults
    pub fn resolve(args: &Args, toml: &TomlConfig) -> Result<Self> {
        let root_folder = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV, toml);

        let port = args.port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let bind = args
            .bind_address
            .as_deref()
            .or(toml.bind_address.as_deref())
            .unwrap_or(DEFAULT_BIND_ADDRESS);
        let ip: IpAddr = bind
            .trim()
            .parse()
            .map_err(|_| Error::InvalidInput(format!("invalid bind address '{}'", bind)))?;

        let catalog = match args.catalog.as_deref().or(toml.catalog.as_deref()) {
            Some(source) => CatalogSource::parse(source),
            None => CatalogSource::File(root_folder.join(CATALOG_FILE_NAME)),
        };

        let chorus_placement = match args
            .chorus_placement
            .as_deref()
            .or(toml.chorus_placement.as_deref())
        {
            Some(value) => value.parse()?,
            None => ChorusPlacement::default(),
        };

        let log_filter = args
            .log_level
            .clone()
            .or_else(|| toml.log_level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let event_capacity = args
            .event_capacity
            .or(toml.event_capacity)
            .unwrap_or(DEFAULT_EVENT_CAPACITY);
        if event_capacity == 0 {
            return Err(Error::InvalidInput(
                "event capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            root_folder,
            addr: SocketAddr::new(ip, port),
            catalog,
            chorus_placement,
            log_filter,
            event_capacity,
            ephemeral: args.ephemeral,
        })
    }
}
