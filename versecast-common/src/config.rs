//! Configuration loading and root folder resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! Command-line and environment handling lives in the binaries (clap); this
//! module owns the TOML layer and the compiled defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory name used under the platform config/data directories
pub const APP_DIR_NAME: &str = "versecast";

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "VERSECAST_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "versecast.db";

/// Default catalog file name inside the root folder
pub const CATALOG_FILE_NAME: &str = "songs.json";

/// Contents of `config.toml`
///
/// All fields are optional; anything missing falls through to the compiled
/// default. Unknown keys are rejected so typos surface at startup.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    /// Data directory holding the database and default catalog
    pub root_folder: Option<PathBuf>,
    /// HTTP listen port
    pub port: Option<u16>,
    /// HTTP bind address
    pub bind_address: Option<String>,
    /// Catalog source: a file path or an `http(s)://` URL
    pub catalog: Option<String>,
    /// `after_each_stanza` or `once`
    pub chorus_placement: Option<String>,
    /// tracing filter directive, e.g. `info` or `versecast_controller=debug`
    pub log_level: Option<String>,
    /// Broadcast channel buffer size
    pub event_capacity: Option<usize>,
}

impl TomlConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config file: {}", path.display());
        Ok(config)
    }

    /// Load an explicitly requested config file, or the platform default one
    ///
    /// An explicit path that cannot be read is an error. A missing default
    /// config file is not: the service starts on compiled defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            Some(path) => {
                info!("No config file at {} (using defaults)", path.display());
                Ok(Self::default())
            }
            None => {
                warn!("Could not determine config directory (using defaults)");
                Ok(Self::default())
            }
        }
    }
}

/// Resolve the root folder following the documented priority order
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Platform default config file path (`<config_dir>/versecast/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/versecast
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("/var/lib/versecast"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/versecast
        dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/versecast"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\versecast
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\versecast"))
    } else {
        PathBuf::from("./versecast_data")
    }
}

/// Ensure the root folder exists and return the database path inside it
pub fn prepare_root_folder(root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root)?;
    Ok(root.join(DATABASE_FILE_NAME))
}
