//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "MTT_ROOT_FOLDER";

/// Database file name inside the root folder
const DATABASE_FILE: &str = "mtt.db";

/// Service settings loaded from the config file, with compiled defaults.
///
/// The binary may override individual fields from CLI arguments after
/// loading.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP listen port
    pub port: u16,
    /// Include error details in API responses (development mode)
    pub debug: bool,
    /// Base URL prepended to stored audio paths when serving tracks
    pub media_base_url: String,
    /// Restrict random sampling to tracks with complexity/originality/gradus
    pub sample_analyzed_only: bool,
    /// Fixed seed for the random sampler (deterministic playback order)
    pub sampler_seed: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 5740,
            debug: false,
            media_base_url: "/media/".to_string(),
            sample_analyzed_only: false,
            sampler_seed: None,
        }
    }
}

impl ServiceConfig {
    /// Parse settings from TOML text. Unknown keys are ignored so the
    /// config file can also carry `root_folder`.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("invalid config file: {}", e)))
    }

    /// Load settings from the platform config file, falling back to
    /// defaults when no file exists.
    pub fn load() -> Self {
        match load_config_file() {
            Ok(path) => match std::fs::read_to_string(&path) {
                Ok(content) => match Self::from_toml_str(&content) {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("Ignoring {}: {}", path.display(), e);
                        Self::default()
                    }
                },
                Err(_) => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = load_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Create the root folder if missing and return the database path
pub fn prepare_root_folder(root_folder: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root_folder)?;
    Ok(root_folder.join(DATABASE_FILE))
}

/// Get default configuration file path for the platform
fn load_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("mtt").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/mtt/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mtt"))
        .unwrap_or_else(|| PathBuf::from("./mtt_data"))
}
