//! Runtime configuration
//!
//! The API key, the API base URL and the optional subscriber PIN are resolved
//! once at startup. Each value is taken from the process environment first,
//! then from a JSON config file, then from the built-in default. The binary
//! loads a `.env` file into the environment before this module runs.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Base URL of the TVDB v4 API
pub const DEFAULT_API_URL: &str = "https://api4.thetvdb.com/v4";

const ENV_API_KEY: &str = "TVDB_API_KEY";
const ENV_API_URL: &str = "TVDB_API_URL";
const ENV_PIN: &str = "TVDB_PIN";

/// Errors that can occur while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No API key in the environment or the config file
    #[error("No TVDB API key configured: set TVDB_API_KEY or add \"api_key\" to the config file")]
    MissingApiKey,

    /// An explicitly requested config file does not exist
    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    /// Failed to read the config file
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid JSON
    #[error("Failed to parse config file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Resolved configuration for talking to the catalog API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// API base URL without a trailing slash
    pub api_url: String,
    /// API key sent with the login request
    pub api_key: String,
    /// Subscriber PIN for user-supported API keys
    pub pin: Option<String>,
}

/// On-disk shape of the config file; every field is optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_url: Option<String>,
    api_key: Option<String>,
    pin: Option<String>,
}

impl Config {
    /// Loads the configuration from the environment and a config file
    ///
    /// With `config_path` set, that file must exist. Otherwise the file at
    /// [`default_config_path`] is used when present.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::ConfigFileNotFound(path.to_path_buf()));
                }
                read_config_file(path)?
            }
            None => match default_config_path() {
                Some(path) if path.is_file() => read_config_file(&path)?,
                _ => ConfigFile::default(),
            },
        };

        Self::resolve(|name| std::env::var(name).ok(), file)
    }

    /// Merges environment lookups over file values over defaults
    fn resolve<E>(env: E, file: ConfigFile) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let pick = |name: &str, from_file: Option<String>| {
            env(name)
                .filter(|value| !value.trim().is_empty())
                .or(from_file.filter(|value| !value.trim().is_empty()))
                .map(|value| value.trim().to_string())
        };

        let api_key = pick(ENV_API_KEY, file.api_key).ok_or(ConfigError::MissingApiKey)?;
        let api_url = pick(ENV_API_URL, file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let pin = pick(ENV_PIN, file.pin);

        Ok(Self {
            api_url,
            api_key,
            pin,
        })
    }
}

/// Location of the default config file in the platform config directory
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "tvhelper")
        .map(|dirs| dirs.config_dir().join("config.json"))
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    debug!(path = %path.display(), "Reading config file");

    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| ConfigError::ParseFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
