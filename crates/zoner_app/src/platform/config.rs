use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zoner_engine::ClientSettings;
use zoner_logging::zoner_info;

pub const CONFIG_FILENAME: &str = "zoner.ron";
pub const API_BASE_ENV: &str = "ZONER_API_BASE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZonerConfig {
    pub api_base: String,
    pub quiet_period_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_response_bytes: u64,
    pub default_document_type: String,
    /// Also write `./zoner.log`.
    pub log_to_file: bool,
    pub verbose: bool,
}

impl Default for ZonerConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            api_base: client.api_base,
            quiet_period_ms: zoner_core::QUIET_PERIOD.as_millis() as u64,
            connect_timeout_ms: client.connect_timeout.as_millis() as u64,
            request_timeout_ms: client.request_timeout.as_millis() as u64,
            max_response_bytes: client.max_response_bytes,
            default_document_type: "Zoning By-law".to_string(),
            log_to_file: false,
            verbose: false,
        }
    }
}

impl ZonerConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            api_base: self.api_base.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_response_bytes: self.max_response_bytes,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// Loads the config from `explicit`, or from `./zoner.ron` when present.
///
/// Only the implicit default file may be missing; an explicit path that
/// cannot be read is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<ZonerConfig, ConfigError> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

    let config = match fs::read_to_string(&path) {
        Ok(text) => {
            let config = parse_config(&path, &text)?;
            zoner_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
            ZonerConfig::default()
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

fn parse_config(path: &Path, text: &str) -> Result<ZonerConfig, ConfigError> {
    ron::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides(
    mut config: ZonerConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ZonerConfig {
    if let Some(base) = lookup(API_BASE_ENV) {
        let base = base.trim();
        if !base.is_empty() {
            config.api_base = base.to_string();
        }
    }
    config
}
