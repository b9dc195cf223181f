//! Configuration loader for chanbridge.
//!
//! Reads `config.toml` either from an explicit path or from the platform
//! config directory (`~/.config/chanbridge/config.toml` on Linux) and
//! deserializes it into [`BridgeConfig`].

use std::path::{Path, PathBuf};

use chanbridge_types::config::BridgeConfig;
use chanbridge_types::error::ConfigError;

/// Default location of the config file, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chanbridge").join("config.toml"))
}

/// Load the bridge configuration.
///
/// - With an explicit `path`, the file must exist and parse.
/// - Without one, the default location is tried; a missing file yields
///   [`BridgeConfig::default()`].
/// - A file that exists but fails to read or parse is always an error.
pub async fn load_bridge_config(path: Option<&Path>) -> Result<BridgeConfig, ConfigError> {
    let (config_path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => {
                tracing::debug!("no platform config directory, using defaults");
                return Ok(BridgeConfig::default());
            }
        },
    };

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return Ok(BridgeConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: config_path.display().to_string(),
                reason: err.to_string(),
            });
        }
    };

    let config = toml::from_str::<BridgeConfig>(&content).map_err(|err| ConfigError::Parse {
        path: config_path.display().to_string(),
        reason: err.to_string(),
    })?;
    tracing::debug!("Loaded config from {}", config_path.display());
    Ok(config)
}
