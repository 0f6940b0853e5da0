//! Player configuration for vjlink-player
//!
//! Configuration is stored as YAML in the user's config directory.
//! Default location: ~/.config/vjlink/config.yaml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vjlink_core::EngineConfig;
use vjlink_stream::StreamConfig;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Event stream settings (bridge origin, reconnect pacing)
    pub stream: StreamConfig,
    /// Engine behavior (track change policy, blend algorithm)
    pub engine: EngineConfig,
    /// Console display settings
    pub display: DisplayConfig,
}

/// Display configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Seconds between deck status lines (0 disables them)
    pub status_interval_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            status_interval_secs: 2,
        }
    }
}

/// Get the default config file path
///
/// Returns: ~/.config/vjlink/config.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("vjlink")
        .join("config.yaml")
}

/// Load configuration from a YAML file
///
/// If the file doesn't exist, returns default config.
/// If the file exists but is invalid, logs a warning and returns default config.
pub fn load_config(path: &Path) -> PlayerConfig {
    log::info!("load_config: Loading from {:?}", path);

    if !path.exists() {
        log::info!("load_config: Config file doesn't exist, using defaults");
        return PlayerConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<PlayerConfig>(&contents) {
            Ok(config) => {
                log::info!(
                    "load_config: Loaded config - Origin: {}, Track change: {:?}, Blend: {:?}",
                    config.stream.origin,
                    config.engine.on_track_change,
                    config.engine.blend_mode
                );
                config
            }
            Err(e) => {
                log::warn!("load_config: Failed to parse config: {}, using defaults", e);
                PlayerConfig::default()
            }
        },
        Err(e) => {
            log::warn!(
                "load_config: Failed to read config file: {}, using defaults",
                e
            );
            PlayerConfig::default()
        }
    }
}
