//! Configuration for the display

use serde::{Deserialize, Serialize};

use crate::core::{Mode, DEFAULT_BLINK_PERIOD};
use crate::input::MAX_INPUT_LEN;

/// Display configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mode id at start-up (40 or 80)
    pub mode: u16,
    /// Border drawn around the drawable area, in pixels per side
    pub border_width: usize,
    /// Keystrokes the handoff queue holds before the host has to wait
    pub key_queue_capacity: usize,
    /// Published frames per cursor/flash blink period
    pub blink_period: u32,
    /// Longest line accepted by a read
    pub max_input_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default().id(),
            border_width: 50,
            key_queue_capacity: 64,
            blink_period: DEFAULT_BLINK_PERIOD,
            max_input_len: MAX_INPUT_LEN,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from default location or return default config
    pub fn load_or_default() -> Self {
        // Try to load from ~/.config/nimbus/config.json
        if let Some(config_dir) = dirs_config_path() {
            let config_path = config_dir.join("config.json");
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(err) => tracing::warn!(path = %config_path.display(), %err, "ignoring config file"),
                }
            }
        }
        Self::default()
    }

    /// Start-up mode; unknown ids fall back to the default mode
    pub fn initial_mode(&self) -> Mode {
        Mode::from_id(self.mode).unwrap_or_default()
    }
}

/// Get the configuration directory path
fn dirs_config_path() -> Option<std::path::PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| std::path::PathBuf::from(home).join(".config").join("nimbus"))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
