//! Session configuration, loaded from TOML.
//!
//! ```toml
//! log_level = "debug"
//!
//! [placement]
//! standard_height = 1.2
//!
//! [settings]
//! has_shown_rotate_tip = true
//! ```
//!
//! Every key is optional.

use std::path::Path;

use log::{info, LevelFilter};
use perch_core::{PlacementConfig, Settings};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    pub placement: PlacementConfig,
    /// Persisted user state; written back whenever the session reports a
    /// settings change.
    pub settings: Settings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            placement: PlacementConfig::default(),
            settings: Settings::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, AppError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            info!("{} not found, using default config", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.placement.validate()?;
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, AppError> {
        self.log_level
            .parse()
            .map_err(|_| AppError::InvalidLogLevel(self.log_level.clone()))
    }
}
