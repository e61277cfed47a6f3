//! League configuration, loaded from TOML.

use std::fs;
use std::path::{Path, PathBuf};

use league_core::{validate_form_factor, validate_starting_rating, DEFAULT_FORM_WINDOW};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default config file looked up when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "league.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    /// JSON file holding players and matches
    pub data_file: PathBuf,
    /// Single league matches looked at by recent form
    pub form_window: usize,
    /// Double league matches looked at by team form
    pub team_form_window: usize,
    pub default_starting_rating: f64,
    pub default_form_factor: f64,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("league.json"),
            form_window: DEFAULT_FORM_WINDOW,
            team_form_window: DEFAULT_FORM_WINDOW,
            default_starting_rating: 1000.0,
            default_form_factor: 0.0,
            log_level: "info".to_string(),
        }
    }
}

impl LeagueConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.form_window == 0 || self.team_form_window == 0 {
            return Err(ConfigError::Invalid(
                "form windows must be at least 1".to_string(),
            ));
        }
        validate_starting_rating(self.default_starting_rating)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        validate_form_factor(self.default_form_factor)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
