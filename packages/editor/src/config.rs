//! Editor configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Tunables for one editor instance
///
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Undo depth (0 = unlimited)
    pub history_max_levels: usize,

    /// Smallest width/height a resize drag may produce, in pixels
    pub media_min_size: f64,

    /// Priority the built-in command handlers register at
    pub builtin_command_priority: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_max_levels: 100,
            media_min_size: 50.0,
            builtin_command_priority: 100,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.media_min_size.is_finite() || self.media_min_size < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "mediaMinSize",
                reason: format!("expected a non-negative number, got {}", self.media_min_size),
            });
        }
        Ok(())
    }
}
