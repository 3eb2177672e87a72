use anyhow::Context;
use folio_editor::EditorConfig;
use folio_renderer::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Folio configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding stored `.json` documents
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Where rendered `.html` files go
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    #[serde(default)]
    pub render: RenderOptions,

    #[serde(default)]
    pub editor: EditorConfig,
}

fn default_src_dir() -> String {
    "content".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

impl Config {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid {}", DEFAULT_CONFIG_NAME))?;
        config.editor.validate()?;
        Ok(config)
    }

    pub fn get_src_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.src_dir)
    }

    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            out_dir: default_out_dir(),
            render: RenderOptions::default(),
            editor: EditorConfig::default(),
        }
    }
}
