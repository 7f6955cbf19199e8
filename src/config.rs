// File: src/config.rs
use crate::paths::AppPaths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Endpoint returning one random duck as `{"url": "..."}`.
pub const DEFAULT_API_URL: &str = "https://random-d.uk/api/v2/random";

/// Side of the square viewport the duck is cropped into, in pixels.
pub const DEFAULT_IMAGE_SIZE: u32 = 400;

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_image_size() -> u32 {
    DEFAULT_IMAGE_SIZE
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_image_size")]
    pub image_size: u32,

    /// When false (the default) fetch failures only reach the log.
    #[serde(default)]
    pub show_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            image_size: default_image_size(),
            show_errors: false,
        }
    }
}

impl Config {
    /// Loads the user's config file. Fails when the file does not exist;
    /// callers that are happy with defaults use `Config::load().unwrap_or_default()`.
    pub fn load() -> Result<Self> {
        let path = AppPaths::get_config_file_path()?;
        if path.exists() {
            return Self::load_from(&path);
        }
        Err(anyhow::anyhow!("Config file not found"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = AppPaths::get_config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    pub fn get_path_string() -> Result<String> {
        let path = AppPaths::config_file_location()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        Ok(path.to_string_lossy().to_string())
    }
}
