use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::matching::DEFAULT_THRESHOLD;

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "LARDER_CONFIG";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Recipe catalog
    pub catalog_url: String,
    pub ingredient_image_url: String,
    pub request_timeout_secs: u64,

    // Storage
    pub db_path: String,

    // Server
    pub server_host: String,
    pub server_port: u16,
    pub max_upload_bytes: usize,

    // Matching
    pub match_threshold: f64,
    pub western_areas: Vec<String>,
    pub healthy_categories: Vec<String>,

    // Speech
    pub speech_url: String,
    pub speech_api_key: String,
    pub speech_encoding: String,
    pub speech_sample_rate: u32,
    pub speech_language: String,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: "https://www.themealdb.com/api/json/v1/1".to_string(),
            ingredient_image_url: "https://www.themealdb.com/images/ingredients".to_string(),
            request_timeout_secs: 10,
            db_path: dirs::data_dir()
                .unwrap_or_default()
                .join("larder/larder.db")
                .to_string_lossy()
                .to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            max_upload_bytes: 10 * 1024 * 1024,
            match_threshold: DEFAULT_THRESHOLD,
            western_areas: ["American", "British", "Canadian", "French", "Italian"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            healthy_categories: vec!["Vegan".to_string(), "Vegetarian".to_string()],
            speech_url: "https://speech.googleapis.com/v1/speech:recognize".to_string(),
            speech_api_key: "".to_string(),
            speech_encoding: "WEBM_OPUS".to_string(),
            speech_sample_rate: 48000,
            speech_language: "en-US".to_string(),
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from an explicit path
    ///
    /// A corrupt file is moved aside to `config.json.corrupt` and defaults are used.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str::<Config>(&content) {
            Ok(config) => Ok(config.validated()),
            Err(e) => {
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = path.with_extension("json.corrupt");
                let _ = std::fs::rename(path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Clamp values that would break the matcher back to their defaults
    fn validated(mut self) -> Self {
        if !(self.match_threshold > 0.0 && self.match_threshold <= 1.0) {
            tracing::warn!(
                "⚠️ match_threshold {} outside (0, 1], using {}",
                self.match_threshold,
                DEFAULT_THRESHOLD
            );
            self.match_threshold = DEFAULT_THRESHOLD;
        }
        self
    }
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("larder")
        .join("config.json")
}
