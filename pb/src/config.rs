//! Planbot configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Main planbot configuration
///
/// Passed explicitly into the pieces that need it; nothing reads settings
/// from process-wide state after startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote completion service configuration
    pub llm: LlmConfig,

    /// Plan shape configuration
    pub planning: PlanningConfig,

    /// Profile store configuration
    pub storage: StorageConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain, then apply environment overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_file_chain(config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read just the log level so logging can be set up before the full load
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load_file_chain(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_file_chain(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .planbot.yml
        let local_config = PathBuf::from(".planbot.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/planbot/planbot.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("planbot").join("planbot.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        debug!("load_file_chain: no config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply deployment overrides (`OPENAI_BASE_URL`, `OPENAI_MODEL`, `PLANNING_DAYS`, `MEMORY_PATH`)
    ///
    /// Blank values are ignored. The credential itself is never copied into
    /// the config; see [`LlmConfig::api_key`].
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = get("OPENAI_BASE_URL") {
            debug!(%url, "apply_overrides: OPENAI_BASE_URL");
            self.llm.base_url = url;
        }
        if let Some(model) = get("OPENAI_MODEL") {
            debug!(%model, "apply_overrides: OPENAI_MODEL");
            self.llm.model = model;
        }
        if let Some(days) = get("PLANNING_DAYS") {
            match days.parse::<u32>() {
                Ok(d) => {
                    debug!(%d, "apply_overrides: PLANNING_DAYS");
                    self.planning.days = d;
                }
                Err(_) => warn!(value = %days, "Ignoring PLANNING_DAYS, not a non-negative integer"),
            }
        }
        if let Some(path) = get("MEMORY_PATH") {
            debug!(%path, "apply_overrides: MEMORY_PATH");
            self.storage.path = PathBuf::from(path);
        }
    }
}

/// Remote completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL (the `/chat/completions` path is appended)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.4,
            max_tokens: 800,
            timeout_ms: 60_000,
        }
    }
}

impl LlmConfig {
    /// Read the credential from the configured environment variable
    ///
    /// Unset or blank means no credential, which is the signal to skip the
    /// remote path entirely.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

/// Plan shape configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Planning horizon in days
    pub days: u32,

    /// Directory holding a `plan.pmt` that overrides the embedded prompt
    #[serde(rename = "prompt-dir", skip_serializing_if = "Option::is_none")]
    pub prompt_dir: Option<PathBuf>,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            days: 7,
            prompt_dir: None,
        }
    }
}

/// Profile store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON store document
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: profilestore::default_store_path(),
        }
    }
}
