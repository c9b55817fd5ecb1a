//! Layered configuration.
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. `~/.config/scholariq/config.toml`
//! 3. `./scholariq.toml`
//! 4. An explicit file passed by the caller (`--config`)
//! 5. `SCHOLARIQ_*` environment variables, `__` separating sections
//!    (`SCHOLARIQ_GENERATION__TIMEOUT_SECS` -> `generation.timeout_secs`)
//!
//! A bare `GEMINI_API_KEY` is used when no key is configured any other way.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use scholariq_core::domain::{ModelTier, ScoringOptions};
use scholariq_core::error::{AppError, CONFIG_INVALID};
use serde::{Deserialize, Serialize};

use crate::gemini::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_FLASH_MODEL, DEFAULT_PRO_MODEL};

pub const MAX_RETRIES: u32 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 600;

const fn default_timeout_secs() -> u64 {
    60
}

const fn default_recency_window() -> u32 {
    ScoringOptions::DEFAULT_RECENCY_WINDOW_YEARS
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_pro_model() -> String {
    DEFAULT_PRO_MODEL.to_string()
}

fn default_flash_model() -> String {
    DEFAULT_FLASH_MODEL.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct GeminiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_pro_model")]
    pub pro_model: String,
    #[serde(default = "default_flash_model")]
    pub flash_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            pro_model: default_pro_model(),
            flash_model: default_flash_model(),
        }
    }
}

impl GeminiConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn client(&self) -> Result<GeminiClient, AppError> {
        GeminiClient::new(&self.base_url, &self.api_key)?
            .with_models(&self.pro_model, &self.flash_model)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Upper bound for one generation call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts after a retryable failure. At most one.
    #[serde(default)]
    pub retries: u32,
    #[serde(default)]
    pub default_model: ModelTier,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retries: 0,
            default_model: ModelTier::default(),
        }
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CitationsConfig {
    #[serde(default = "default_recency_window")]
    pub recency_window_years: u32,
}

impl Default for CitationsConfig {
    fn default() -> Self {
        Self {
            recency_window_years: default_recency_window(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ScholariqConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub citations: CitationsConfig,
}

fn config_error(e: figment::Error) -> AppError {
    AppError::new(CONFIG_INVALID, "Failed to load configuration").with_details(e.to_string())
}

fn out_of_range(field: &str, reason: String) -> AppError {
    AppError::new(CONFIG_INVALID, "Configuration value out of range")
        .with_details(format!("{field}: {reason}"))
}

impl ScholariqConfig {
    /// Load and validate from every source. Does not read `.env`.
    pub fn load() -> Result<Self, AppError> {
        Self::load_with_file(None)
    }

    /// Load `.env` (if any) first, then every other source.
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();
        Self::load_with_file(explicit)
    }

    pub fn load_with_file(explicit: Option<&Path>) -> Result<Self, AppError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(AppError::new(CONFIG_INVALID, "Configuration file not found")
                    .with_details(format!("path={}", path.display())));
            }
        }
        let mut config: Self = Self::figment(explicit)
            .extract()
            .map_err(config_error)?;
        if config.gemini.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var("GEMINI_API_KEY") {
                config.gemini.api_key = key;
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// The provider chain, exposed so tests can layer their own sources on top.
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                figment = figment.merge(Toml::file(global));
            }
        }

        let local = PathBuf::from("scholariq.toml");
        if local.exists() {
            figment = figment.merge(Toml::file(local));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("SCHOLARIQ_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("scholariq").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let g = &self.generation;
        if g.retries > MAX_RETRIES {
            return Err(out_of_range(
                "generation.retries",
                format!("{} exceeds the maximum of {MAX_RETRIES}", g.retries),
            ));
        }
        if g.timeout_secs == 0 || g.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(out_of_range(
                "generation.timeout_secs",
                format!("{} is outside 1..={MAX_TIMEOUT_SECS}", g.timeout_secs),
            ));
        }
        if self.citations.recency_window_years == 0 {
            return Err(out_of_range(
                "citations.recency_window_years",
                "must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
