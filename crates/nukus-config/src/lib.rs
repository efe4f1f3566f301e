use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod cache;
pub mod capture;
pub mod ocr;
pub mod overlay;
pub mod settings;
pub mod translator;

pub use cache::CacheConfig;
pub use capture::CaptureConfig;
pub use ocr::OcrConfig;
pub use overlay::OverlayConfig;
pub use settings::StyleStore;
pub use translator::TranslatorConfig;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub ocr: OcrConfig,
    pub translator: TranslatorConfig,
    pub cache: CacheConfig,
    pub overlay: OverlayConfig,

    /// Watcher loop delta time
    pub delta_time: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            ocr: OcrConfig::default(),
            translator: TranslatorConfig::default(),
            cache: CacheConfig::default(),
            overlay: OverlayConfig::default(),
            delta_time: 1000,
        }
    }
}

impl Config {
    /// Apply environment overrides, used after loading a profile
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(delta_time) = env::var("DELTA_TIME_MS").ok().and_then(|v| v.parse().ok()) {
            self.delta_time = delta_time;
        }
        self.capture.apply_env();
        self.translator.apply_env();
        self
    }

    pub fn watcher_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.delta_time.max(10))
    }

    /// Catch settings that would make the pipeline useless before it starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capture.fps == 0 {
            return Err(ConfigError::Invalid("capture.fps must be at least 1".into()));
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::Invalid(
                "cache.capacity must be at least 1".into(),
            ));
        }
        if self.translator.source_lang.trim().is_empty()
            || self.translator.target_lang.trim().is_empty()
        {
            return Err(ConfigError::MissingLanguage);
        }
        if self.translator.require_backend && self.translator.backend_credentials().is_none() {
            return Err(ConfigError::MissingCredentials);
        }

        if !self.translator.backend_url.trim().is_empty()
            && self.translator.backend_credentials().is_none()
        {
            tracing::warn!("Backend URL set without access token, only the public provider will be used");
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Source and target language must both be set")]
    MissingLanguage,

    #[error("Backend translation is required but backend URL or access token is missing")]
    MissingCredentials,

    #[error("No data directory available on this system")]
    NoDataDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Root folder for profiles and settings
pub fn app_root() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("Nukus"))
        .ok_or(ConfigError::NoDataDir)
}
