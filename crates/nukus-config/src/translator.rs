use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(60);

fn default_source_lang() -> String {
    "English".to_string()
}

fn default_target_lang() -> String {
    "Uzbek".to_string()
}

fn default_public_url() -> String {
    "https://api.mymemory.translated.net".to_string()
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_retry_backoff_ms() -> u64 {
    2000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    /// Backend proxy holding the provider credentials
    #[serde(default)]
    pub backend_url: String,
    /// Bearer token for the backend proxy
    #[serde(default)]
    pub access_token: String,
    /// Refuse to run without backend credentials
    #[serde(default)]
    pub require_backend: bool,
    /// Public fallback provider, used without credentials
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// Sent to the public provider for a larger daily quota
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Wait before retrying an unchanged screen after a failure, doubled per failure
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            backend_url: String::new(),
            access_token: String::new(),
            require_backend: false,
            public_url: default_public_url(),
            contact_email: None,
            timeout_seconds: default_timeout_seconds(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl TranslatorConfig {
    /// Environment overrides on top of file or default values
    pub fn apply_env(&mut self) {
        let vars = [
            ("NUKUS_BACKEND_URL", &mut self.backend_url),
            ("NUKUS_ACCESS_TOKEN", &mut self.access_token),
            ("NUKUS_SOURCE_LANG", &mut self.source_lang),
            ("NUKUS_TARGET_LANG", &mut self.target_lang),
        ];
        for (name, field) in vars {
            if let Ok(value) = env::var(name) {
                *field = value;
            }
        }

        if let Some(secs) = env::var("TIMEOUT_SECONDS").ok().and_then(|v| v.parse().ok()) {
            self.timeout_seconds = secs;
        }
    }

    /// Delay before the next retry after `failures` consecutive failures
    pub fn retry_backoff(&self, failures: u32) -> Duration {
        let base = Duration::from_millis(self.retry_backoff_ms);
        let factor = 1u32 << failures.saturating_sub(1).min(5);
        base.checked_mul(factor)
            .unwrap_or(MAX_RETRY_BACKOFF)
            .min(MAX_RETRY_BACKOFF)
    }

    /// Backend URL and token, only when both are present
    pub fn backend_credentials(&self) -> Option<(&str, &str)> {
        let url = self.backend_url.trim();
        let token = self.access_token.trim();
        if url.is_empty() || token.is_empty() {
            None
        } else {
            Some((url, token))
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }
}
