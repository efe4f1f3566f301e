mod backend;
mod chain;
pub mod language;
mod public;

#[cfg(test)]
mod test_server;

pub use backend::BackendTranslator;
pub use chain::TranslationChain;
pub use public::{LanguagePair, MyMemoryProvider, PublicProvider, PublicResult, PublicTranslator};

/// Language as configured by the user, a display name like "Uzbek" or an ISO code
pub type LanguageCode = String;

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text from source to target language
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub provider: String,
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
    pub free_tier_available: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Provider returned an empty translation")]
    EmptyTranslation,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("All translation providers failed, last error: {fallback}")]
    Exhausted {
        backend: Option<Box<TranslateError>>,
        fallback: Box<TranslateError>,
    },
}

/// Trimmed translation, or an error when nothing usable came back
pub(crate) fn usable_text(raw: Option<&str>) -> Result<String, TranslateError> {
    let text = raw.unwrap_or_default().trim();
    if text.is_empty() {
        Err(TranslateError::EmptyTranslation)
    } else {
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_results_are_not_usable() {
        assert!(matches!(
            usable_text(None),
            Err(TranslateError::EmptyTranslation)
        ));
        assert!(matches!(
            usable_text(Some(" \n ")),
            Err(TranslateError::EmptyTranslation)
        ));
        assert_eq!(usable_text(Some(" Salom ")).unwrap(), "Salom");
    }
}
