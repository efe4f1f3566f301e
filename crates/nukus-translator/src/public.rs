use async_trait::async_trait;
use serde::Deserialize;

use crate::language::{self, AUTODETECT};
use crate::{
    LanguageCode, ProviderMetadata, TranslateError, Translation, Translator, usable_text,
};

/// Language pair in the provider's `source|target` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn code(&self) -> String {
        format!("{}|{}", self.source, self.target)
    }
}

/// Credential-free translation service queried with a single language pair
#[async_trait]
pub trait PublicProvider: Send + Sync {
    async fn query(&self, text: &str, pair: &LanguagePair) -> Result<PublicResult, TranslateError>;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct PublicResult {
    pub text: String,
    pub confidence: Option<f32>,
}

/// MyMemory translation API
pub struct MyMemoryProvider {
    client: reqwest::Client,
    base_url: String,
    contact_email: Option<String>,
}

impl MyMemoryProvider {
    pub fn new(client: reqwest::Client, base_url: &str, contact_email: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            contact_email: contact_email.filter(|e| !e.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<MyMemoryData>,
    #[serde(rename = "responseStatus", default)]
    response_status: serde_json::Value,
    #[serde(rename = "responseDetails", default)]
    response_details: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
    #[serde(rename = "match")]
    match_score: Option<f32>,
}

/// `responseStatus` arrives as a number or a numeric string
fn status_code(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl PublicProvider for MyMemoryProvider {
    async fn query(&self, text: &str, pair: &LanguagePair) -> Result<PublicResult, TranslateError> {
        let url = format!("{}/get", self.base_url);
        let langpair = pair.code();

        let mut params = vec![("q", text), ("langpair", langpair.as_str())];
        if let Some(email) = &self.contact_email {
            params.push(("de", email.as_str()));
        }

        let response = self.client.get(&url).query(&params).send().await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::ApiError(format!("{status}: {body}")));
        }

        let parsed: MyMemoryResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::ApiError(format!("Failed to parse response: {e}")))?;

        match status_code(&parsed.response_status) {
            Some(200) => {}
            Some(429) => return Err(TranslateError::RateLimitExceeded),
            other => {
                return Err(TranslateError::ApiError(format!(
                    "{} for {}: status {:?}, {}",
                    self.name(),
                    langpair,
                    other,
                    parsed.response_details
                )));
            }
        }

        let data = parsed
            .response_data
            .ok_or(TranslateError::EmptyTranslation)?;
        Ok(PublicResult {
            text: usable_text(data.translated_text.as_deref())?,
            confidence: data.match_score,
        })
    }

    fn name(&self) -> &str {
        "MyMemory"
    }
}

/// Public fallback with progressively degraded language pairs
pub struct PublicTranslator<P> {
    provider: P,
}

impl<P: PublicProvider> PublicTranslator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Pairs to try in order: the resolved pair, then source detection.
    ///
    /// Only an unknown target is an error; an unknown source is left to detection.
    pub fn attempts(source: &str, target: &str) -> Result<Vec<LanguagePair>, TranslateError> {
        let target = language::resolve_public(target)?;
        let mut pairs = Vec::with_capacity(2);

        if !source.trim().eq_ignore_ascii_case(AUTODETECT) {
            match language::resolve_public(source) {
                // A substitution can collapse both sides onto one code
                Ok(source) if source == target => {}
                Ok(source) => pairs.push(LanguagePair::new(source, target)),
                Err(e) => tracing::debug!("{}, relying on source detection", e),
            }
        }
        pairs.push(LanguagePair::new(AUTODETECT, target));

        Ok(pairs)
    }
}

#[async_trait]
impl<P: PublicProvider> Translator for PublicTranslator<P> {
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError> {
        let mut last_error = TranslateError::EmptyTranslation;

        for pair in Self::attempts(&from, &to)? {
            match self.provider.query(text, &pair).await {
                Ok(result) => match usable_text(Some(&result.text)) {
                    Ok(text) => {
                        return Ok(Translation {
                            text,
                            from,
                            to,
                            provider: self.provider.name().to_string(),
                            confidence: result.confidence,
                        });
                    }
                    Err(e) => last_error = e,
                },
                Err(TranslateError::RateLimitExceeded) => {
                    return Err(TranslateError::RateLimitExceeded);
                }
                Err(e) => {
                    tracing::debug!("{} failed for {}: {}", self.provider.name(), pair.code(), e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: self.provider.name().to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}
