use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{LanguageCode, ProviderMetadata, TranslateError, Translation, Translator, usable_text};

/// Authenticated proxy that holds the real provider credentials
pub struct BackendTranslator {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BackendRequest<'a> {
    source_lang: &'a str,
    target_lang: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct BackendResponse {
    translation: Option<String>,
}

impl BackendTranslator {
    pub fn new(client: reqwest::Client, base_url: &str, token: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/translate", base_url.trim().trim_end_matches('/')),
            token: token.trim().to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for BackendTranslator {
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&BackendRequest {
                source_lang: &from,
                target_lang: &to,
                text,
            })
            .send()
            .await?;

        let status = response.status();
        match status.as_u16() {
            401 | 403 => return Err(TranslateError::AuthenticationError),
            429 => return Err(TranslateError::RateLimitExceeded),
            _ if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(TranslateError::ApiError(format!(
                    "Backend error {status}: {body}"
                )));
            }
            _ => {}
        }

        let body: BackendResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::ApiError(format!("Failed to parse response: {e}")))?;

        Ok(Translation {
            text: usable_text(body.translation.as_deref())?,
            from,
            to,
            provider: "backend".to_string(),
            confidence: None,
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "backend".to_string(),
            requires_api_key: true,
            free_tier_available: false,
        }
    }
}
