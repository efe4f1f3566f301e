use std::sync::Arc;

use async_trait::async_trait;
use nukus_config::TranslatorConfig;

use crate::language;
use crate::{
    BackendTranslator, LanguageCode, MyMemoryProvider, ProviderMetadata, PublicTranslator,
    TranslateError, Translation, Translator,
};

/// Configured backend first, public provider when it is missing or fails
#[derive(Clone)]
pub struct TranslationChain {
    backend: Option<Arc<dyn Translator>>,
    fallback: Arc<dyn Translator>,
}

impl TranslationChain {
    pub fn new(backend: Option<Arc<dyn Translator>>, fallback: Arc<dyn Translator>) -> Self {
        Self { backend, fallback }
    }

    pub fn from_config(config: &TranslatorConfig) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        let backend = config.backend_credentials().map(|(url, token)| {
            tracing::info!("Translating through backend {}", url);
            Arc::new(BackendTranslator::new(client.clone(), url, token)) as Arc<dyn Translator>
        });
        if backend.is_none() {
            tracing::info!("No backend credentials, using public provider only");
        }

        let fallback = Arc::new(PublicTranslator::new(MyMemoryProvider::new(
            client,
            &config.public_url,
            config.contact_email.clone(),
        )));

        Ok(Self::new(backend, fallback))
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }
}

#[async_trait]
impl Translator for TranslationChain {
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError> {
        let karakalpak = language::is_karakalpak(&to);
        let finish = |mut translation: Translation| {
            if karakalpak {
                translation.text = language::apply_karakalpak_hints(&translation.text);
            }
            translation
        };

        let backend_error = match &self.backend {
            Some(backend) => match backend.translate(text, from.clone(), to.clone()).await {
                Ok(translation) => return Ok(finish(translation)),
                Err(e) => {
                    tracing::warn!("Backend translation failed, falling back: {}", e);
                    Some(Box::new(e))
                }
            },
            None => None,
        };

        self.fallback
            .translate(text, from, to)
            .await
            .map(finish)
            .map_err(|e| TranslateError::Exhausted {
                backend: backend_error,
                fallback: Box::new(e),
            })
    }

    fn metadata(&self) -> ProviderMetadata {
        let primary = self.backend.as_ref().unwrap_or(&self.fallback).metadata();
        ProviderMetadata {
            name: format!("chain({})", primary.name),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::test_server;

    struct Fixed {
        name: &'static str,
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn ok(name: &'static str, reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: Some(reply),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Translator for Fixed {
        async fn translate(
            &self,
            _text: &str,
            from: LanguageCode,
            to: LanguageCode,
        ) -> Result<Translation, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let text = self
                .reply
                .ok_or_else(|| TranslateError::ApiError(format!("{} down", self.name)))?;
            Ok(Translation {
                text: text.to_string(),
                from,
                to,
                provider: self.name.to_string(),
                confidence: None,
            })
        }

        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                name: self.name.to_string(),
                requires_api_key: false,
                free_tier_available: true,
            }
        }
    }

    #[tokio::test]
    async fn backend_success_skips_fallback() {
        let backend = Fixed::ok("backend", "Salom");
        let fallback = Fixed::ok("public", "Assalomu alaykum");
        let chain = TranslationChain::new(
            Some(backend.clone() as Arc<dyn Translator>),
            fallback.clone(),
        );

        let result = chain.translate("Hello", "English".into(), "Uzbek".into()).await.unwrap();
        assert_eq!(result.provider, "backend");
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn backend_failure_falls_back() {
        let chain = TranslationChain::new(
            Some(Fixed::failing("backend") as Arc<dyn Translator>),
            Fixed::ok("public", "Salom"),
        );

        let result = chain.translate("Hello", "English".into(), "Uzbek".into()).await.unwrap();
        assert_eq!(result.text, "Salom");
        assert_eq!(result.provider, "public");
    }

    #[tokio::test]
    async fn karakalpak_results_get_local_spellings() {
        let chain = TranslationChain::new(
            Some(Fixed::failing("backend") as Arc<dyn Translator>),
            Fixed::ok("public", "Nókis awılı"),
        );

        let result = chain
            .translate("Nukus village", "English".into(), "Karakalpak".into())
            .await
            .unwrap();
        assert_eq!(result.text, "Nukus awili");

        let uzbek = chain
            .translate("Nukus village", "English".into(), "Uzbek".into())
            .await
            .unwrap();
        assert_eq!(uzbek.text, "Nókis awılı");
    }

    #[tokio::test]
    async fn both_failing_is_exhausted() {
        let chain = TranslationChain::new(
            Some(Fixed::failing("backend") as Arc<dyn Translator>),
            Fixed::failing("public"),
        );

        match chain.translate("Hello", "English".into(), "Uzbek".into()).await {
            Err(TranslateError::Exhausted { backend, fallback }) => {
                assert!(backend.is_some());
                assert!(fallback.to_string().contains("public down"));
            }
            other => panic!("expected exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn without_backend_only_fallback_runs() {
        let chain = TranslationChain::new(None, Fixed::failing("public"));
        assert!(!chain.has_backend());

        match chain.translate("Hello", "English".into(), "Uzbek".into()).await {
            Err(TranslateError::Exhausted { backend, .. }) => assert!(backend.is_none()),
            other => panic!("expected exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn backend_500_falls_back_to_public_over_http() {
        let backend = test_server::serve(vec![(500, r#"{"error":"boom"}"#)]).await;
        let public = test_server::serve(vec![(
            200,
            r#"{"responseData":{"translatedText":"Salom dunyo"},"responseStatus":200}"#,
        )])
        .await;

        let client = test_server::client();
        let chain = TranslationChain::new(
            Some(Arc::new(BackendTranslator::new(client.clone(), &backend.url, "tok"))
                as Arc<dyn Translator>),
            Arc::new(PublicTranslator::new(MyMemoryProvider::new(
                client,
                &public.url,
                None,
            ))),
        );

        let result = chain
            .translate("Hello world", "English".into(), "Uzbek".into())
            .await
            .unwrap();
        assert_eq!(result.text, "Salom dunyo");
        assert_eq!(backend.requests().len(), 1);
        assert_eq!(public.requests().len(), 1);
    }

    #[test]
    fn from_config_needs_both_credentials() {
        let mut config = TranslatorConfig::default();
        config.backend_url = "https://proxy.example".into();
        assert!(!TranslationChain::from_config(&config).unwrap().has_backend());

        config.access_token = "nst_token".into();
        assert!(TranslationChain::from_config(&config).unwrap().has_backend());
    }
}
