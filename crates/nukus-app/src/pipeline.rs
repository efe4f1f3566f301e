use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use kanal::{AsyncReceiver, AsyncSender};
use nukus_capture::Frame;
use nukus_core::{AppState, CacheKey, ChangeDetector, PipelineStatus, TranslationCache};
use nukus_ocr::TextExtractor;
use nukus_overlay::OverlayRenderer;
use nukus_translator::{TranslateError, Translator};
use nukus_types::{AppEvent, OcrBlocksEvent, TextBlock, TranslatedBlock};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Same signature as the previous cycle, nothing done
    Unchanged,
    Rendered { count: usize },
    TranslationFailed,
}

/// OCR → change detection → cached translation → overlay, one frame at a time
pub struct Pipeline {
    state: Arc<AppState>,
    extractor: TextExtractor,
    translator: Arc<dyn Translator>,
    renderer: Arc<OverlayRenderer>,
    events: AsyncSender<AppEvent>,
    detector: ChangeDetector,
    cache: TranslationCache,
    /// Consecutive failed cycles, drives the retry backoff
    failures: u32,
}

impl Pipeline {
    pub fn new(
        state: Arc<AppState>,
        extractor: TextExtractor,
        translator: Arc<dyn Translator>,
        renderer: Arc<OverlayRenderer>,
        events: AsyncSender<AppEvent>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            state,
            extractor,
            translator,
            renderer,
            events,
            detector: ChangeDetector::new(),
            cache: TranslationCache::new(cache_capacity),
            failures: 0,
        }
    }

    pub async fn run_cycle(&mut self, frame: Frame) -> CycleOutcome {
        let blocks = self.extractor.recognize(frame).await;
        self.process_blocks(blocks).await
    }

    pub async fn process_blocks(&mut self, blocks: Vec<TextBlock>) -> CycleOutcome {
        self.emit(AppEvent::OcrBlocks(OcrBlocksEvent {
            blocks: blocks.clone(),
        }))
        .await;

        if self.detector.observe(&blocks).is_none() {
            PipelineStatus::bump(&self.state.status.cycles_unchanged);
            tracing::trace!(">>> [PIPELINE] unchanged, skipping");
            return CycleOutcome::Unchanged;
        }

        let (source, target, clear_on_error) = {
            let config = self.state.config.read().await;
            (
                config.translator.source_lang.clone(),
                config.translator.target_lang.clone(),
                config.overlay.clear_on_error,
            )
        };

        match self.translate_unique(&blocks, &source, &target).await {
            Ok(translations) => {
                let translated: Vec<TranslatedBlock> = blocks
                    .into_iter()
                    .map(|block| {
                        let text = translations.get(block.text()).cloned().unwrap_or_default();
                        TranslatedBlock::new(block, text)
                    })
                    .collect();

                self.failures = 0;
                let count = translated.len();
                self.renderer.set_blocks(translated);
                PipelineStatus::bump(&self.state.status.cycles_rendered);
                self.emit(AppEvent::OverlayUpdated { count }).await;
                CycleOutcome::Rendered { count }
            }
            Err(e) => {
                PipelineStatus::bump(&self.state.status.translation_failures);
                tracing::warn!(">>> [PIPELINE] translation failed: {}", e);

                // Retry this screen later even if it does not change
                self.failures = self.failures.saturating_add(1);
                let delay = self
                    .state
                    .config
                    .read()
                    .await
                    .translator
                    .retry_backoff(self.failures);
                self.detector.schedule_retry(Instant::now() + delay);
                tracing::debug!(">>> [PIPELINE] retrying unchanged screen in {:?}", delay);
                if clear_on_error {
                    self.renderer.set_blocks(Vec::new());
                }
                self.emit(AppEvent::status(format!("Error: {e}"))).await;
                CycleOutcome::TranslationFailed
            }
        }
    }

    /// Translate each distinct text once, cache first
    async fn translate_unique(
        &mut self,
        blocks: &[TextBlock],
        source: &str,
        target: &str,
    ) -> Result<HashMap<String, String>, TranslateError> {
        let mut translations = HashMap::new();

        for block in blocks {
            let text = block.text();
            if translations.contains_key(text) {
                continue;
            }

            let key = CacheKey::new(source, target, text);
            if let Some(cached) = self.cache.get(&key) {
                PipelineStatus::bump(&self.state.status.cache_hits);
                translations.insert(text.to_string(), cached.to_string());
                continue;
            }

            let preview: String = text.chars().take(24).collect();
            self.emit(AppEvent::status(format!("Translating: {preview}...")))
                .await;

            let translation = self
                .translator
                .translate(text, source.to_string(), target.to_string())
                .await?;
            tracing::debug!(
                ">>> [PIPELINE] '{}' -> '{}' via {}",
                text,
                translation.text,
                translation.provider
            );

            self.cache.set(key, translation.text.clone());
            translations.insert(text.to_string(), translation.text);
        }

        Ok(translations)
    }

    async fn emit(&self, event: AppEvent) {
        if self.events.send(event).await.is_err() {
            tracing::debug!(">>> [PIPELINE] event channel closed");
        }
    }
}

/// Consume frames until cancelled. A cycle in flight finishes before the next frame is read.
pub async fn pipeline_loop(
    mut pipeline: Pipeline,
    frames: AsyncReceiver<Frame>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[PIPELINE] waiting for frames");

    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => break,
            frame = frames.recv() => match frame {
                Ok(frame) => frame,
                Err(_) => break,
            },
        };

        tokio::select! {
            _ = cancel.cancelled() => break,
            outcome = pipeline.run_cycle(frame) => {
                tracing::trace!("[PIPELINE] cycle: {:?}", outcome);
            }
        }
    }

    tracing::info!("[PIPELINE] stopped");
    Ok(())
}
