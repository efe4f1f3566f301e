use std::sync::Arc;
use std::time::Instant;

use nukus_capture::Frame;
use nukus_types::TextBlock;

use crate::backend::{OcrBackend, RecognizedRegion};

/// Turns frames into validated text blocks.
///
/// Never fails: an OCR error means nothing to show for this frame.
#[derive(Clone)]
pub struct TextExtractor {
    backend: Arc<dyn OcrBackend>,
}

impl TextExtractor {
    pub fn new(backend: Arc<dyn OcrBackend>) -> Self {
        Self { backend }
    }

    pub async fn recognize(&self, frame: Frame) -> Vec<TextBlock> {
        let start = Instant::now();
        match self.backend.recognize(frame).await {
            Ok(regions) => {
                let total = regions.len();
                let blocks = to_blocks(regions);
                tracing::debug!(
                    ">>> [OCR] {}: {} of {} regions usable in {:?}",
                    self.backend.name(),
                    blocks.len(),
                    total,
                    start.elapsed()
                );
                blocks
            }
            Err(e) => {
                tracing::warn!(">>> [OCR] {} failed: {}", self.backend.name(), e);
                Vec::new()
            }
        }
    }
}

/// Keep regions that have both text and a bounding box
fn to_blocks(regions: Vec<RecognizedRegion>) -> Vec<TextBlock> {
    regions
        .into_iter()
        .filter_map(|region| {
            let bounds = region.bounds?;
            TextBlock::new(&region.text, bounds).ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use image::RgbaImage;
    use nukus_types::Rect;

    use super::*;

    struct FixedBackend(Vec<RecognizedRegion>);

    #[async_trait]
    impl OcrBackend for FixedBackend {
        async fn recognize(&self, _frame: Frame) -> anyhow::Result<Vec<RecognizedRegion>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl OcrBackend for FailingBackend {
        async fn recognize(&self, _frame: Frame) -> anyhow::Result<Vec<RecognizedRegion>> {
            anyhow::bail!("model not loaded")
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn frame() -> Frame {
        Frame::new(RgbaImage::new(8, 8))
    }

    #[tokio::test]
    async fn drops_blank_text_and_missing_bounds() {
        let extractor = TextExtractor::new(Arc::new(FixedBackend(vec![
            RecognizedRegion {
                text: "  Downloads ".into(),
                bounds: Some(Rect::new(10, 20, 110, 40)),
            },
            RecognizedRegion {
                text: "   ".into(),
                bounds: Some(Rect::new(0, 0, 5, 5)),
            },
            RecognizedRegion {
                text: "Floating".into(),
                bounds: None,
            },
        ])));

        let blocks = extractor.recognize(frame()).await;
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text(), "Downloads");
        assert_eq!(blocks[0].bounds(), Rect::new(10, 20, 110, 40));
    }

    #[tokio::test]
    async fn backend_failure_yields_no_blocks() {
        let extractor = TextExtractor::new(Arc::new(FailingBackend));
        assert!(extractor.recognize(frame()).await.is_empty());
    }
}
