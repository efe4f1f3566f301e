use async_trait::async_trait;
use nukus_capture::Frame;
use nukus_types::Rect;

/// A region as reported by an OCR engine, before validation
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedRegion {
    pub text: String,
    pub bounds: Option<Rect>,
}

/// OCR engine interface
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Recognize text regions in a frame
    async fn recognize(&self, frame: Frame) -> anyhow::Result<Vec<RecognizedRegion>>;

    /// Engine name for logs
    fn name(&self) -> &str;
}
