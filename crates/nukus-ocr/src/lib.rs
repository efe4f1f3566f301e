mod backend;
#[cfg(windows)]
mod com;
mod extractor;
#[cfg(windows)]
mod winrt;

pub use backend::{OcrBackend, RecognizedRegion};
#[cfg(windows)]
pub use com::ComGuard;
pub use extractor::TextExtractor;
#[cfg(windows)]
pub use winrt::WindowsOcrBackend;

/// Platform OCR backend for the given language, if this platform has one
pub fn platform_backend(language: &str) -> anyhow::Result<std::sync::Arc<dyn OcrBackend>> {
    #[cfg(windows)]
    {
        Ok(std::sync::Arc::new(WindowsOcrBackend::new(language)?))
    }

    #[cfg(not(windows))]
    {
        anyhow::bail!("No OCR backend available on this platform (language {language})")
    }
}
