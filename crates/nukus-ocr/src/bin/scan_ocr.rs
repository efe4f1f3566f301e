//! One-shot OCR check - run with: cargo run -p nukus-ocr --bin scan_ocr -- [language]

use std::time::Instant;

use anyhow::Result;
use nukus_capture::{FrameSurface, MonitorSurface};
use nukus_ocr::TextExtractor;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let language = std::env::args().nth(1).unwrap_or_else(|| "en".to_string());

    let mut surface = MonitorSurface::open(None)?;
    let (width, height) = surface.size();
    tracing::info!("Capturing primary monitor ({}x{})", width, height);

    let start = Instant::now();
    let Some(frame) = surface.acquire_latest()? else {
        anyhow::bail!("Surface produced no frame");
    };
    tracing::info!("Captured in {:?}", start.elapsed());

    let extractor = TextExtractor::new(nukus_ocr::platform_backend(&language)?);

    let start = Instant::now();
    let blocks = extractor.recognize(frame).await;
    tracing::info!("{} blocks in {:?}", blocks.len(), start.elapsed());

    for block in blocks.iter().take(20) {
        let b = block.bounds();
        tracing::info!(
            "  [{},{} {}x{}] {}",
            b.left,
            b.top,
            b.width(),
            b.height(),
            block.text()
        );
    }

    Ok(())
}
