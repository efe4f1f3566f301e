use anyhow::{Context, Result};
use async_trait::async_trait;
use image::imageops::{self, FilterType};
use nukus_capture::Frame;
use nukus_types::Rect;
use windows::Globalization::Language;
use windows::Graphics::Imaging::{BitmapPixelFormat, SoftwareBitmap};
use windows::Media::Ocr::OcrEngine;
use windows::Storage::Streams::DataWriter;
use windows::core::HSTRING;

use crate::backend::{OcrBackend, RecognizedRegion};
use crate::com::ComGuard;

/// Windows.Media.Ocr, one region per recognized line
pub struct WindowsOcrBackend {
    engine: OcrEngine,
    language: String,
}

impl WindowsOcrBackend {
    /// Engine for a BCP-47 tag, or the user profile languages when blank
    pub fn new(language: &str) -> Result<Self> {
        let engine = if language.trim().is_empty() {
            OcrEngine::TryCreateFromUserProfileLanguages()
                .context("Failed to create OCR engine for user languages")?
        } else {
            let lang = Language::CreateLanguage(&HSTRING::from(language))
                .context("Failed to create language")?;
            OcrEngine::TryCreateFromLanguage(&lang)
                .with_context(|| format!("No OCR engine for language '{language}'"))?
        };

        Ok(Self {
            engine,
            language: language.to_string(),
        })
    }
}

#[async_trait]
impl OcrBackend for WindowsOcrBackend {
    async fn recognize(&self, frame: Frame) -> Result<Vec<RecognizedRegion>> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || {
            let _com = ComGuard::initialize()?;
            recognize_frame(&engine, &frame)
        })
        .await
        .context("OCR task failed")?
    }

    fn name(&self) -> &str {
        &self.language
    }
}

fn recognize_frame(engine: &OcrEngine, frame: &Frame) -> Result<Vec<RecognizedRegion>> {
    let max = OcrEngine::MaxImageDimension().context("Failed to query max image size")? as f32;
    let (width, height) = (frame.width() as f32, frame.height() as f32);
    let scale = (max / width).min(max / height).min(1.0);

    // The engine rejects images larger than its max dimension
    let scaled;
    let image = if scale < 1.0 {
        scaled = imageops::resize(
            &frame.image,
            (width * scale) as u32,
            (height * scale) as u32,
            FilterType::Triangle,
        );
        &scaled
    } else {
        &frame.image
    };

    let writer = DataWriter::new().context("Failed to create writer")?;
    writer
        .WriteBytes(image.as_raw())
        .context("Failed to write pixels")?;
    let buffer = writer.DetachBuffer().context("Failed to detach buffer")?;

    let bitmap = SoftwareBitmap::CreateCopyFromBuffer(
        &buffer,
        BitmapPixelFormat::Rgba8,
        image.width() as i32,
        image.height() as i32,
    )
    .context("Failed to create bitmap")?;
    let bitmap = SoftwareBitmap::Convert(&bitmap, BitmapPixelFormat::Bgra8)
        .context("Failed to convert bitmap")?;

    let result = engine
        .RecognizeAsync(&bitmap)
        .context("Failed to recognize async")?
        .get()
        .context("Failed to get OCR result")?;

    let mut regions = Vec::new();
    for line in result.Lines().context("Failed to get lines")? {
        let text = line.Text().context("Failed to get line text")?.to_string();

        let mut bounds: Option<Rect> = None;
        for word in line.Words().context("Failed to get words")? {
            let r = word.BoundingRect().context("Failed to get word bounds")?;
            let rect = Rect::new(
                (r.X / scale) as i32,
                (r.Y / scale) as i32,
                ((r.X + r.Width) / scale) as i32,
                ((r.Y + r.Height) / scale) as i32,
            );
            bounds = Some(match bounds {
                Some(b) => b.union(&rect),
                None => rect,
            });
        }

        regions.push(RecognizedRegion { text, bounds });
    }

    Ok(regions)
}
