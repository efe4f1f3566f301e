use std::time::{Duration, Instant};

use image::RgbaImage;

/// One captured screen bitmap
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: RgbaImage,
    pub captured_at: Instant,
}

impl Frame {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            captured_at: Instant::now(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// A compositor surface mirroring the screen
pub trait FrameSurface: Send {
    /// Block until a new frame is published or `timeout` elapses.
    ///
    /// Returns whether a frame is ready.
    fn wait_for_frame(&mut self, timeout: Duration) -> Result<bool, CaptureError>;

    /// Take the most recent frame, if any
    fn acquire_latest(&mut self) -> Result<Option<Frame>, CaptureError>;

    /// Take and immediately release the most recent frame
    fn discard_latest(&mut self) -> Result<(), CaptureError> {
        self.acquire_latest().map(drop)
    }

    /// Release OS resources held by the surface
    fn release(&mut self) {}
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Capture permission was revoked")]
    Revoked,

    #[error("No monitor found")]
    NoMonitor,

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Failed to spawn capture thread: {0}")]
    Spawn(#[from] std::io::Error),
}
