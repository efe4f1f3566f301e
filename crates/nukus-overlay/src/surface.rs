use nukus_types::OverlayStyle;

use crate::layout::Caption;

#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("Overlay is not attached")]
    NotAttached,

    #[error("Overlay surface error: {0}")]
    Surface(String),
}

/// Platform window the captions are drawn into
pub trait OverlaySurface: Send {
    fn attach(&mut self, style: &OverlayStyle) -> Result<(), OverlayError>;

    fn detach(&mut self) -> Result<(), OverlayError>;

    /// Replace everything on screen with `captions`
    fn paint(&mut self, captions: &[Caption]) -> Result<(), OverlayError>;
}

/// Headless surface: captions go to the log
#[derive(Debug, Default)]
pub struct TracingSurface {
    attached: bool,
}

impl TracingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverlaySurface for TracingSurface {
    fn attach(&mut self, style: &OverlayStyle) -> Result<(), OverlayError> {
        tracing::info!(
            "[OVERLAY] headless surface attached (text {}sp {}, background {} alpha {})",
            style.text_size_sp,
            style.text_color.to_hex(),
            style.bg_color.to_hex(),
            style.bg_alpha
        );
        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) -> Result<(), OverlayError> {
        self.attached = false;
        tracing::info!("[OVERLAY] headless surface detached");
        Ok(())
    }

    fn paint(&mut self, captions: &[Caption]) -> Result<(), OverlayError> {
        if !self.attached {
            return Err(OverlayError::NotAttached);
        }

        tracing::info!("[OVERLAY] {} captions", captions.len());
        for caption in captions {
            tracing::info!(
                "  [{},{} w{}] {}",
                caption.x,
                caption.y,
                caption.width,
                caption.text
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_requires_attach() {
        let mut surface = TracingSurface::new();
        assert!(matches!(surface.paint(&[]), Err(OverlayError::NotAttached)));

        surface.attach(&OverlayStyle::default()).unwrap();
        assert!(surface.paint(&[]).is_ok());
    }
}
