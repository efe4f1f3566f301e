mod layout;
mod renderer;
mod surface;

pub use layout::{CAPTION_PADDING, Caption, MIN_CAPTION_WIDTH, Padding, layout_captions};
pub use renderer::OverlayRenderer;
pub use surface::{OverlayError, OverlaySurface, TracingSurface};
