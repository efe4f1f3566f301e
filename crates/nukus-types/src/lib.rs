pub mod event;
pub mod style;
pub mod types;

pub use event::{AppEvent, OCR_BLOCKS_EVENT, OcrBlocksEvent};
pub use style::{Argb, OverlayStyle, Rgb};
pub use types::{BlockError, RawBlockRecord, Rect, TextBlock, TranslatedBlock};
