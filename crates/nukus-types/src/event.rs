use serde::{Deserialize, Serialize};

use crate::style::OverlayStyle;
use crate::types::TextBlock;

/// Name under which recognized blocks are published
pub const OCR_BLOCKS_EVENT: &str = "OCR_BLOCKS";

/// Payload of the [`OCR_BLOCKS_EVENT`] event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrBlocksEvent {
    pub blocks: Vec<TextBlock>,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Blocks extracted from the latest accepted frame
    OcrBlocks(OcrBlocksEvent),
    StatusUpdate {
        status: String,
    },
    OverlayUpdated {
        count: usize,
    },
    StyleChanged(OverlayStyle),
    /// No frames for a while, capture permission may have been revoked
    CaptureStalled {
        idle_secs: u64,
    },
    Shutdown,
}

impl AppEvent {
    pub fn status(status: impl Into<String>) -> Self {
        AppEvent::StatusUpdate {
            status: status.into(),
        }
    }
}
