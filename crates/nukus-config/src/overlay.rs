use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OverlayConfig {
    /// Clear captions when a translation cycle fails instead of keeping the last ones
    pub clear_on_error: bool,
    /// Log captions instead of drawing a window
    pub headless: bool,
}
