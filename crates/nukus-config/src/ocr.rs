use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OcrConfig {
    /// BCP-47 tag handed to the recognizer, blank for the user profile languages
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "en".into(),
        }
    }
}
