use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use nukus_types::OverlayStyle;

use crate::ConfigError;

const STYLE_FILE: &str = "overlay_style.json";

/// Key-value settings file holding the overlay style
#[derive(Debug, Clone)]
pub struct StyleStore {
    path: PathBuf,
}

impl StyleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store inside the app data directory
    pub fn in_app_root() -> Result<Self, ConfigError> {
        Ok(Self::new(crate::app_root()?.join(STYLE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current style, defaults when the file is missing or unreadable
    pub fn load(&self) -> OverlayStyle {
        match fs::read_to_string(&self.path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable style settings {:?}: {}", self.path, e);
                OverlayStyle::default()
            }),
            Err(_) => OverlayStyle::default(),
        }
    }

    pub fn save(&self, style: &OverlayStyle) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(style)?)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!("Saved overlay style to {:?}", self.path);
        Ok(())
    }

    /// Modification time, None if the file does not exist yet
    pub fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }
}

#[cfg(test)]
mod tests {
    use nukus_types::{Argb, Rgb};

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = StyleStore::new(dir.path().join("style.json"));

        assert_eq!(store.load(), OverlayStyle::default());
        assert!(store.modified().is_none());
    }

    #[test]
    fn saved_style_is_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = StyleStore::new(dir.path().join("nested").join("style.json"));

        let style = OverlayStyle {
            text_size_sp: 20.0,
            text_color: Argb(0xFFFF_EE00),
            bg_color: Rgb(0x10_1010),
            bg_alpha: 200,
        };
        store.save(&style).unwrap();

        assert_eq!(store.load(), style);
        assert!(store.modified().is_some());
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(StyleStore::new(path).load(), OverlayStyle::default());
    }
}
