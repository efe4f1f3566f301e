use serde::{Deserialize, Serialize};

/// Pixel rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// A piece of recognized on-screen text and where it was found.
///
/// Only constructible through validation, so `text` is always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBlockRecord")]
pub struct TextBlock {
    text: String,
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBlock {
    pub fn new(text: impl AsRef<str>, bounds: Rect) -> Result<Self, BlockError> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(BlockError::EmptyText);
        }

        Ok(Self {
            text: text.to_string(),
            left: bounds.left,
            top: bounds.top,
            right: bounds.right,
            bottom: bounds.bottom,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.right, self.bottom)
    }
}

/// Loosely typed block record as it arrives across a process or language boundary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBlockRecord {
    pub text: Option<String>,
    pub left: Option<i32>,
    pub top: Option<i32>,
    pub right: Option<i32>,
    pub bottom: Option<i32>,
}

impl TryFrom<RawBlockRecord> for TextBlock {
    type Error = BlockError;

    fn try_from(record: RawBlockRecord) -> Result<Self, Self::Error> {
        let text = record.text.ok_or(BlockError::EmptyText)?;
        match (record.left, record.top, record.right, record.bottom) {
            (Some(left), Some(top), Some(right), Some(bottom)) => {
                TextBlock::new(text, Rect::new(left, top, right, bottom))
            }
            _ => Err(BlockError::MissingBounds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("block text is empty")]
    EmptyText,

    #[error("block has no bounding box")]
    MissingBounds,
}

/// A recognized block paired with its translation for one render cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedBlock {
    #[serde(flatten)]
    pub block: TextBlock,
    pub translated: String,
}

impl TranslatedBlock {
    pub fn new(block: TextBlock, translated: impl Into<String>) -> Self {
        Self {
            block,
            translated: translated.into(),
        }
    }

    /// Whether there is anything worth drawing for this block
    pub fn has_visible_text(&self) -> bool {
        !self.translated.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_block_trims_and_rejects_blank() {
        let block = TextBlock::new("  Hello \n", Rect::new(0, 0, 10, 10)).unwrap();
        assert_eq!(block.text(), "Hello");

        assert_eq!(
            TextBlock::new(" \t ", Rect::new(0, 0, 10, 10)),
            Err(BlockError::EmptyText)
        );
    }

    #[test]
    fn raw_record_without_bounds_is_rejected() {
        let record = RawBlockRecord {
            text: Some("Menu".into()),
            left: Some(1),
            top: Some(2),
            right: None,
            bottom: Some(4),
        };
        assert_eq!(TextBlock::try_from(record), Err(BlockError::MissingBounds));
    }

    #[test]
    fn text_block_deserializes_through_validation() {
        let ok: TextBlock =
            serde_json::from_str(r#"{"text":"Open","left":1,"top":2,"right":30,"bottom":14}"#)
                .unwrap();
        assert_eq!(ok.bounds(), Rect::new(1, 2, 30, 14));

        let missing = serde_json::from_str::<TextBlock>(r#"{"text":"Open","left":1}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn translated_block_serializes_flat() {
        let block = TextBlock::new("Settings", Rect::new(5, 6, 50, 20)).unwrap();
        let value = serde_json::to_value(TranslatedBlock::new(block, "Sozlamalar")).unwrap();
        assert_eq!(value["text"], "Settings");
        assert_eq!(value["left"], 5);
        assert_eq!(value["translated"], "Sozlamalar");
    }

    #[test]
    fn blank_translation_is_not_visible() {
        let block = TextBlock::new("Settings", Rect::new(5, 6, 50, 20)).unwrap();
        assert!(!TranslatedBlock::new(block.clone(), "   ").has_visible_text());
        assert!(TranslatedBlock::new(block, "Sozlamalar").has_visible_text());
    }

    #[test]
    fn rect_union_covers_both() {
        let a = Rect::new(10, 10, 20, 20);
        let b = Rect::new(5, 15, 25, 18);
        assert_eq!(a.union(&b), Rect::new(5, 10, 25, 20));
    }
}
