use nukus_types::{Argb, OverlayStyle, TranslatedBlock};

/// Narrowest caption, so one-word lines stay readable
pub const MIN_CAPTION_WIDTH: i32 = 60;

pub const CAPTION_PADDING: Padding = Padding {
    left: 6,
    top: 4,
    right: 6,
    bottom: 4,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// One translated label, positioned in screen coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub text_size_sp: f32,
    pub text_color: Argb,
    pub background: Argb,
    pub padding: Padding,
}

/// Place a caption over each block that has something to show
pub fn layout_captions(blocks: &[TranslatedBlock], style: &OverlayStyle) -> Vec<Caption> {
    let background = style.background_argb();

    blocks
        .iter()
        .filter(|b| b.has_visible_text())
        .map(|b| {
            let bounds = b.block.bounds();
            Caption {
                text: b.translated.trim().to_string(),
                x: bounds.left,
                y: bounds.top,
                width: bounds.width().max(MIN_CAPTION_WIDTH),
                text_size_sp: style.text_size_sp,
                text_color: style.text_color,
                background,
                padding: CAPTION_PADDING,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use nukus_types::{Rect, Rgb, TextBlock};

    use super::*;

    fn translated(text: &str, bounds: Rect, translation: &str) -> TranslatedBlock {
        TranslatedBlock::new(TextBlock::new(text, bounds).unwrap(), translation)
    }

    #[test]
    fn captions_follow_block_bounds_and_style() {
        let style = OverlayStyle {
            text_size_sp: 18.0,
            text_color: Argb(0xFFFF_EE00),
            bg_color: Rgb(0x10_2030),
            bg_alpha: 0x80,
        };
        let blocks = vec![translated(
            "Downloads",
            Rect::new(100, 40, 300, 70),
            "Yuklamalar",
        )];

        let captions = layout_captions(&blocks, &style);
        assert_eq!(
            captions,
            vec![Caption {
                text: "Yuklamalar".into(),
                x: 100,
                y: 40,
                width: 200,
                text_size_sp: 18.0,
                text_color: Argb(0xFFFF_EE00),
                background: Argb(0x8010_2030),
                padding: CAPTION_PADDING,
            }]
        );
    }

    #[test]
    fn narrow_blocks_get_minimum_width() {
        let blocks = vec![translated("OK", Rect::new(10, 10, 30, 25), "Ha")];
        let captions = layout_captions(&blocks, &OverlayStyle::default());
        assert_eq!(captions[0].width, MIN_CAPTION_WIDTH);
    }

    #[test]
    fn blank_translations_are_skipped() {
        let blocks = vec![
            translated("File", Rect::new(0, 0, 80, 20), "  "),
            translated("Edit", Rect::new(90, 0, 170, 20), "Tahrirlash"),
        ];
        let captions = layout_captions(&blocks, &OverlayStyle::default());
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].text, "Tahrirlash");
    }
}
