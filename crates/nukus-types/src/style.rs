use serde::{Deserialize, Serialize};

/// 32-bit color with alpha in the high byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Argb(pub u32);

/// 24-bit color, the high byte is ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Argb {
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Parses `#RRGGBB` (opaque) or `#AARRGGBB`, leading `#` optional
    pub fn parse_hex(hex: &str) -> Option<Argb> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        match digits.len() {
            6 => Some(Argb(0xFF00_0000 | value)),
            8 => Some(Argb(value)),
            _ => None,
        }
    }

    /// `#RRGGBB` when opaque, `#AARRGGBB` otherwise
    pub fn to_hex(self) -> String {
        if self.alpha() == 0xFF {
            format!("#{:06X}", self.0 & 0x00FF_FFFF)
        } else {
            format!("#{:08X}", self.0)
        }
    }
}

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x00_0000);

    /// Same formats as [`Argb::parse_hex`], alpha is dropped
    pub fn parse_hex(hex: &str) -> Option<Rgb> {
        Argb::parse_hex(hex).map(|c| Rgb(c.0 & 0x00FF_FFFF))
    }

    pub fn with_alpha(self, alpha: u8) -> Argb {
        Argb(((alpha as u32) << 24) | (self.0 & 0x00FF_FFFF))
    }

    pub fn to_hex(self) -> String {
        format!("#{:06X}", self.0 & 0x00FF_FFFF)
    }
}

pub const DEFAULT_TEXT_SIZE_SP: f32 = 14.0;
pub const DEFAULT_BG_ALPHA: u8 = 0x99;

/// Caption appearance, persisted in settings and read when the overlay attaches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StyleSettings", into = "StyleSettings")]
pub struct OverlayStyle {
    pub text_size_sp: f32,
    pub text_color: Argb,
    pub bg_color: Rgb,
    pub bg_alpha: u8,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            text_size_sp: DEFAULT_TEXT_SIZE_SP,
            text_color: Argb::WHITE,
            bg_color: Rgb::BLACK,
            bg_alpha: DEFAULT_BG_ALPHA,
        }
    }
}

impl OverlayStyle {
    pub fn background_argb(&self) -> Argb {
        self.bg_color.with_alpha(self.bg_alpha)
    }
}

/// On-disk shape of [`OverlayStyle`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StyleSettings {
    #[serde(default = "default_text_size")]
    text_size_sp: f32,
    #[serde(default)]
    text_color_hex: String,
    #[serde(default)]
    bg_color_hex: String,
    #[serde(default = "default_bg_alpha")]
    bg_alpha: i64,
}

fn default_text_size() -> f32 {
    DEFAULT_TEXT_SIZE_SP
}

fn default_bg_alpha() -> i64 {
    DEFAULT_BG_ALPHA as i64
}

impl From<StyleSettings> for OverlayStyle {
    fn from(settings: StyleSettings) -> Self {
        let text_size_sp = if settings.text_size_sp.is_finite() && settings.text_size_sp > 0.0 {
            settings.text_size_sp
        } else {
            DEFAULT_TEXT_SIZE_SP
        };

        Self {
            text_size_sp,
            text_color: Argb::parse_hex(&settings.text_color_hex).unwrap_or(Argb::WHITE),
            bg_color: Rgb::parse_hex(&settings.bg_color_hex).unwrap_or(Rgb::BLACK),
            bg_alpha: settings.bg_alpha.clamp(0, 255) as u8,
        }
    }
}

impl From<OverlayStyle> for StyleSettings {
    fn from(style: OverlayStyle) -> Self {
        Self {
            text_size_sp: style.text_size_sp,
            text_color_hex: style.text_color.to_hex(),
            bg_color_hex: style.bg_color.to_hex(),
            bg_alpha: style.bg_alpha as i64,
        }
    }
}
