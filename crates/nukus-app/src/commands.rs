use anyhow::{Context, bail};
use nukus_config::{Config, StyleStore};
use nukus_translator::{TranslationChain, Translator};
use nukus_types::{Argb, OverlayStyle, Rgb};

/// Requested changes to the overlay style, unset fields stay as they are
#[derive(Debug, Default, Clone, clap::Args)]
pub struct StyleChanges {
    /// Caption text size in sp
    #[arg(long)]
    pub text_size: Option<f32>,
    /// Text color, #RRGGBB or #AARRGGBB
    #[arg(long)]
    pub text_color: Option<String>,
    /// Background color, #RRGGBB
    #[arg(long)]
    pub bg_color: Option<String>,
    /// Background opacity, 0-255
    #[arg(long)]
    pub bg_alpha: Option<u8>,
}

impl StyleChanges {
    pub fn apply(&self, mut style: OverlayStyle) -> anyhow::Result<OverlayStyle> {
        if let Some(size) = self.text_size {
            if !(size.is_finite() && size > 0.0) {
                bail!("Text size must be a positive number, got {size}");
            }
            style.text_size_sp = size;
        }
        if let Some(hex) = &self.text_color {
            style.text_color =
                Argb::parse_hex(hex).with_context(|| format!("Invalid text color '{hex}'"))?;
        }
        if let Some(hex) = &self.bg_color {
            style.bg_color =
                Rgb::parse_hex(hex).with_context(|| format!("Invalid background color '{hex}'"))?;
        }
        if let Some(alpha) = self.bg_alpha {
            style.bg_alpha = alpha;
        }
        Ok(style)
    }
}

pub fn style_show(store: &StyleStore) -> anyhow::Result<()> {
    let style = store.load();
    println!("{}", serde_json::to_string_pretty(&style)?);
    Ok(())
}

/// Persist a new style; a running overlay picks it up on its next pass
pub fn style_set(store: &StyleStore, changes: &StyleChanges) -> anyhow::Result<()> {
    let style = changes.apply(store.load())?;
    store.save(&style)?;
    tracing::info!("Saved overlay style to {:?}", store.path());
    println!("{}", serde_json::to_string_pretty(&style)?);
    Ok(())
}

/// One-off translation through the configured chain
pub async fn translate(config: &Config, text: &str) -> anyhow::Result<()> {
    let text = text.trim();
    if text.is_empty() {
        bail!("Nothing to translate");
    }

    let chain = TranslationChain::from_config(&config.translator)?;
    let translation = chain
        .translate(
            text,
            config.translator.source_lang.clone(),
            config.translator.target_lang.clone(),
        )
        .await?;

    tracing::info!(
        "{} -> {} via {}",
        translation.from,
        translation.to,
        translation.provider
    );
    println!("{}", translation.text);
    Ok(())
}
