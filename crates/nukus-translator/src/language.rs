//! Language names and the codes the public provider understands.
//!
//! Names and ISO codes resolve through `isolang`. The tables below only hold what
//! the public provider spells differently or does not support at all.

use isolang::Language;

use crate::TranslateError;

/// Source code that asks the public provider to detect the language itself
pub const AUTODETECT: &str = "autodetect";

/// Unsupported by the public provider, translated through the closest supported language
const SUBSTITUTES: &[(&str, &str)] = &[
    ("karakalpak", "Uzbek"),
    ("kara-kalpak", "Uzbek"),
    ("kaa", "Uzbek"),
];

/// Provider codes that differ from ISO 639-1, or names ISO spells differently
const ALIASES: &[(&str, &str)] = &[
    ("chinese", "zh-CN"),
    ("chinese (simplified)", "zh-CN"),
    ("chinese (traditional)", "zh-TW"),
    ("zh", "zh-CN"),
    ("kyrgyz", "ky"),
];

/// Spellings of Karakalpak-specific words preferred in translated captions
const KARAKALPAK_HINTS: &[(&str, &str)] = &[("Nókis", "Nukus"), ("awıl", "awil")];

fn table_entry(table: &'static [(&str, &str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| *value)
}

fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find a language by English name or ISO 639-1/639-3 code, ignoring case
pub fn lookup(name_or_code: &str) -> Option<Language> {
    let needle = name_or_code.trim();
    let lower = needle.to_lowercase();

    Language::from_name(needle)
        .or_else(|| Language::from_name(&title_case(&lower)))
        .or_else(|| Language::from_639_1(&lower))
        .or_else(|| Language::from_639_3(&lower))
}

/// Code to send to the public provider, following substitutions
pub fn resolve_public(name_or_code: &str) -> Result<&'static str, TranslateError> {
    let needle = name_or_code.trim();
    let key = needle.to_lowercase();

    if let Some(substitute) = table_entry(SUBSTITUTES, &key) {
        tracing::debug!(
            "{} is not supported by the public provider, using {}",
            needle,
            substitute
        );
        return resolve_public(substitute);
    }
    if let Some(code) = table_entry(ALIASES, &key) {
        return Ok(code);
    }

    lookup(needle)
        .and_then(|language| language.to_639_1())
        .ok_or_else(|| TranslateError::UnknownLanguage(needle.into()))
}

pub fn is_karakalpak(name_or_code: &str) -> bool {
    matches!(
        name_or_code.trim().to_lowercase().as_str(),
        "karakalpak" | "kara-kalpak" | "kaa"
    )
}

/// Replace known spellings in a Karakalpak translation
pub fn apply_karakalpak_hints(text: &str) -> String {
    KARAKALPAK_HINTS
        .iter()
        .fold(text.to_string(), |out, (from, to)| out.replace(from, to))
}
