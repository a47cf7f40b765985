use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Languages the catalog carries names for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    #[strum(serialize = "en")]
    English,
    #[serde(rename = "hi")]
    #[strum(serialize = "hi")]
    Hindi,
    #[serde(rename = "te")]
    #[strum(serialize = "te")]
    Telugu,
}

impl Locale {
    /// Resolve a locale from a language tag such as `hi`, `te-IN` or `en_US`.
    /// Unknown languages fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Locale::from_str(&language).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

/// Presentation settings handed to whatever renders names or picks colours.
/// Built once from configuration and passed down explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub theme: Theme,
}

/// Per-language names of a catalog entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedNames {
    pub en: String,
    #[serde(default)]
    pub hi: String,
    #[serde(default)]
    pub te: String,
}

impl LocalizedNames {
    pub fn new(en: impl Into<String>, hi: impl Into<String>, te: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            hi: hi.into(),
            te: te.into(),
        }
    }

    pub fn english(en: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ..Default::default()
        }
    }
}

/// Pick the name to show for `locale`, falling back to English when the
/// translation is missing.
pub fn display_name(names: &LocalizedNames, locale: Locale) -> &str {
    let localized = match locale {
        Locale::English => &names.en,
        Locale::Hindi => &names.hi,
        Locale::Telugu => &names.te,
    };

    if localized.trim().is_empty() {
        &names.en
    } else {
        localized
    }
}
