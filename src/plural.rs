//! Plural-form counts per target locale.
//!
//! The merge engine and the parser never derive plural rules themselves; they
//! ask a [`PluralRules`] implementation how many `numerusform` entries a
//! locale requires. [`BuiltinPluralRules`] ships a small table of common
//! locales, and [`ConfiguredPluralRules`] layers `.tscatrc.json` overrides on
//! top of it.

use std::collections::HashMap;

use thiserror::Error;

/// Largest plural arity any known locale uses (Arabic: zero, one, two, few, many, other).
pub const MAX_PLURAL_FORMS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no plural rule known for locale '{locale}'")]
pub struct UnknownLocale {
    pub locale: String,
}

/// Source of plural-form counts for locale tags.
pub trait PluralRules: Sync {
    /// Number of plural forms required by `locale`.
    fn forms_required(&self, locale: &str) -> Result<u32, UnknownLocale>;

    /// Whether `forms` is an arity some known locale could require.
    ///
    /// Used when a catalog does not name its language, so the exact arity
    /// cannot be checked.
    fn accepts_arity(&self, forms: usize) -> bool {
        (1..=MAX_PLURAL_FORMS as usize).contains(&forms)
    }
}

/// Split a locale tag into candidate lookup keys, most specific first.
///
/// `pt_BR`, `pt-br` and `PT-BR` all yield `["pt-br", "pt"]`.
pub fn lookup_keys(locale: &str) -> Vec<String> {
    let normalized = locale.trim().replace('_', "-").to_ascii_lowercase();
    let mut keys = vec![normalized.clone()];
    if let Some((language, _)) = normalized.split_once('-') {
        keys.push(language.to_string());
    }
    keys
}

// CLDR cardinal categories for the locales Qt Linguist catalogs usually target.
const BUILTIN_TABLE: &[(&str, u32)] = &[
    // other
    ("ja", 1),
    ("zh", 1),
    ("ko", 1),
    ("vi", 1),
    ("th", 1),
    ("id", 1),
    ("ms", 1),
    ("lo", 1),
    ("my", 1),
    // one, other
    ("en", 2),
    ("de", 2),
    ("nl", 2),
    ("sv", 2),
    ("da", 2),
    ("nb", 2),
    ("nn", 2),
    ("no", 2),
    ("fi", 2),
    ("et", 2),
    ("el", 2),
    ("hu", 2),
    ("tr", 2),
    ("bg", 2),
    ("ca", 2),
    ("gl", 2),
    ("eu", 2),
    ("af", 2),
    ("sq", 2),
    ("ka", 2),
    ("hy", 2),
    ("fa", 2),
    ("hi", 2),
    ("bn", 2),
    ("ta", 2),
    ("te", 2),
    ("fr", 2),
    ("pt", 2),
    ("es", 2),
    ("it", 2),
    ("he", 2),
    ("is", 2),
    ("mk", 2),
    ("eo", 2),
    // one, few, other (many folded into other as Qt does)
    ("ru", 3),
    ("uk", 3),
    ("be", 3),
    ("pl", 3),
    ("cs", 3),
    ("sk", 3),
    ("hr", 3),
    ("sr", 3),
    ("bs", 3),
    ("lt", 3),
    ("lv", 3),
    ("ro", 3),
    // one, two, few, other
    ("sl", 4),
    ("gd", 4),
    // one, two, few, many, other
    ("ga", 5),
    ("mt", 5),
    // zero, one, two, few, many, other
    ("ar", 6),
    ("cy", 6),
];

/// Plural counts for common locales.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPluralRules;

impl PluralRules for BuiltinPluralRules {
    fn forms_required(&self, locale: &str) -> Result<u32, UnknownLocale> {
        lookup_keys(locale)
            .iter()
            .find_map(|key| {
                BUILTIN_TABLE
                    .iter()
                    .find(|(tag, _)| tag == key)
                    .map(|(_, count)| *count)
            })
            .ok_or_else(|| UnknownLocale {
                locale: locale.to_string(),
            })
    }
}

/// Built-in table plus user overrides and an optional caller-chosen fallback.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredPluralRules {
    overrides: HashMap<String, u32>,
    fallback: Option<u32>,
}

impl ConfiguredPluralRules {
    pub fn new(overrides: &HashMap<String, u32>, fallback: Option<u32>) -> Self {
        let overrides = overrides
            .iter()
            .map(|(locale, count)| (lookup_keys(locale).remove(0), *count))
            .collect();
        Self {
            overrides,
            fallback,
        }
    }
}

impl PluralRules for ConfiguredPluralRules {
    fn forms_required(&self, locale: &str) -> Result<u32, UnknownLocale> {
        if let Some(count) = lookup_keys(locale)
            .iter()
            .find_map(|key| self.overrides.get(key))
        {
            return Ok(*count);
        }
        match BuiltinPluralRules.forms_required(locale) {
            Ok(count) => Ok(count),
            Err(err) => self.fallback.ok_or(err),
        }
    }
}
