use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// How strongly a filename suggested its locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Best-effort locale suggestion for one source file. Never an error; an
/// unrecognized filename falls back to the default locale with Low confidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleGuess {
    pub locale: String,
    pub folder: String,
    pub confidence: Confidence,
}

fn folder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^values(?:-([a-z]{2})(?:-r([A-Z]{2}))?)?$").unwrap())
}

fn file_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Trailing locale token in a file stem: "strings_zh-CN", "zh-rCN", "app-fr".
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:^|[_\-.])([a-z]{2})(?:[_\-]r?([a-z]{2}))?$").unwrap()
    })
}

/// Two-letter ISO 639-1 codes the inference accepts as bare tokens.
const ISO_CODES: &[&str] = &[
    "ar", "bn", "cs", "da", "de", "el", "en", "es", "fi", "fr", "he", "hi", "hu", "id", "in",
    "it", "iw", "ja", "ko", "nb", "nl", "no", "pl", "pt", "ro", "ru", "sv", "th", "tr", "uk",
    "vi", "zh",
];

/// English language names mapped to Android locale qualifiers.
const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("english", "en"),
    ("russian", "ru"),
    ("japanese", "ja"),
    ("korean", "ko"),
    ("french", "fr"),
    ("german", "de"),
    ("spanish", "es"),
    ("portuguese", "pt"),
    ("brazilian", "pt-rBR"),
    ("polish", "pl"),
    ("italian", "it"),
    ("turkish", "tr"),
    ("ukrainian", "uk"),
    ("czech", "cs"),
    ("hungarian", "hu"),
    ("dutch", "nl"),
    ("romanian", "ro"),
    ("thai", "th"),
    ("greek", "el"),
    ("arabic", "ar"),
    ("hebrew", "iw"),
    ("indonesian", "in"),
    ("vietnamese", "vi"),
    ("hindi", "hi"),
    ("swedish", "sv"),
    ("danish", "da"),
    ("finnish", "fi"),
    ("chinese", "zh-rCN"),
    ("simplified", "zh-rCN"),
    ("traditional", "zh-rTW"),
];

/// Locale qualifier of a resource folder name: `values` → `""`,
/// `values-zh-rCN` → `zh-rCN`. `None` when the name is not a values folder.
pub fn locale_of(folder_name: &str) -> Option<String> {
    let caps = folder_re().captures(folder_name)?;
    match (caps.get(1), caps.get(2)) {
        (None, _) => Some(String::new()),
        (Some(lang), None) => Some(lang.as_str().to_string()),
        (Some(lang), Some(region)) => Some(format!("{}-r{}", lang.as_str(), region.as_str())),
    }
}

/// Folder name for a locale qualifier; inverse of [`locale_of`].
pub fn folder_for_locale(locale: &str) -> String {
    if locale.is_empty() {
        "values".to_string()
    } else {
        format!("values-{locale}")
    }
}

pub fn is_locale_folder(name: &str) -> bool {
    folder_re().is_match(name)
}

/// Normalize a BCP-47-like token to the Android qualifier form:
/// lowercase language, `-r` + uppercase region (`zh_CN` → `zh-rCN`).
fn android_locale(lang: &str, region: Option<&str>) -> String {
    let lang = lang.to_ascii_lowercase();
    match region {
        Some(r) => format!("{lang}-r{}", r.to_ascii_uppercase()),
        None => lang,
    }
}

/// Infer the target locale from a source file name.
///
/// Precedence: a locale token embedded in the name, then a known language
/// name, then the default locale. Best-effort by contract — this never fails.
pub fn infer_from_file_name(file_name: &str) -> LocaleGuess {
    let stem = file_name
        .strip_suffix(".xml")
        .or_else(|| file_name.strip_suffix(".XML"))
        .unwrap_or(file_name);

    if let Some(caps) = file_token_re().captures(stem) {
        let lang = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let region = caps.get(2).map(|m| m.as_str());
        let known = ISO_CODES.contains(&lang.to_ascii_lowercase().as_str());
        if region.is_some() || known {
            let locale = android_locale(lang, region);
            return LocaleGuess {
                folder: folder_for_locale(&locale),
                locale,
                confidence: Confidence::High,
            };
        }
    }

    let lowered = stem.to_ascii_lowercase();
    for part in lowered.split(['_', '-', '.', ' ']) {
        if let Some((_, locale)) = LANGUAGE_NAMES.iter().find(|(name, _)| *name == part) {
            return LocaleGuess {
                locale: (*locale).to_string(),
                folder: folder_for_locale(locale),
                confidence: Confidence::Medium,
            };
        }
    }

    LocaleGuess {
        locale: String::new(),
        folder: "values".to_string(),
        confidence: Confidence::Low,
    }
}
