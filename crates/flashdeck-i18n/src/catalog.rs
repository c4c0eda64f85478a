#![forbid(unsafe_code)]

//! Key-based string catalog.
//!
//! Lookups walk the requested locale first and then the fallback chain
//! (English by default). Templates use `{name}` placeholders; substitution is
//! a single pass, so replacement values are never expanded again and unknown
//! placeholders are left as they are.

use std::collections::{BTreeSet, HashMap};

use crate::error::I18nError;
use crate::locale::Language;

/// Keys of the built-in strings.
pub mod keys {
    pub const MODAL_CLOSE: &str = "modal.close";
    pub const MODAL_RESIZE: &str = "modal.resize";
    pub const CHUNK_PENDING: &str = "chunk.pending";
    pub const CHUNK_FAILED: &str = "chunk.failed";
    pub const AI_SERVICE_ERROR: &str = "ai.service_error";
    pub const AI_NETWORK_ERROR: &str = "ai.network_error";
    pub const SPEECH_UNSUPPORTED: &str = "speech.unsupported";
    pub const SETTINGS_LANGUAGE: &str = "settings.language";
}

const EN: &[(&str, &str)] = &[
    (keys::MODAL_CLOSE, "Close"),
    (keys::MODAL_RESIZE, "Resize"),
    (keys::CHUNK_PENDING, "Asking AI…"),
    (keys::CHUNK_FAILED, "AI request failed: {message}"),
    (keys::AI_SERVICE_ERROR, "The AI service reported an error"),
    (keys::AI_NETWORK_ERROR, "Could not reach the AI service"),
    (
        keys::SPEECH_UNSUPPORTED,
        "Speech synthesis is not available in this browser",
    ),
    (keys::SETTINGS_LANGUAGE, "Language"),
];

const ZH_CN: &[(&str, &str)] = &[
    (keys::MODAL_CLOSE, "关闭"),
    (keys::MODAL_RESIZE, "调整大小"),
    (keys::CHUNK_PENDING, "正在请求 AI…"),
    (keys::CHUNK_FAILED, "AI 请求失败：{message}"),
    (keys::AI_SERVICE_ERROR, "AI 服务返回错误"),
    (keys::AI_NETWORK_ERROR, "无法连接 AI 服务"),
    (keys::SPEECH_UNSUPPORTED, "当前浏览器不支持语音合成"),
    (keys::SETTINGS_LANGUAGE, "语言"),
];

/// Strings of one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleStrings {
    strings: HashMap<String, String>,
}

impl LocaleStrings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.strings.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocaleStrings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut strings = Self::new();
        for (k, v) in iter {
            strings.insert(k, v);
        }
        strings
    }
}

/// Translation coverage of one locale.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleCoverage {
    pub locale: String,
    pub present: usize,
    pub missing: Vec<String>,
    pub coverage_percent: f64,
}

/// Coverage of every locale against the union of all keys.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageReport {
    pub total_keys: usize,
    pub locales: Vec<LocaleCoverage>,
}

/// Locale tables plus a fallback chain.
#[derive(Debug, Clone)]
pub struct StringCatalog {
    locales: HashMap<String, LocaleStrings>,
    fallback: Vec<String>,
}

impl Default for StringCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl StringCatalog {
    /// Empty catalog falling back to English.
    #[must_use]
    pub fn new() -> Self {
        Self {
            locales: HashMap::new(),
            fallback: vec![Language::English.tag().to_owned()],
        }
    }

    /// Catalog with the built-in English and Simplified Chinese tables.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.add_locale(Language::English.tag(), EN.iter().copied().collect());
        catalog.add_locale(
            Language::SimplifiedChinese.tag(),
            ZH_CN.iter().copied().collect(),
        );
        catalog
    }

    /// Add or merge a locale table. Later inserts win.
    pub fn add_locale(&mut self, locale: &str, strings: LocaleStrings) {
        let entry = self.locales.entry(locale.to_owned()).or_default();
        entry.strings.extend(strings.strings);
    }

    /// Replace the fallback chain walked after the requested locale.
    pub fn set_fallback_chain<I, S>(&mut self, chain: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback = chain.into_iter().map(Into::into).collect();
    }

    /// Known locales, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    /// Raw template for `key`, walking the fallback chain.
    #[must_use]
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        std::iter::once(locale)
            .chain(self.fallback.iter().map(String::as_str))
            .find_map(|l| self.locales.get(l).and_then(|s| s.get(key)))
    }

    /// Template for `key` with `args` substituted.
    #[must_use]
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> Option<String> {
        self.get(locale, key).map(|t| interpolate(t, args))
    }

    /// Like [`format`](Self::format), typed on [`Language`].
    pub fn lookup(
        &self,
        language: Language,
        key: &str,
        args: &[(&str, &str)],
    ) -> Result<String, I18nError> {
        self.format(language.tag(), key, args)
            .ok_or_else(|| I18nError::MissingKey {
                locale: language.tag().to_owned(),
                key: key.to_owned(),
            })
    }

    /// Display text for `key`; the key itself when nothing matches.
    #[must_use]
    pub fn tr(&self, language: Language, key: &str, args: &[(&str, &str)]) -> String {
        self.lookup(language, key, args)
            .unwrap_or_else(|_| key.to_owned())
    }

    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        let all: BTreeSet<&str> = self.locales.values().flat_map(LocaleStrings::keys).collect();
        let total_keys = all.len();
        let locales = self
            .locales()
            .into_iter()
            .map(|locale| {
                let strings = &self.locales[locale];
                let missing: Vec<String> = all
                    .iter()
                    .filter(|k| strings.get(k).is_none())
                    .map(|k| (*k).to_owned())
                    .collect();
                let present = total_keys - missing.len();
                let coverage_percent = if total_keys == 0 {
                    100.0
                } else {
                    present as f64 * 100.0 / total_keys as f64
                };
                LocaleCoverage {
                    locale: locale.to_owned(),
                    present,
                    missing,
                    coverage_percent,
                }
            })
            .collect();
        CoverageReport {
            total_keys,
            locales,
        }
    }
}

/// Substitute `{name}` placeholders in one pass.
#[must_use]
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            args.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((v, close)) => {
                out.push_str(v);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
