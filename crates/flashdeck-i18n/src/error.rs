#![forbid(unsafe_code)]

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Lookup or parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// The language tag names no supported language.
    UnsupportedLanguage(String),
    /// The key exists in no locale of the fallback chain.
    MissingKey { locale: String, key: String },
}

impl fmt::Display for I18nError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedLanguage(raw) => write!(f, "unsupported language: {raw:?}"),
            Self::MissingKey { locale, key } => {
                write!(f, "missing string {key:?} for locale {locale}")
            }
        }
    }
}

impl std::error::Error for I18nError {}

/// Reading or writing a stored preference failed.
#[derive(Debug)]
pub enum PreferenceError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for PreferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "preference file {}: {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "preference file {} is not valid JSON: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for PreferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}
