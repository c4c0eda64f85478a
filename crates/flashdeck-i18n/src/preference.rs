#![forbid(unsafe_code)]

//! Persisted language preference.
//!
//! The preference lives in a string key-value store: browser local storage in
//! the web host, a JSON file for native hosts and tests.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PreferenceError;
use crate::locale::Language;

/// Storage key of the language preference.
pub const LANGUAGE_KEY: &str = "flashdeck.language";

/// String key-value storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Store backed by a JSON object in a file. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(PreferenceError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&raw).map_err(|source| PreferenceError::Json {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.load()?;
        values.insert(key.to_owned(), value.to_owned());
        let raw = serde_json::to_string_pretty(&values).map_err(|source| PreferenceError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, raw).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// The user's language choice on top of a [`PreferenceStore`].
#[derive(Debug, Clone)]
pub struct LanguagePreference<S> {
    store: S,
    default: Language,
}

impl<S: PreferenceStore> LanguagePreference<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            default: Language::default(),
        }
    }

    /// Language used when nothing (or garbage) is stored.
    #[must_use]
    pub fn with_default(mut self, language: Language) -> Self {
        self.default = language;
        self
    }

    /// Stored language, or the default.
    pub fn current(&self) -> Result<Language, PreferenceError> {
        Ok(self
            .store
            .get(LANGUAGE_KEY)?
            .and_then(|raw| Language::parse(&raw).ok())
            .unwrap_or(self.default))
    }

    pub fn set(&mut self, language: Language) -> Result<(), PreferenceError> {
        self.store.set(LANGUAGE_KEY, language.tag())
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}
