#![forbid(unsafe_code)]

//! Internationalization for Flashdeck.
//!
//! Provides key-based string lookup with a fallback chain to English,
//! `{name}` interpolation, and a persisted language preference.
//!
//! # Role in Flashdeck
//! The modal, the chunk notices and the AI error messages all resolve their
//! user-facing text here. The crate does not depend on the widget or editor
//! crates, so it can be tested on its own.

pub mod catalog;
pub mod error;
pub mod locale;
pub mod preference;

pub use catalog::{CoverageReport, LocaleCoverage, LocaleStrings, StringCatalog};
pub use error::{I18nError, PreferenceError};
pub use locale::Language;
pub use preference::{JsonFileStore, LanguagePreference, MemoryStore, PreferenceStore};
