#![forbid(unsafe_code)]

//! Application configuration.
//!
//! Everything a deployment may want to tune lives in one [`AppConfig`] that
//! can be loaded from TOML or JSON at startup. Missing sections and fields
//! take their defaults, so an empty file is a valid configuration.
//!
//! ```toml
//! # flashdeck.toml
//! [modal]
//! width = 720
//! min_width = 320
//!
//! [ai]
//! model = "deepseek-chat"
//! broad_context = true
//!
//! [i18n]
//! language = "zh-CN"
//! preference_file = "prefs.json"
//! ```
//!
//! ```rust,ignore
//! let config = AppConfig::load("flashdeck.toml")?;
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use flashdeck_ai::AiClientConfig;
use flashdeck_ai::ContextMode;
use flashdeck_ai::client::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use flashdeck_core::geometry::Size;
use flashdeck_editor::AssistMode;
use flashdeck_i18n::Language;
use flashdeck_widgets::modal::{
    DEFAULT_HEIGHT, DEFAULT_MARGIN, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH, DEFAULT_WIDTH,
    ModalConfig, ModalSizeConstraints,
};
use flashdeck_widgets::notification::NoticeConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub modal: ModalSettings,
    pub ai: AiSettings,
    pub i18n: I18nSettings,
    pub logging: LoggingSettings,
    pub notifications: NoticeSettings,
}

/// Modal geometry defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalSettings {
    /// Default: 600.
    pub width: f64,
    /// Default: 400.
    pub height: f64,
    /// Default: 300.
    pub min_width: f64,
    /// Default: 200.
    pub min_height: f64,
    /// Cap on width; the viewport width when absent.
    pub max_width: Option<f64>,
    /// Cap on height; the viewport height when absent.
    pub max_height: Option<f64>,
    /// Minimum gap to the viewport edge when centering. Default: 50.
    pub margin: f64,
    pub resizable: bool,
    pub close_on_escape: bool,
}

impl Default for ModalSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
            max_width: None,
            max_height: None,
            margin: DEFAULT_MARGIN,
            resizable: true,
            close_on_escape: true,
        }
    }
}

/// Completion service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub endpoint: String,
    pub model: String,
    /// Ask for broadened context by default.
    pub broad_context: bool,
    /// Flip chunks in place instead of replacing them.
    pub explain_in_place: bool,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            broad_context: false,
            explain_in_place: false,
        }
    }
}

/// Localization settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nSettings {
    /// Language used until the user picks one.
    pub language: Language,
    /// JSON file holding the user's choice. Unset keeps it in memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference_file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directives. `RUST_LOG` wins when set.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            format: LogFormat::Pretty,
        }
    }
}

/// Transient notice settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeSettings {
    /// Default: 4000.
    pub ttl_ms: u64,
    /// Default: 2000.
    pub dedup_window_ms: u64,
    /// Default: 3.
    pub max_visible: usize,
}

impl Default for NoticeSettings {
    fn default() -> Self {
        Self {
            ttl_ms: 4_000,
            dedup_window_ms: 2_000,
            max_visible: 3,
        }
    }
}

impl AppConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load by extension (`.json` is JSON, anything else TOML) and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_file(path)?
        } else {
            Self::from_toml_file(path)?
        };
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Check every value is usable.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let m = &self.modal;

        for (name, value) in [
            ("width", m.width),
            ("height", m.height),
            ("min_width", m.min_width),
            ("min_height", m.min_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!("modal.{name} must be > 0, got {value}"));
            }
        }
        if let Some(max) = m.max_width
            && !(max.is_finite() && max >= m.min_width)
        {
            errors.push(format!(
                "modal.max_width must be >= modal.min_width ({}), got {max}",
                m.min_width
            ));
        }
        if let Some(max) = m.max_height
            && !(max.is_finite() && max >= m.min_height)
        {
            errors.push(format!(
                "modal.max_height must be >= modal.min_height ({}), got {max}",
                m.min_height
            ));
        }
        if !m.margin.is_finite() || m.margin < 0.0 {
            errors.push(format!("modal.margin must be >= 0, got {}", m.margin));
        }

        if self.ai.endpoint.trim().is_empty() {
            errors.push("ai.endpoint must not be empty".into());
        }
        if self.ai.model.trim().is_empty() {
            errors.push("ai.model must not be empty".into());
        }

        if self.logging.filter.trim().is_empty() {
            errors.push("logging.filter must not be empty".into());
        }

        if self.notifications.ttl_ms == 0 {
            errors.push("notifications.ttl_ms must be > 0".into());
        }
        if self.notifications.max_visible == 0 {
            errors.push("notifications.max_visible must be > 0".into());
        }

        errors
    }

    /// Build the modal configuration.
    #[must_use]
    pub fn to_modal_config(&self) -> ModalConfig {
        let m = &self.modal;
        let mut constraints = ModalSizeConstraints::new()
            .min_width(m.min_width)
            .min_height(m.min_height);
        if let Some(max) = m.max_width {
            constraints = constraints.max_width(max);
        }
        if let Some(max) = m.max_height {
            constraints = constraints.max_height(max);
        }
        ModalConfig::default()
            .default_size(Size::new(m.width, m.height))
            .constraints(constraints)
            .margin(m.margin)
            .resizable(m.resizable)
            .close_on_escape(m.close_on_escape)
    }

    #[must_use]
    pub fn to_client_config(&self) -> AiClientConfig {
        AiClientConfig::default()
            .endpoint(self.ai.endpoint.as_str())
            .model(self.ai.model.as_str())
    }

    #[must_use]
    pub fn context_mode(&self) -> ContextMode {
        if self.ai.broad_context {
            ContextMode::Broad
        } else {
            ContextMode::Focused
        }
    }

    #[must_use]
    pub fn assist_mode(&self) -> AssistMode {
        if self.ai.explain_in_place {
            AssistMode::ExplainInPlace
        } else {
            AssistMode::Replace
        }
    }

    #[must_use]
    pub fn to_notice_config(&self) -> NoticeConfig {
        let n = &self.notifications;
        NoticeConfig::default()
            .ttl(std::time::Duration::from_millis(n.ttl_ms))
            .dedup_window(std::time::Duration::from_millis(n.dedup_window_ms))
            .max_visible(n.max_visible)
    }
}

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
