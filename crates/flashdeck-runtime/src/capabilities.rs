#![forbid(unsafe_code)]

//! What the host environment can do.
//!
//! Optional features probe [`Capabilities`] once at construction. When a
//! capability is missing the feature refuses to build and the host disables
//! the corresponding control instead of failing later.

use std::fmt;

use flashdeck_i18n::Language;

/// Host capabilities, reported by the host at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub speech_synthesis: bool,
    pub clipboard: bool,
}

impl Capabilities {
    /// Nothing available (headless hosts, tests).
    #[must_use]
    pub const fn none() -> Self {
        Self {
            speech_synthesis: false,
            clipboard: false,
        }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            speech_synthesis: true,
            clipboard: true,
        }
    }

    #[must_use]
    pub const fn speech_synthesis(mut self, available: bool) -> Self {
        self.speech_synthesis = available;
        self
    }

    #[must_use]
    pub const fn clipboard(mut self, available: bool) -> Self {
        self.clipboard = available;
        self
    }
}

/// A feature needs something the environment lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedEnvironment {
    pub feature: &'static str,
}

impl fmt::Display for UnsupportedEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not supported in this environment", self.feature)
    }
}

impl std::error::Error for UnsupportedEnvironment {}

/// Text the host should speak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    /// BCP 47 voice language.
    pub lang: &'static str,
}

/// Read-aloud for card text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechFeature {
    language: Language,
}

impl SpeechFeature {
    pub fn new(capabilities: &Capabilities, language: Language) -> Result<Self, UnsupportedEnvironment> {
        if !capabilities.speech_synthesis {
            tracing::info!(target: "flashdeck.runtime", "speech synthesis unavailable");
            return Err(UnsupportedEnvironment {
                feature: "speech synthesis",
            });
        }
        Ok(Self { language })
    }

    /// Utterance for `text`, or `None` when there is nothing to say.
    #[must_use]
    pub fn utterance(&self, text: &str) -> Option<Utterance> {
        let text = text.trim();
        (!text.is_empty()).then(|| Utterance {
            text: text.to_owned(),
            lang: self.language.tag(),
        })
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_speech_is_rejected() {
        let err = SpeechFeature::new(&Capabilities::none(), Language::English).expect_err("none");
        assert_eq!(err.to_string(), "speech synthesis is not supported in this environment");
    }

    #[test]
    fn utterance_uses_language_tag() {
        let caps = Capabilities::none().speech_synthesis(true);
        let speech = SpeechFeature::new(&caps, Language::SimplifiedChinese).expect("available");
        assert_eq!(
            speech.utterance("  光合作用 "),
            Some(Utterance {
                text: "光合作用".into(),
                lang: "zh-CN"
            })
        );
        assert_eq!(speech.utterance("   "), None);
    }
}
