#![forbid(unsafe_code)]

//! Log subscriber installation.
//!
//! Library crates only emit `tracing` events; the binary decides where they
//! go. [`init`] installs a `fmt` subscriber writing to stderr, filtered by
//! `RUST_LOG` when set and by [`LoggingSettings::filter`] otherwise.

use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, LogFormat, LoggingSettings};

/// Build the filter `init` would install.
pub fn env_filter(settings: &LoggingSettings) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.filter).map_err(|e| {
        ConfigError::Validation(vec![format!(
            "logging.filter {:?} is invalid: {e}",
            settings.filter
        )])
    })
}

/// Install the global subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed.
pub fn init(settings: &LoggingSettings) -> Result<bool, ConfigError> {
    let filter = env_filter(settings)?;
    let installed = match settings.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init(),
    }
    .is_ok();

    if installed {
        tracing::debug!(
            target: "flashdeck.runtime",
            filter = %settings.filter,
            format = ?settings.format,
            "logging initialized"
        );
    }
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage_filter() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let settings = LoggingSettings {
            filter: "flashdeck=notalevel[".into(),
            ..LoggingSettings::default()
        };
        assert!(matches!(env_filter(&settings), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn accepts_directives() {
        let settings = LoggingSettings {
            filter: "warn,flashdeck.chunk=debug".into(),
            ..LoggingSettings::default()
        };
        assert!(env_filter(&settings).is_ok());
    }
}
