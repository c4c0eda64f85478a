#![forbid(unsafe_code)]

//! Application shell for Flashdeck.
//!
//! # Role in Flashdeck
//! `flashdeck-runtime` is where the library crates meet configuration and
//! the host. It loads [`config::AppConfig`], installs the log subscriber
//! ([`logging`]), instruments completion requests ([`effect_system`]),
//! reports what the environment supports ([`capabilities`]), and drives one
//! editing [`session::Session`]: a modal, its listeners, the card document and
//! the notice queue.

pub mod capabilities;
pub mod config;
pub mod effect_system;
pub mod logging;
pub mod session;

pub use capabilities::{Capabilities, SpeechFeature, UnsupportedEnvironment};
pub use config::{AppConfig, ConfigError};
pub use session::Session;
