#![forbid(unsafe_code)]

//! Core: pixel geometry, canonical pointer/key events, and listener bookkeeping.
//!
//! # Role in Flashdeck
//! `flashdeck-core` is the input layer shared by the widget and editor crates.
//! It owns the viewport-pixel geometry primitives, the normalized event types a
//! browser host forwards into the engines, and the declarative listener
//! registry that keeps global pointer/key listeners scoped to the gestures and
//! surfaces that need them.
//!
//! # How it fits in the system
//! Hosts translate DOM events into [`event::Event`] values and feed them to
//! widgets (`flashdeck-widgets`). After each update the host asks the widget
//! which listeners it wants and reconciles them through
//! [`listener::ListenerRegistry`], attaching or detaching real DOM listeners
//! from the returned diff.

pub mod event;
pub mod geometry;
pub mod listener;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, warn};
