#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature enabled the usual `tracing` macros are
//! re-exported so downstream crates can log through `flashdeck_core` without a
//! direct dependency. Without it, nothing is emitted and nothing is linked.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, trace, warn};
