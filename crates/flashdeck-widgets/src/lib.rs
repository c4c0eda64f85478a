#![forbid(unsafe_code)]

//! Widgets for Flashdeck.
//!
//! - [`modal`]: the draggable/resizable modal geometry engine.
//! - [`styles`]: the shared stylesheet, injected once per process.
//! - [`notification`]: transient notices such as failed AI requests.
//!
//! Widgets are headless. They consume [`flashdeck_core::event::Event`]s,
//! expose geometry and actions, and declare the global listeners they need;
//! the host does the rendering and the DOM wiring.

pub mod modal;
pub mod notification;
pub mod styles;

pub use modal::{DraggableModal, ModalAction, ModalConfig, ModalHit, ResizeDirection};
pub use notification::{NoticeLevel, NoticeQueue};
pub use styles::ensure_styles_injected;
