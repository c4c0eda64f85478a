#![forbid(unsafe_code)]

//! Floating modal panel: configuration, resize geometry, and the drag/resize
//! engine.

pub mod container;
pub mod draggable;
pub mod resize;

pub use container::{
    DEFAULT_HEIGHT, DEFAULT_MARGIN, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH, DEFAULT_WIDTH,
    ModalAction, ModalChrome, ModalConfig, ModalSizeConstraints, RequestedSize,
};
pub use draggable::{DraggableModal, Gesture, ModalHit};
pub use resize::{Edges, ResizeDirection, classify_handle, cursor_for, resize_rect};
