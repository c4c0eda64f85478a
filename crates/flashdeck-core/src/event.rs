#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! Hosts normalize DOM `pointerdown`/`pointermove`/`pointerup`, `keydown` and
//! window `resize` events into these values before handing them to widgets.
//!
//! # Design Notes
//!
//! - Pointer coordinates are viewport pixels (`clientX`/`clientY`).
//! - `KeyEventKind` defaults to `Press` when the host cannot distinguish repeats.
//! - Only Escape gets its own [`KeyCode`]; printable keys arrive as `Char`.

use crate::geometry::{Point, Size};

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// A pointer (mouse, pen or touch) event.
    Pointer(PointerEvent),

    /// The viewport was resized.
    Resize(Size),

    /// Focus gained or lost.
    ///
    /// `true` = focus gained, `false` = focus lost.
    Focus(bool),
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event of Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if this is a press (not repeat/release) of the cancel key.
    #[must_use]
    pub const fn is_cancel_press(&self) -> bool {
        matches!(self.code, KeyCode::Escape) && matches!(self.kind, KeyEventKind::Press)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    Escape,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,

    /// Position in viewport pixels.
    pub position: Point,

    /// Host-assigned pointer id (`PointerEvent.pointerId`).
    pub pointer_id: u32,
}

impl PointerEvent {
    /// Create a new pointer event for the primary pointer.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
            pointer_id: 1,
        }
    }

    /// Set the pointer id.
    #[must_use]
    pub const fn with_pointer_id(mut self, pointer_id: u32) -> Self {
        self.pointer_id = pointer_id;
        self
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed down.
    Down(PointerButton),

    /// Button released.
    Up(PointerButton),

    /// Pointer moved (with or without a button held).
    Move,

    /// The host cancelled the pointer (lost capture, blur, touch cancel).
    Cancel,
}

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary button (left mouse, pen tip, touch contact).
    Primary,

    /// Secondary button (right mouse).
    Secondary,

    /// Auxiliary button (middle mouse).
    Auxiliary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_defaults_to_press() {
        let k = KeyEvent::new(KeyCode::Escape);
        assert_eq!(k.kind, KeyEventKind::Press);
        assert!(k.is_cancel_press());
    }

    #[test]
    fn escape_release_is_not_cancel_press() {
        let k = KeyEvent::new(KeyCode::Escape).with_kind(KeyEventKind::Release);
        assert!(!k.is_cancel_press());
        assert!(!KeyEvent::new(KeyCode::Char('q')).is_cancel_press());
    }

    #[test]
    fn pointer_event_builders() {
        let e = PointerEvent::new(PointerEventKind::Down(PointerButton::Primary), 10.5, 20.0)
            .with_pointer_id(7);
        assert_eq!(e.position, Point::new(10.5, 20.0));
        assert_eq!(e.pointer_id, 7);
    }
}
