#![forbid(unsafe_code)]

//! Draggable, resizable modal: the geometry engine.
//!
//! [`DraggableModal`] owns position, size and the current gesture of one
//! floating panel. It never touches the DOM. The host feeds it normalized
//! [`Event`]s (or calls the gesture operations directly), reads back
//! [`DraggableModal::rect`] to style the panel, and reconciles the listener
//! set returned by [`DraggableModal::subscriptions`] after every update.
//!
//! # State machine
//!
//! ```text
//! Closed ──open()──▶ Open(layout pending) ──on_paint_tick()──▶ Open(initialized)
//!    ▲                                                            │
//!    └──────────────────── close() / Escape / close button ───────┘
//!
//! Idle ──pointer down on header──▶ Dragging ──pointer up──▶ Idle
//! Idle ──pointer down on handle──▶ Resizing ──pointer up──▶ Idle
//! ```
//!
//! # Invariants
//!
//! - After any mutation `size` lies within the constraints (minimum wins when
//!   the viewport is smaller than the minimum).
//! - While dragging, `position` stays in `[0, viewport - size]` per axis.
//! - A resize never pushes the right or bottom edge past the viewport unless
//!   the minimum size forces it.
//! - `initialized` is only true while open; closing clears it so the next
//!   open re-centers.
//! - Pointer listeners are requested only outside `Idle`; the key listener
//!   only while open.

use flashdeck_core::event::{Event, PointerButton, PointerEvent, PointerEventKind};
use flashdeck_core::geometry::{Point, Rect, Size};
use flashdeck_core::listener::ListenerKind;

use super::container::{ModalAction, ModalConfig, RequestedSize};
use super::resize::{ResizeDirection, classify_handle, resize_rect};

/// Current pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Moving the panel by its header.
    Dragging {
        /// Pointer position minus panel origin at gesture start.
        start_offset: Point,
    },
    /// Resizing from one of the eight handles.
    Resizing {
        direction: ResizeDirection,
        start_pointer: Point,
        start_rect: Rect,
    },
}

impl Gesture {
    /// True when no gesture is in progress.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Part of the modal under a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalHit {
    /// Draggable header strip.
    Header,
    /// Close affordance inside the header.
    CloseButton,
    /// Body content.
    Content,
    /// A resize handle.
    Handle(ResizeDirection),
}

/// Geometry engine for one draggable modal.
#[derive(Debug, Clone)]
pub struct DraggableModal {
    config: ModalConfig,
    viewport: Size,
    position: Point,
    size: Size,
    gesture: Gesture,
    captured_pointer: Option<u32>,
    open: bool,
    layout_pending: bool,
    initialized: bool,
}

impl DraggableModal {
    /// Create a closed modal for `viewport`.
    #[must_use]
    pub fn new(config: ModalConfig, viewport: Size) -> Self {
        let size = config.initial_size(viewport);
        Self {
            config,
            viewport,
            position: Point::ZERO,
            size,
            gesture: Gesture::Idle,
            captured_pointer: None,
            open: false,
            layout_pending: false,
            initialized: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Current panel bounds.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    #[must_use]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// True once the first centered position has been computed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Open with the configured requested size.
    ///
    /// Centering is deferred to [`on_paint_tick`](Self::on_paint_tick).
    /// Returns `false` if already open.
    pub fn open(&mut self) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        self.layout_pending = true;
        self.initialized = false;
        self.size = self.config.initial_size(self.viewport);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "flashdeck.modal",
            width = self.size.width,
            height = self.size.height,
            "modal opened"
        );
        true
    }

    /// Open with a new requested size, e.g. from loosely typed props.
    pub fn open_with(&mut self, requested: RequestedSize) -> bool {
        if self.open {
            return false;
        }
        self.config.requested = requested;
        self.open()
    }

    /// Run deferred layout after the panel has been painted once.
    ///
    /// Centers the panel, keeping its top-left at least `margin` away from
    /// the viewport's top and left edges. Returns `true` when layout ran.
    pub fn on_paint_tick(&mut self) -> bool {
        if !self.open || !self.layout_pending {
            return false;
        }
        let margin = self.config.margin;
        self.position = Point::new(
            ((self.viewport.width - self.size.width) / 2.0).max(margin),
            ((self.viewport.height - self.size.height) / 2.0).max(margin),
        );
        self.layout_pending = false;
        self.initialized = true;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "flashdeck.modal",
            x = self.position.x,
            y = self.position.y,
            "modal centered"
        );
        true
    }

    /// Close the modal, returning the action for the host's close callback.
    pub fn close(&mut self) -> Option<ModalAction> {
        self.close_with(ModalAction::Close)
    }

    fn close_with(&mut self, action: ModalAction) -> Option<ModalAction> {
        if !self.open {
            return None;
        }
        self.open = false;
        self.layout_pending = false;
        self.initialized = false;
        self.size = self.config.initial_size(self.viewport);
        self.gesture = Gesture::Idle;
        self.captured_pointer = None;

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "flashdeck.modal", ?action, "modal closed");
        Some(action)
    }

    fn interactive(&self) -> bool {
        self.open && self.initialized && self.gesture.is_idle()
    }

    /// Start dragging if `pointer` is on the header.
    ///
    /// Pointer-downs on the content, the close button or a resize handle are
    /// ignored. Returns `true` if a drag started.
    pub fn begin_drag(&mut self, pointer: Point) -> bool {
        if !self.interactive() || self.hit_test(pointer) != Some(ModalHit::Header) {
            return false;
        }
        self.gesture = Gesture::Dragging {
            start_offset: pointer - self.position,
        };
        true
    }

    /// Follow the pointer while dragging.
    pub fn drag_move(&mut self, pointer: Point) -> bool {
        let Gesture::Dragging { start_offset } = self.gesture else {
            return false;
        };
        self.position = self.clamp_origin(pointer - start_offset);
        true
    }

    /// Finish a drag.
    pub fn end_drag(&mut self) -> bool {
        if !matches!(self.gesture, Gesture::Dragging { .. }) {
            return false;
        }
        self.gesture = Gesture::Idle;
        self.captured_pointer = None;
        true
    }

    /// Start resizing from `direction`. Ignored when not resizable.
    pub fn begin_resize(&mut self, pointer: Point, direction: ResizeDirection) -> bool {
        if !self.config.resizable || !self.interactive() {
            return false;
        }
        self.gesture = Gesture::Resizing {
            direction,
            start_pointer: pointer,
            start_rect: self.rect(),
        };
        true
    }

    /// Follow the pointer while resizing.
    pub fn resize_move(&mut self, pointer: Point) -> bool {
        let Gesture::Resizing {
            direction,
            start_pointer,
            start_rect,
        } = self.gesture
        else {
            return false;
        };
        let next = resize_rect(
            start_rect,
            direction,
            pointer - start_pointer,
            &self.config.constraints,
            self.viewport,
        );
        self.size = next.size();
        if direction.moves_x() {
            self.position.x = next.x;
        }
        if direction.moves_y() {
            self.position.y = next.y;
        }
        true
    }

    /// Finish a resize.
    pub fn end_resize(&mut self) -> bool {
        if !matches!(self.gesture, Gesture::Resizing { .. }) {
            return false;
        }
        self.gesture = Gesture::Idle;
        self.captured_pointer = None;
        true
    }

    /// Drop any gesture in progress, keeping the geometry reached so far.
    pub fn cancel_gesture(&mut self) {
        self.gesture = Gesture::Idle;
        self.captured_pointer = None;
    }

    /// Move the panel programmatically, with the same clamping as a drag.
    pub fn move_to(&mut self, origin: Point) {
        if self.open {
            self.position = self.clamp_origin(origin);
        }
    }

    /// React to a viewport resize: re-clamp size, then keep the panel inside.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        if !self.open {
            self.size = self.config.initial_size(viewport);
            return;
        }
        self.size = self.config.constraints.clamp(self.size, viewport);
        if self.initialized {
            self.position = self.clamp_origin(self.position);
        }
    }

    fn clamp_origin(&self, origin: Point) -> Point {
        let max_x = (self.viewport.width - self.size.width).max(0.0);
        let max_y = (self.viewport.height - self.size.height).max(0.0);
        Point::new(origin.x.clamp(0.0, max_x), origin.y.clamp(0.0, max_y))
    }

    /// Bounds of the close button.
    #[must_use]
    pub fn close_button_rect(&self) -> Rect {
        let chrome = &self.config.chrome;
        let rect = self.rect();
        let side = chrome.close_button_size;
        Rect::new(
            rect.right() - chrome.close_button_inset - side,
            rect.y + ((chrome.header_height - side) / 2.0).max(0.0),
            side,
            side,
        )
    }

    /// Classify the part of the modal under `point`.
    ///
    /// Returns `None` when closed, before the first layout, or outside the
    /// panel. Handles win over the close button, which wins over the header.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<ModalHit> {
        if !self.open || !self.initialized {
            return None;
        }
        let rect = self.rect();
        if !rect.contains(point) {
            return None;
        }
        if self.config.resizable
            && let Some(direction) = classify_handle(rect, point, &self.config.chrome)
        {
            return Some(ModalHit::Handle(direction));
        }
        if self.close_button_rect().contains(point) {
            return Some(ModalHit::CloseButton);
        }
        if point.y < rect.y + self.config.chrome.header_height {
            return Some(ModalHit::Header);
        }
        Some(ModalHit::Content)
    }

    /// Global listeners this modal needs right now.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<ListenerKind> {
        let mut kinds = Vec::with_capacity(3);
        if !self.gesture.is_idle() {
            kinds.push(ListenerKind::PointerMove);
            kinds.push(ListenerKind::PointerUp);
        }
        if self.open && self.config.close_on_escape {
            kinds.push(ListenerKind::KeyDown);
        }
        kinds
    }

    /// Route a normalized event through hit testing and the gesture machine.
    ///
    /// Returns an action when the modal closed as a result.
    pub fn handle_event(&mut self, event: &Event) -> Option<ModalAction> {
        match event {
            Event::Key(key) if key.is_cancel_press() && self.config.close_on_escape => {
                self.close_with(ModalAction::EscapePressed)
            }
            Event::Pointer(pointer) => self.handle_pointer(pointer),
            Event::Resize(viewport) => {
                self.set_viewport(*viewport);
                None
            }
            Event::Focus(false) => {
                self.cancel_gesture();
                None
            }
            _ => None,
        }
    }

    fn handle_pointer(&mut self, event: &PointerEvent) -> Option<ModalAction> {
        let captured = self.captured_pointer == Some(event.pointer_id);
        match event.kind {
            PointerEventKind::Down(PointerButton::Primary) if self.gesture.is_idle() => {
                match self.hit_test(event.position)? {
                    ModalHit::CloseButton => {
                        return self.close_with(ModalAction::CloseButtonClicked);
                    }
                    ModalHit::Header => {
                        if self.begin_drag(event.position) {
                            self.captured_pointer = Some(event.pointer_id);
                        }
                    }
                    ModalHit::Handle(direction) => {
                        if self.begin_resize(event.position, direction) {
                            self.captured_pointer = Some(event.pointer_id);
                        }
                    }
                    ModalHit::Content => {}
                }
            }
            PointerEventKind::Move if captured => {
                if !self.drag_move(event.position) {
                    self.resize_move(event.position);
                }
            }
            PointerEventKind::Up(_) | PointerEventKind::Cancel if captured => {
                if !self.end_drag() {
                    self.end_resize();
                }
            }
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashdeck_core::event::{KeyCode, KeyEvent};

    const VIEWPORT: Size = Size::new(1920.0, 1080.0);

    fn opened(width: f64, height: f64) -> DraggableModal {
        let mut m = DraggableModal::new(ModalConfig::default(), VIEWPORT);
        m.open_with(RequestedSize::new(width, height));
        m.on_paint_tick();
        m
    }

    fn down(x: f64, y: f64) -> Event {
        Event::Pointer(PointerEvent::new(
            PointerEventKind::Down(PointerButton::Primary),
            x,
            y,
        ))
    }

    fn mv(x: f64, y: f64) -> Event {
        Event::Pointer(PointerEvent::new(PointerEventKind::Move, x, y))
    }

    fn up(x: f64, y: f64) -> Event {
        Event::Pointer(PointerEvent::new(
            PointerEventKind::Up(PointerButton::Primary),
            x,
            y,
        ))
    }

    #[test]
    fn opens_centered_after_paint_tick() {
        let mut m = DraggableModal::new(ModalConfig::default(), VIEWPORT);
        assert!(m.open_with(RequestedSize::new(500.0, 400.0)));
        assert!(!m.is_initialized());
        assert!(m.on_paint_tick());
        assert!(m.is_initialized());
        assert_eq!(m.position(), Point::new(710.0, 340.0));
        assert_eq!(m.size(), Size::new(500.0, 400.0));
        assert!(!m.on_paint_tick());
    }

    #[test]
    fn centering_respects_margin() {
        let mut m = DraggableModal::new(ModalConfig::default(), Size::new(640.0, 480.0));
        m.open();
        m.on_paint_tick();
        assert_eq!(m.position(), Point::new(50.0, 50.0));
    }

    #[test]
    fn non_numeric_request_uses_defaults() {
        let mut m = DraggableModal::new(ModalConfig::default(), VIEWPORT);
        m.open_with(RequestedSize::parse("wide", "tall"));
        assert_eq!(m.size(), Size::new(600.0, 400.0));
    }

    #[test]
    fn close_resets_and_reopen_recenters() {
        let mut m = opened(500.0, 400.0);
        let first = m.position();
        assert!(m.begin_drag(first + Point::new(100.0, 20.0)));
        m.drag_move(Point::new(10.0, 10.0));
        m.end_drag();
        assert_ne!(m.position(), first);

        assert_eq!(m.close(), Some(ModalAction::Close));
        assert!(!m.is_initialized());
        assert_eq!(m.close(), None);

        m.open();
        m.on_paint_tick();
        assert_eq!(m.position(), first);
    }

    #[test]
    fn close_restores_requested_size() {
        let mut m = opened(500.0, 400.0);
        let p = m.position();
        m.begin_resize(Point::new(p.x + 499.0, p.y + 399.0), ResizeDirection::SE);
        m.resize_move(Point::new(p.x + 599.0, p.y + 449.0));
        m.end_resize();
        assert_eq!(m.size(), Size::new(600.0, 450.0));
        m.close();
        assert_eq!(m.size(), Size::new(500.0, 400.0));
    }

    #[test]
    fn drag_clamps_into_viewport() {
        let mut m = opened(500.0, 400.0);
        let grip = m.position() + Point::new(200.0, 20.0);
        assert!(m.begin_drag(grip));
        m.drag_move(Point::new(-500.0, -500.0));
        assert_eq!(m.position(), Point::ZERO);
        m.drag_move(Point::new(5000.0, 5000.0));
        assert_eq!(m.position(), Point::new(1420.0, 680.0));
        assert!(m.end_drag());
        assert!(m.gesture().is_idle());
    }

    #[test]
    fn drag_only_starts_on_header() {
        let mut m = opened(500.0, 400.0);
        let origin = m.position();
        // Content.
        assert!(!m.begin_drag(origin + Point::new(200.0, 200.0)));
        // Close button.
        let close = m.close_button_rect();
        assert!(!m.begin_drag(close.origin() + Point::new(5.0, 5.0)));
        // Resize handle.
        assert!(!m.begin_drag(origin + Point::new(1.0, 1.0)));
        assert!(m.gesture().is_idle());
    }

    #[test]
    fn north_west_resize_scenario() {
        let mut m = opened(500.0, 400.0);
        m.move_to(Point::new(100.0, 100.0));
        assert!(m.begin_resize(Point::new(101.0, 101.0), ResizeDirection::NW));
        m.resize_move(Point::new(131.0, 121.0));
        assert_eq!(m.rect(), Rect::new(130.0, 120.0, 470.0, 380.0));
    }

    #[test]
    fn east_resize_leaves_position() {
        let mut m = opened(500.0, 400.0);
        let p = m.position();
        m.begin_resize(Point::new(p.x + 499.0, p.y + 200.0), ResizeDirection::E);
        m.resize_move(Point::new(p.x + 399.0, p.y + 260.0));
        assert_eq!(m.position(), p);
        assert_eq!(m.size(), Size::new(400.0, 400.0));
    }

    #[test]
    fn resize_ignored_when_not_resizable() {
        let mut m = DraggableModal::new(ModalConfig::default().resizable(false), VIEWPORT);
        m.open();
        m.on_paint_tick();
        let p = m.position();
        assert!(!m.begin_resize(p, ResizeDirection::NW));
        assert_eq!(m.hit_test(p + Point::new(1.0, 1.0)), Some(ModalHit::Header));
    }

    #[test]
    fn hit_test_regions() {
        let m = opened(500.0, 400.0);
        let o = m.position();
        assert_eq!(m.hit_test(o + Point::new(1.0, 1.0)), Some(ModalHit::Handle(ResizeDirection::NW)));
        assert_eq!(m.hit_test(o + Point::new(200.0, 20.0)), Some(ModalHit::Header));
        assert_eq!(m.hit_test(o + Point::new(200.0, 200.0)), Some(ModalHit::Content));
        let close = m.close_button_rect();
        assert_eq!(m.hit_test(close.origin() + Point::new(16.0, 16.0)), Some(ModalHit::CloseButton));
        assert_eq!(m.hit_test(Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn hit_test_is_none_before_layout() {
        let mut m = DraggableModal::new(ModalConfig::default(), VIEWPORT);
        m.open();
        assert_eq!(m.hit_test(Point::new(10.0, 10.0)), None);
    }

    #[test]
    fn subscriptions_follow_gesture_and_open_state() {
        let mut m = DraggableModal::new(ModalConfig::default(), VIEWPORT);
        assert!(m.subscriptions().is_empty());

        m.open();
        m.on_paint_tick();
        assert_eq!(m.subscriptions(), vec![ListenerKind::KeyDown]);

        let grip = m.position() + Point::new(200.0, 20.0);
        m.begin_drag(grip);
        assert_eq!(
            m.subscriptions(),
            vec![ListenerKind::PointerMove, ListenerKind::PointerUp, ListenerKind::KeyDown]
        );

        m.end_drag();
        assert_eq!(m.subscriptions(), vec![ListenerKind::KeyDown]);

        m.close();
        assert!(m.subscriptions().is_empty());
    }

    #[test]
    fn escape_closes_via_event() {
        let mut m = opened(500.0, 400.0);
        let action = m.handle_event(&Event::Key(KeyEvent::new(KeyCode::Escape)));
        assert_eq!(action, Some(ModalAction::EscapePressed));
        assert!(!m.is_open());
        assert_eq!(m.handle_event(&Event::Key(KeyEvent::new(KeyCode::Escape))), None);
    }

    #[test]
    fn escape_ignored_when_disabled() {
        let mut m = DraggableModal::new(ModalConfig::default().close_on_escape(false), VIEWPORT);
        m.open();
        m.on_paint_tick();
        assert_eq!(m.handle_event(&Event::Key(KeyEvent::new(KeyCode::Escape))), None);
        assert!(m.is_open());
        assert!(m.subscriptions().is_empty());
    }

    #[test]
    fn pointer_events_drive_drag() {
        let mut m = opened(500.0, 400.0);
        let o = m.position();
        assert_eq!(m.handle_event(&down(o.x + 200.0, o.y + 20.0)), None);
        assert!(matches!(m.gesture(), Gesture::Dragging { .. }));
        m.handle_event(&mv(o.x + 250.0, o.y + 70.0));
        assert_eq!(m.position(), o + Point::new(50.0, 50.0));
        m.handle_event(&up(o.x + 250.0, o.y + 70.0));
        assert!(m.gesture().is_idle());
    }

    #[test]
    fn other_pointer_ids_are_ignored_during_gesture() {
        let mut m = opened(500.0, 400.0);
        let o = m.position();
        m.handle_event(&down(o.x + 200.0, o.y + 20.0));
        let stray = PointerEvent::new(PointerEventKind::Move, 0.0, 0.0).with_pointer_id(9);
        m.handle_event(&Event::Pointer(stray));
        assert_eq!(m.position(), o);
    }

    #[test]
    fn close_button_click_closes() {
        let mut m = opened(500.0, 400.0);
        let c = m.close_button_rect().origin() + Point::new(10.0, 10.0);
        assert_eq!(m.handle_event(&down(c.x, c.y)), Some(ModalAction::CloseButtonClicked));
        assert!(!m.is_open());
    }

    #[test]
    fn focus_loss_cancels_gesture() {
        let mut m = opened(500.0, 400.0);
        let o = m.position();
        m.handle_event(&down(o.x + 200.0, o.y + 20.0));
        m.handle_event(&Event::Focus(false));
        assert!(m.gesture().is_idle());
        assert!(!m.subscriptions().contains(&ListenerKind::PointerMove));
    }

    #[test]
    fn viewport_shrink_reclamps() {
        let mut m = opened(800.0, 600.0);
        m.move_to(Point::new(1100.0, 480.0));
        m.handle_event(&Event::Resize(Size::new(1024.0, 768.0)));
        assert_eq!(m.size(), Size::new(800.0, 600.0));
        assert_eq!(m.position(), Point::new(224.0, 168.0));

        m.set_viewport(Size::new(700.0, 500.0));
        assert_eq!(m.size(), Size::new(700.0, 500.0));
        assert_eq!(m.position(), Point::ZERO);
    }
}
