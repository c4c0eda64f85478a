#![forbid(unsafe_code)]

//! Resize handles: direction classification and the resize geometry itself.
//!
//! [`resize_rect`] is a pure function of the rectangle captured when the
//! gesture started, the pointer displacement since then, the constraints and
//! the viewport. Recomputing from the start rectangle on every move keeps the
//! result independent of how many intermediate moves the host delivered.
//!
//! # Correction order
//!
//! 1. apply the displacement to the edges named by the direction; west and
//!    north handles shift the origin by the displacement,
//! 2. clamp width/height into the size constraints,
//! 3. absorb a negative `x` into the width, then a negative `y` into the
//!    height,
//! 4. trim the width to the right viewport edge, then the height to the
//!    bottom edge,
//! 5. re-apply the minimum size. Minimum size wins over the viewport; a
//!    west/north origin that would then push the panel off screen is pulled
//!    back, never past zero.

use std::fmt;

use bitflags::bitflags;
use flashdeck_core::geometry::{Point, Rect, Size};

use super::container::{ModalChrome, ModalSizeConstraints};

bitflags! {
    /// Edges moved by a resize handle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        const NORTH = 0b0001;
        const SOUTH = 0b0010;
        const EAST  = 0b0100;
        const WEST  = 0b1000;
    }
}

/// One of the eight resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeDirection {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeDirection {
    /// All handles, edges first.
    pub const ALL: [Self; 8] = [
        Self::N,
        Self::S,
        Self::E,
        Self::W,
        Self::NE,
        Self::NW,
        Self::SE,
        Self::SW,
    ];

    /// Edges this handle moves.
    #[must_use]
    pub const fn edges(self) -> Edges {
        match self {
            Self::N => Edges::NORTH,
            Self::S => Edges::SOUTH,
            Self::E => Edges::EAST,
            Self::W => Edges::WEST,
            Self::NE => Edges::NORTH.union(Edges::EAST),
            Self::NW => Edges::NORTH.union(Edges::WEST),
            Self::SE => Edges::SOUTH.union(Edges::EAST),
            Self::SW => Edges::SOUTH.union(Edges::WEST),
        }
    }

    /// Handle for a set of edges. Opposing or empty sets have no handle.
    #[must_use]
    pub fn from_edges(edges: Edges) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.edges() == edges)
    }

    /// Short name used in markup (`data-direction="nw"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::S => "s",
            Self::E => "e",
            Self::W => "w",
            Self::NE => "ne",
            Self::NW => "nw",
            Self::SE => "se",
            Self::SW => "sw",
        }
    }

    /// Parse the short name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == raw)
    }

    /// CSS cursor shown over this handle.
    #[must_use]
    pub const fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::NE | Self::SW => "nesw-resize",
            Self::NW | Self::SE => "nwse-resize",
        }
    }

    /// True when this handle moves the left edge (and therefore `x`).
    #[must_use]
    pub const fn moves_x(self) -> bool {
        self.edges().contains(Edges::WEST)
    }

    /// True when this handle moves the top edge (and therefore `y`).
    #[must_use]
    pub const fn moves_y(self) -> bool {
        self.edges().contains(Edges::NORTH)
    }
}

impl fmt::Display for ResizeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CSS cursor for a handle.
#[must_use]
pub const fn cursor_for(direction: ResizeDirection) -> &'static str {
    direction.cursor()
}

/// Classify `point` against the handles laid along the inside of `rect`.
///
/// Corner squares take priority over edge strips. Points outside `rect`
/// never hit a handle.
#[must_use]
pub fn classify_handle(rect: Rect, point: Point, chrome: &ModalChrome) -> Option<ResizeDirection> {
    if !rect.contains(point) {
        return None;
    }

    let from_left = point.x - rect.x;
    let from_right = rect.right() - point.x;
    let from_top = point.y - rect.y;
    let from_bottom = rect.bottom() - point.y;

    let pick = |near_start: f64, near_end: f64, reach: f64, start: Edges, end: Edges| -> Edges {
        if near_start < reach && near_start <= near_end {
            start
        } else if near_end <= reach {
            end
        } else {
            Edges::empty()
        }
    };

    let corner = chrome.corner_size.max(chrome.handle_thickness);
    let horizontal = pick(from_left, from_right, corner, Edges::WEST, Edges::EAST);
    let vertical = pick(from_top, from_bottom, corner, Edges::NORTH, Edges::SOUTH);
    if !horizontal.is_empty() && !vertical.is_empty() {
        return ResizeDirection::from_edges(horizontal | vertical);
    }

    let thickness = chrome.handle_thickness;
    let horizontal = pick(from_left, from_right, thickness, Edges::WEST, Edges::EAST);
    let vertical = pick(from_top, from_bottom, thickness, Edges::NORTH, Edges::SOUTH);
    ResizeDirection::from_edges(horizontal | vertical)
}

/// Compute the rectangle for a resize gesture.
///
/// `delta` is the pointer displacement since the gesture began and `start`
/// the rectangle captured at that moment. See the module docs for the
/// correction order.
#[must_use]
pub fn resize_rect(
    start: Rect,
    direction: ResizeDirection,
    delta: Point,
    constraints: &ModalSizeConstraints,
    viewport: Size,
) -> Rect {
    let edges = direction.edges();
    let mut x = start.x;
    let mut y = start.y;
    let mut width = start.width;
    let mut height = start.height;

    if edges.contains(Edges::EAST) {
        width = start.width + delta.x;
    }
    if edges.contains(Edges::WEST) {
        x = start.x + delta.x;
        width = start.width - delta.x;
    }
    if edges.contains(Edges::SOUTH) {
        height = start.height + delta.y;
    }
    if edges.contains(Edges::NORTH) {
        y = start.y + delta.y;
        height = start.height - delta.y;
    }

    width = constraints.clamp_width(width, viewport);
    height = constraints.clamp_height(height, viewport);

    if x < 0.0 {
        width += x;
        x = 0.0;
    }
    if y < 0.0 {
        height += y;
        y = 0.0;
    }
    if x + width > viewport.width {
        width = viewport.width - x;
    }
    if y + height > viewport.height {
        height = viewport.height - y;
    }

    width = width.max(constraints.min_width);
    height = height.max(constraints.min_height);
    if edges.contains(Edges::WEST) && x + width > viewport.width {
        x = (viewport.width - width).max(0.0);
    }
    if edges.contains(Edges::NORTH) && y + height > viewport.height {
        y = (viewport.height - height).max(0.0);
    }

    Rect::new(x, y, width, height)
}
