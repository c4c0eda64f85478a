#![forbid(unsafe_code)]

//! Modal configuration: requested size, size constraints, chrome metrics.
//!
//! These are plain values. The stateful engine lives in
//! [`crate::modal::DraggableModal`]; everything here is immutable per modal
//! instance and cheap to copy.

use flashdeck_core::geometry::Size;

/// Width used when the host passes no usable width.
pub const DEFAULT_WIDTH: f64 = 600.0;
/// Height used when the host passes no usable height.
pub const DEFAULT_HEIGHT: f64 = 400.0;
/// Default minimum width.
pub const DEFAULT_MIN_WIDTH: f64 = 300.0;
/// Default minimum height.
pub const DEFAULT_MIN_HEIGHT: f64 = 200.0;
/// Smallest distance between the viewport edge and the top-left corner of a
/// freshly centered modal.
pub const DEFAULT_MARGIN: f64 = 50.0;

/// Modal action emitted by [`crate::modal::DraggableModal`].
///
/// The host maps every variant to its close callback; the variants only say
/// what triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// `close()` was called directly.
    Close,
    /// The close affordance in the header was clicked.
    CloseButtonClicked,
    /// Escape was pressed.
    EscapePressed,
}

/// Size the host asked for. Either dimension may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RequestedSize {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl RequestedSize {
    /// Request explicit dimensions.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// Parse loosely typed props such as `"500"`, `"500px"` or `" 480.5 "`.
    ///
    /// Anything non-numeric, non-finite or non-positive is treated as absent.
    #[must_use]
    pub fn parse(width: &str, height: &str) -> Self {
        Self {
            width: parse_dimension(width),
            height: parse_dimension(height),
        }
    }

    /// Resolve against defaults, dropping values that are not usable.
    #[must_use]
    pub fn resolve(&self, defaults: Size) -> Size {
        Size::new(
            self.width.filter(|w| usable(*w)).unwrap_or(defaults.width),
            self.height.filter(|h| usable(*h)).unwrap_or(defaults.height),
        )
    }
}

fn usable(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn parse_dimension(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
    number.parse::<f64>().ok().filter(|v| usable(*v))
}

/// Modal size constraints.
///
/// Maxima default to the viewport. When a minimum exceeds its maximum the
/// minimum wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModalSizeConstraints {
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
}

impl Default for ModalSizeConstraints {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
            max_width: None,
            max_height: None,
        }
    }
}

impl ModalSizeConstraints {
    /// Constraints with the default minima and viewport maxima.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set minimum width.
    #[must_use]
    pub fn min_width(mut self, value: f64) -> Self {
        self.min_width = value;
        self
    }

    /// Set minimum height.
    #[must_use]
    pub fn min_height(mut self, value: f64) -> Self {
        self.min_height = value;
        self
    }

    /// Set maximum width.
    #[must_use]
    pub fn max_width(mut self, value: f64) -> Self {
        self.max_width = Some(value);
        self
    }

    /// Set maximum height.
    #[must_use]
    pub fn max_height(mut self, value: f64) -> Self {
        self.max_height = Some(value);
        self
    }

    /// Effective maximum width for a viewport.
    #[must_use]
    pub fn max_width_in(&self, viewport: Size) -> f64 {
        self.max_width.unwrap_or(viewport.width)
    }

    /// Effective maximum height for a viewport.
    #[must_use]
    pub fn max_height_in(&self, viewport: Size) -> f64 {
        self.max_height.unwrap_or(viewport.height)
    }

    /// Clamp a width into `[min_width, max_width]`.
    #[must_use]
    pub fn clamp_width(&self, width: f64, viewport: Size) -> f64 {
        width.min(self.max_width_in(viewport)).max(self.min_width)
    }

    /// Clamp a height into `[min_height, max_height]`.
    #[must_use]
    pub fn clamp_height(&self, height: f64, viewport: Size) -> f64 {
        height.min(self.max_height_in(viewport)).max(self.min_height)
    }

    /// Clamp both dimensions.
    #[must_use]
    pub fn clamp(&self, size: Size, viewport: Size) -> Size {
        Size::new(
            self.clamp_width(size.width, viewport),
            self.clamp_height(size.height, viewport),
        )
    }
}

/// Pixel metrics of the modal frame used for hit testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModalChrome {
    /// Height of the draggable header strip.
    pub header_height: f64,
    /// Thickness of the edge resize handles.
    pub handle_thickness: f64,
    /// Side of the square corner resize handles.
    pub corner_size: f64,
    /// Side of the square close button.
    pub close_button_size: f64,
    /// Gap between the close button and the right edge.
    pub close_button_inset: f64,
}

impl Default for ModalChrome {
    fn default() -> Self {
        Self {
            header_height: 48.0,
            handle_thickness: 6.0,
            corner_size: 12.0,
            close_button_size: 32.0,
            close_button_inset: 8.0,
        }
    }
}

/// Modal configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalConfig {
    pub requested: RequestedSize,
    pub default_size: Size,
    pub constraints: ModalSizeConstraints,
    pub margin: f64,
    pub resizable: bool,
    pub close_on_escape: bool,
    pub chrome: ModalChrome,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            requested: RequestedSize::default(),
            default_size: Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            constraints: ModalSizeConstraints::default(),
            margin: DEFAULT_MARGIN,
            resizable: true,
            close_on_escape: true,
            chrome: ModalChrome::default(),
        }
    }
}

impl ModalConfig {
    #[must_use]
    pub fn requested(mut self, requested: RequestedSize) -> Self {
        self.requested = requested;
        self
    }

    #[must_use]
    pub fn default_size(mut self, size: Size) -> Self {
        self.default_size = size;
        self
    }

    #[must_use]
    pub fn constraints(mut self, constraints: ModalSizeConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    #[must_use]
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    #[must_use]
    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    #[must_use]
    pub fn chrome(mut self, chrome: ModalChrome) -> Self {
        self.chrome = chrome;
        self
    }

    /// Size the modal starts with in `viewport`: requested, then defaults,
    /// then constraints.
    #[must_use]
    pub fn initial_size(&self, viewport: Size) -> Size {
        let wanted = self.requested.resolve(self.default_size);
        self.constraints.clamp(wanted, viewport)
    }
}
