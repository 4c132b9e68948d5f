// crates/scrubreel-core/src/helpers/geometry.rs
//
// Sizing and placement math for thumbnails and the hover popup.
//
// Kept out of scrubreel-media so the popup placement can be tested without a
// decoder, and so a front-end can size its widgets with the same numbers.

/// Output size for a frame scaled to `height` while keeping `aspect`
/// (width / height). Width is truncated, never below 1.
///
/// ```
/// use scrubreel_core::helpers::geometry::scaled_size;
/// assert_eq!(scaled_size(16.0 / 9.0, 80), (142, 80));
/// assert_eq!(scaled_size(4.0 / 3.0, 80),  (106, 80));
/// ```
pub fn scaled_size(aspect: f64, height: u32) -> (u32, u32) {
    let height = height.max(1);
    let width  = if aspect.is_finite() && aspect > 0.0 {
        (aspect * height as f64) as u32
    } else {
        height
    };
    (width.max(1), height)
}

/// Axis-aligned rectangle in screen coordinates (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub x:      f64,
    pub y:      f64,
    pub width:  f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Popup dimensions plus the gap left between the popup's bottom edge and
/// the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopupLayout {
    pub width:  f64,
    pub height: f64,
    pub gap:    f64,
}

impl PopupLayout {
    /// Top-left corner for the popup: horizontally centered on the pointer,
    /// sitting `gap` above it, then clamped so the whole popup stays inside
    /// `screen`. A popup larger than the screen is pinned to the screen's
    /// top-left corner.
    ///
    /// ```
    /// use scrubreel_core::helpers::geometry::{PopupLayout, ScreenRect};
    /// let layout = PopupLayout { width: 202.0, height: 108.0, gap: 10.0 };
    /// let screen = ScreenRect::new(0.0, 0.0, 1920.0, 1080.0);
    /// assert_eq!(layout.place(500.0, 900.0, screen), (399.0, 782.0));
    /// ```
    pub fn place(&self, pointer_x: f64, pointer_y: f64, screen: ScreenRect) -> (f64, f64) {
        let x = pointer_x - (self.width / 2.0).floor();
        let y = pointer_y - self.height - self.gap;

        let max_x = (screen.x + screen.width  - self.width).max(screen.x);
        let max_y = (screen.y + screen.height - self.height).max(screen.y);
        (x.clamp(screen.x, max_x), y.clamp(screen.y, max_y))
    }
}
