use crate::area::Point;

/// Rendered size of the map image in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImageBounds {
    pub width: f64,
    pub height: f64,
}

impl ImageBounds {
    pub fn new(width: f64, height: f64) -> Self {
        ImageBounds { width, height }
    }

    /// Whether an image-relative position falls on the image.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width && y < self.height
    }
}

/// Absolute `left`/`top` for an element inside a positioned container.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPos {
    pub left: f64,
    pub top: f64,
}

impl ScreenPos {
    pub fn new(left: f64, top: f64) -> Self {
        ScreenPos { left, top }
    }
}

/// Where to drop the pin so its tip lands on `at`.
///
/// `origin` is the map image's position inside the container the pin is
/// appended to.
pub(crate) fn pin_position(at: Point, origin: ScreenPos, offset: f64) -> ScreenPos {
    ScreenPos {
        left: at.x as f64 + origin.left,
        top: at.y as f64 + origin.top - offset,
    }
}

/// Where to draw the hover arrow so it points at `corner`.
pub(crate) fn arrow_position(corner: Point, origin: ScreenPos, offset: f64) -> ScreenPos {
    ScreenPos {
        left: corner.x as f64 + origin.left - offset,
        top: corner.y as f64 + origin.top - offset,
    }
}
