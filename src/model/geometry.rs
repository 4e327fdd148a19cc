//! Page geometry in top-down coordinates.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in top-down page space.
///
/// The origin is the top-left corner of the page, `y` grows downward, and
/// units are points. `y0` is always the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    /// Create a rectangle from two corners, normalizing their order.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Top edge.
    pub fn top(&self) -> f32 {
        self.y0
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Length of the vertical overlap with another rectangle.
    pub fn vertical_overlap(&self, other: &Rect) -> f32 {
        (self.y1.min(other.y1) - self.y0.max(other.y0)).max(0.0)
    }

    /// Check if an x coordinate falls inside the horizontal extent.
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x0 && x <= self.x1
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}
