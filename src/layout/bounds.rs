//! Axis-aligned bounding boxes of laid out trees.

use serde::Serialize;

/// Axis-aligned bounding box in layout coordinates.
///
/// An empty box has `min = +∞` and `max = -∞`; [Bounds::finite] turns it
/// into the zero box so degenerate layouts never leak infinities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    /// Smallest `[x, y]`
    pub min: [f64; 2],
    /// Largest `[x, y]`
    pub max: [f64; 2],
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    /// Creates a box from its corners.
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    /// Creates an empty box, ready to [include](Self::include) points.
    pub fn empty() -> Self {
        Self {
            min: [f64::INFINITY; 2],
            max: [f64::NEG_INFINITY; 2],
        }
    }

    /// Creates the box `[-extent, extent]²`.
    pub fn symmetric(extent: f64) -> Self {
        Self::new([-extent, -extent], [extent, extent])
    }

    /// Returns whether no point has been included.
    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0] || self.min[1] > self.max[1]
    }

    /// Grows the box to contain the point `(x, y)`.
    pub fn include(&mut self, x: f64, y: f64) {
        self.min[0] = self.min[0].min(x);
        self.min[1] = self.min[1].min(y);
        self.max[0] = self.max[0].max(x);
        self.max[1] = self.max[1].max(y);
    }

    /// Returns this box, or the zero box if it is empty.
    pub fn finite(self) -> Self {
        if self.is_empty() {
            Self::new([0.0; 2], [0.0; 2])
        } else {
            self
        }
    }

    /// Extent along x.
    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    /// Extent along y.
    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    /// Centre point `[x, y]`.
    pub fn centre(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
        ]
    }

    /// Returns the box moved by `(-dx, -dy)`.
    pub fn shifted(&self, dx: f64, dy: f64) -> Self {
        Self::new(
            [self.min[0] - dx, self.min[1] - dy],
            [self.max[0] - dx, self.max[1] - dy],
        )
    }

    /// Returns the box with both axes multiplied by the given factors.
    pub fn scaled(&self, x_scale: f64, y_scale: f64) -> Self {
        Self::new(
            [self.min[0] * x_scale, self.min[1] * y_scale],
            [self.max[0] * x_scale, self.max[1] * y_scale],
        )
    }

    /// Width of the smallest origin-centred box containing this one.
    pub fn centred_width(&self) -> f64 {
        (-self.min[0]).max(self.max[0]) * 2.0
    }

    /// Height of the smallest origin-centred box containing this one.
    pub fn centred_height(&self) -> f64 {
        (-self.min[1]).max(self.max[1]) * 2.0
    }
}
