//! Viewport rectangles in data space.

use crate::geom::Point;

/// Visible data-space rectangle, described by two opposite corners.
///
/// The corners are not required to be ordered on the domain axis, but a
/// usable viewport always spans a non-zero, finite extent on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// Corner mapped onto the top-left pixel of the plot area.
    pub top_left: Point,
    /// Corner mapped onto the bottom-right pixel of the plot area.
    pub bottom_right: Point,
}

impl Viewport {
    /// Create a viewport from its corners.
    pub fn new(top_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Build the viewport spanned by two arbitrary opposite corners.
    ///
    /// `top_left` takes the larger value on each axis and `bottom_right` the
    /// smaller one, so ticks run in decreasing order from the top-left.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            top_left: Point::new(a.domain.max(b.domain), a.range.max(b.range)),
            bottom_right: Point::new(a.domain.min(b.domain), a.range.min(b.range)),
        }
    }

    /// Absolute extent along the domain axis.
    pub fn width(&self) -> f64 {
        (self.bottom_right.domain - self.top_left.domain).abs()
    }

    /// Absolute extent along the range axis.
    pub fn height(&self) -> f64 {
        (self.top_left.range - self.bottom_right.range).abs()
    }

    /// Geometric center of the viewport.
    pub fn center(&self) -> Point {
        Point::new(
            (self.top_left.domain + self.bottom_right.domain) * 0.5,
            (self.top_left.range + self.bottom_right.range) * 0.5,
        )
    }

    /// Check whether both corners are finite.
    pub fn is_finite(&self) -> bool {
        self.top_left.is_finite() && self.bottom_right.is_finite()
    }

    /// Check whether both axes span at least `min_extent`.
    pub fn has_min_extent(&self, min_extent: f64) -> bool {
        self.is_finite()
            && self.width() > 0.0
            && self.height() > 0.0
            && self.width() >= min_extent
            && self.height() >= min_extent
    }

    /// Check whether the viewport is finite with non-zero extent.
    pub fn is_valid(&self) -> bool {
        self.has_min_extent(0.0)
    }

    /// Shift both corners by the same data-space offset.
    pub fn translated(&self, delta: Point) -> Self {
        Self {
            top_left: self.top_left.offset(delta),
            bottom_right: self.bottom_right.offset(delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_orders_each_axis() {
        let viewport = Viewport::from_corners(Point::new(10.0, 5.0), Point::new(2.0, 9.0));
        assert_eq!(viewport.top_left, Point::new(10.0, 9.0));
        assert_eq!(viewport.bottom_right, Point::new(2.0, 5.0));
    }

    #[test]
    fn extents_ignore_corner_order() {
        let viewport = Viewport::new(Point::new(0.0, 10.0), Point::new(4.0, 2.0));
        assert_eq!(viewport.width(), 4.0);
        assert_eq!(viewport.height(), 8.0);
        assert_eq!(viewport.center(), Point::new(2.0, 6.0));
    }

    #[test]
    fn degenerate_viewports_are_invalid() {
        let flat = Viewport::new(Point::new(0.0, 1.0), Point::new(5.0, 1.0));
        assert!(!flat.is_valid());
        let infinite = Viewport::new(Point::new(0.0, f64::INFINITY), Point::new(5.0, 1.0));
        assert!(!infinite.is_valid());
        let tiny = Viewport::new(Point::new(0.0, 1e-9), Point::new(1e-9, 0.0));
        assert!(tiny.is_valid());
        assert!(!tiny.has_min_extent(1e-6));
    }

    #[test]
    fn translation_keeps_extent() {
        let viewport = Viewport::new(Point::new(0.0, 10.0), Point::new(4.0, 2.0));
        let moved = viewport.translated(Point::new(-3.5, 7.25));
        assert_eq!(moved.width(), viewport.width());
        assert_eq!(moved.height(), viewport.height());
        assert_eq!(moved.top_left, Point::new(-3.5, 17.25));
    }
}
