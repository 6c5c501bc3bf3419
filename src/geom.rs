//! Geometric primitives used by the gesture engine.
//!
//! [`Point`] lives in data space, [`ElementPoint`] and [`Bounds`] live in
//! pixel space relative to the element the plot is rendered into.

/// A point in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Domain (horizontal) value.
    pub domain: f64,
    /// Range (vertical) value.
    pub range: f64,
}

impl Point {
    /// Create a new data point.
    pub fn new(domain: f64, range: f64) -> Self {
        Self { domain, range }
    }

    /// Componentwise difference `self - other`.
    pub fn delta_to(self, other: Self) -> Self {
        Self::new(self.domain - other.domain, self.range - other.range)
    }

    /// Shift the point by a data-space offset.
    pub fn offset(self, delta: Self) -> Self {
        Self::new(self.domain + delta.domain, self.range + delta.range)
    }

    /// Check whether both components are finite.
    pub fn is_finite(&self) -> bool {
        self.domain.is_finite() && self.range.is_finite()
    }
}

/// A point in pixel space, relative to the top-left corner of [`Bounds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementPoint {
    /// Horizontal offset in pixels.
    pub x: f64,
    /// Vertical offset in pixels, growing downward.
    pub y: f64,
}

impl ElementPoint {
    /// Create a new element point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Euclidean distance to `other` in pixels.
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns true when both coordinates are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The on-screen rectangle a plot is rendered into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge in window pixels.
    pub left: f64,
    /// Top edge in window pixels.
    pub top: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Bounds {
    /// Create bounds from the top-left corner and size.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Check whether the rectangle has positive, finite area.
    pub fn is_valid(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Convert a window-space position into an element-relative one.
    pub fn to_element(&self, window_x: f64, window_y: f64) -> ElementPoint {
        ElementPoint::new(window_x - self.left, window_y - self.top)
    }
}

/// Rectangle being drawn by a marquee gesture.
///
/// Either corner is absent until the gesture has produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MarqueeBox {
    /// Corner where the gesture began.
    pub start: Option<Point>,
    /// Corner under the pointer.
    pub end: Option<Point>,
}

impl MarqueeBox {
    /// Box anchored at `start` with no end yet.
    pub fn starting_at(start: Point) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Both corners, when present.
    pub fn corners(&self) -> Option<(Point, Point)> {
        Some((self.start?, self.end?))
    }

    /// Check whether both corners are present.
    pub fn is_complete(&self) -> bool {
        self.corners().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_geometry() {
        let a = ElementPoint::new(0.0, 0.0);
        let b = ElementPoint::new(30.0, 40.0);
        assert_eq!(a.midpoint(b), ElementPoint::new(15.0, 20.0));
        assert!((a.distance(b) - 50.0).abs() < 1e-12);
        assert!(b.is_finite());
        assert!(!ElementPoint::new(f64::NAN, 0.0).is_finite());
        assert!(!ElementPoint::new(0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn bounds_validity() {
        assert!(Bounds::new(10.0, 20.0, 100.0, 50.0).is_valid());
        assert!(!Bounds::new(0.0, 0.0, 0.0, 50.0).is_valid());
        assert!(!Bounds::new(0.0, 0.0, 100.0, -1.0).is_valid());
        assert!(!Bounds::new(f64::NAN, 0.0, 100.0, 50.0).is_valid());
    }

    #[test]
    fn window_position_is_made_element_relative() {
        let bounds = Bounds::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(bounds.to_element(15.0, 30.0), ElementPoint::new(5.0, 10.0));
    }

    #[test]
    fn marquee_box_requires_both_corners() {
        let mut marquee = MarqueeBox::starting_at(Point::new(1.0, 2.0));
        assert!(!marquee.is_complete());
        marquee.end = Some(Point::new(3.0, 4.0));
        assert_eq!(
            marquee.corners(),
            Some((Point::new(1.0, 2.0), Point::new(3.0, 4.0)))
        );
    }
}
