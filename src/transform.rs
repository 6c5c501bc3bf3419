//! Coordinate transforms between element (pixel) and plot (data) space.

use crate::geom::{Bounds, ElementPoint, Point};
use crate::view::Viewport;

/// Mapping between an element's pixel rectangle and a data-space viewport.
///
/// Pixel `(0, 0)` maps onto `viewport.top_left` and `(width, height)` onto
/// `viewport.bottom_right`, so with the range axis descending from the top
/// the vertical axis is inverted.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    viewport: Viewport,
    bounds: Bounds,
}

impl Transform {
    /// Create a transform for the given viewport and element bounds.
    ///
    /// Returns `None` when either rectangle has zero or non-finite extent.
    pub fn new(viewport: Viewport, bounds: Bounds) -> Option<Self> {
        if !bounds.is_valid() || !viewport.is_valid() {
            return None;
        }
        Some(Self { viewport, bounds })
    }

    /// Access the viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Access the element bounds.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Map an element position into data space.
    pub fn element_to_plot(&self, position: ElementPoint) -> Point {
        let x_norm = position.x / self.bounds.width;
        let y_norm = position.y / self.bounds.height;
        let tl = self.viewport.top_left;
        let br = self.viewport.bottom_right;
        Point::new(
            tl.domain + x_norm * (br.domain - tl.domain),
            tl.range + y_norm * (br.range - tl.range),
        )
    }

    /// Map a data point into element space.
    pub fn plot_to_element(&self, point: Point) -> ElementPoint {
        let tl = self.viewport.top_left;
        let br = self.viewport.bottom_right;
        let x_norm = (point.domain - tl.domain) / (br.domain - tl.domain);
        let y_norm = (point.range - tl.range) / (br.range - tl.range);
        ElementPoint::new(x_norm * self.bounds.width, y_norm * self.bounds.height)
    }
}

/// Map an element position onto the data-space point it displays.
pub fn element_to_plot_point(
    position: ElementPoint,
    bounds: Bounds,
    viewport: Viewport,
) -> Option<Point> {
    Transform::new(viewport, bounds).map(|transform| transform.element_to_plot(position))
}

/// Inverse of [`element_to_plot_point`].
pub fn plot_to_element_point(
    point: Point,
    bounds: Bounds,
    viewport: Viewport,
) -> Option<ElementPoint> {
    Transform::new(viewport, bounds).map(|transform| transform.plot_to_element(point))
}
