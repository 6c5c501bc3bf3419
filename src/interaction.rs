//! Gesture algebra for panning, marquee selection, zooming and pinching.
//!
//! These helpers are pure functions of their inputs. The engine uses them to
//! derive each new viewport; hosts can call them directly for previews.

use crate::error::GestureError;
use crate::geom::{MarqueeBox, Point};
use crate::view::Viewport;

/// Shift a viewport so that the data point `anchor` moves to where `current`
/// is displayed.
///
/// Both corners move by `anchor - current`, so the extent is preserved.
/// Far-off positions can still swallow the extent in rounding; such results,
/// and any non-finite one, are refused with
/// [`GestureError::DegenerateViewport`].
pub fn pan_viewport(
    viewport: Viewport,
    anchor: Point,
    current: Point,
    min_extent: f64,
) -> Result<Viewport, GestureError> {
    let next = viewport.translated(anchor.delta_to(current));
    if !next.has_min_extent(min_extent) {
        return Err(GestureError::DegenerateViewport);
    }
    Ok(next)
}

/// Convert a finished marquee into a viewport.
///
/// Corners may arrive in any order; each axis is re-sorted so `top_left`
/// holds the larger value. Missing corners and boxes thinner than
/// `min_extent` are refused.
pub fn marquee_viewport(marquee: &MarqueeBox, min_extent: f64) -> Result<Viewport, GestureError> {
    let (start, end) = marquee.corners().ok_or(GestureError::IncompleteMarquee)?;
    let viewport = Viewport::from_corners(start, end);
    if !viewport.has_min_extent(min_extent) {
        return Err(GestureError::DegenerateViewport);
    }
    Ok(viewport)
}

/// Whether a zoom step shrinks or grows the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    /// Edges move toward the midpoint.
    In,
    /// Edges move away from the midpoint.
    Out,
}

impl ZoomDirection {
    /// Direction for a zoom ratio.
    ///
    /// `ratio == 1` falls back to [`ZoomDirection::In`], so a zoom request
    /// with no delta still shrinks the viewport by one step.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < 1.0 { Self::Out } else { Self::In }
    }

    fn signum(self) -> f64 {
        match self {
            Self::In => 1.0,
            Self::Out => -1.0,
        }
    }
}

/// Zoom a viewport toward or away from `midpoint` by one step.
///
/// Each of the four edges moves by `zoom_amount` times its own distance to
/// the midpoint, so an off-center midpoint zooms asymmetrically toward the
/// cursor. Results thinner than `min_extent` on either axis are refused.
pub fn compute_zoom(
    midpoint: Point,
    viewport: Viewport,
    ratio: f64,
    zoom_amount: f64,
    min_extent: f64,
) -> Result<Viewport, GestureError> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(GestureError::InvalidZoomRatio(ratio));
    }
    if !viewport.is_valid() || !midpoint.is_finite() {
        return Err(GestureError::DegenerateViewport);
    }
    let step = ZoomDirection::from_ratio(ratio).signum() * zoom_amount;
    let move_edge = |edge: f64, mid: f64| edge + (mid - edge) * step;
    let next = Viewport::new(
        Point::new(
            move_edge(viewport.top_left.domain, midpoint.domain),
            move_edge(viewport.top_left.range, midpoint.range),
        ),
        Point::new(
            move_edge(viewport.bottom_right.domain, midpoint.domain),
            move_edge(viewport.bottom_right.range, midpoint.range),
        ),
    );
    if !next.has_min_extent(min_extent) {
        return Err(GestureError::DegenerateViewport);
    }
    Ok(next)
}

/// Interpretation of a two-finger movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PinchGesture {
    /// Fingers kept their spacing; translate the viewport.
    Pan,
    /// Finger spacing changed; zoom with this ratio.
    Zoom {
        /// Previous spacing divided by the current spacing.
        ratio: f64,
    },
}

/// Classify a two-finger move as a pan or a zoom.
///
/// Distances are rounded to whole pixels. A current distance within
/// `tolerance` of either the first or the previous distance is a pan, which
/// keeps small jitter from flipping between pan and zoom.
pub fn classify_pinch(
    distance: f64,
    first_distance: f64,
    last_distance: Option<f64>,
    tolerance: f64,
) -> PinchGesture {
    let previous = last_distance.unwrap_or(first_distance);
    let current = distance.round();
    let near = |reference: f64| (current - reference.round()).abs() <= tolerance;
    if near(first_distance) || near(previous) {
        PinchGesture::Pan
    } else {
        PinchGesture::Zoom {
            ratio: previous / distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(Point::new(0.0, 100.0), Point::new(200.0, 0.0))
    }

    fn edge_distances(viewport: Viewport, mid: Point) -> [f64; 4] {
        [
            (mid.domain - viewport.top_left.domain).abs(),
            (mid.range - viewport.top_left.range).abs(),
            (viewport.bottom_right.domain - mid.domain).abs(),
            (viewport.bottom_right.range - mid.range).abs(),
        ]
    }

    #[test]
    fn pan_preserves_extent() {
        let deltas = [(3.0, -4.0), (-150.5, 0.25), (1e6, -1e6), (0.0, 0.0)];
        for (dx, dy) in deltas {
            let anchor = Point::new(50.0, 50.0);
            let current = Point::new(50.0 - dx, 50.0 - dy);
            let next = pan_viewport(viewport(), anchor, current, 1e-12).unwrap();
            assert_eq!(next.width(), viewport().width());
            assert_eq!(next.height(), viewport().height());
            assert_eq!(next.top_left, Point::new(dx, 100.0 + dy));
        }
    }

    #[test]
    fn pan_refuses_unusable_results() {
        let anchor = Point::new(50.0, 50.0);
        let cases = [
            Point::new(f64::NAN, 50.0),
            Point::new(50.0, f64::INFINITY),
            Point::new(f64::MAX, 50.0),
            Point::new(50.0, -f64::MAX),
        ];
        for current in cases {
            assert_eq!(
                pan_viewport(viewport(), anchor, current, 1e-12),
                Err(GestureError::DegenerateViewport),
                "current = {current:?}"
            );
        }
    }

    #[test]
    fn marquee_normalizes_corners() {
        let marquee = MarqueeBox {
            start: Some(Point::new(10.0, 5.0)),
            end: Some(Point::new(2.0, 9.0)),
        };
        let next = marquee_viewport(&marquee, 0.0).unwrap();
        assert_eq!(next.top_left, Point::new(10.0, 9.0));
        assert_eq!(next.bottom_right, Point::new(2.0, 5.0));
    }

    #[test]
    fn marquee_rejects_missing_or_flat_boxes() {
        let half = MarqueeBox::starting_at(Point::new(1.0, 1.0));
        assert_eq!(
            marquee_viewport(&half, 0.0),
            Err(GestureError::IncompleteMarquee)
        );
        let point = MarqueeBox {
            start: Some(Point::new(1.0, 1.0)),
            end: Some(Point::new(1.0, 1.0)),
        };
        assert_eq!(
            marquee_viewport(&point, 0.0),
            Err(GestureError::DegenerateViewport)
        );
        let line = MarqueeBox {
            start: Some(Point::new(1.0, 1.0)),
            end: Some(Point::new(8.0, 1.0)),
        };
        assert_eq!(
            marquee_viewport(&line, 0.0),
            Err(GestureError::DegenerateViewport)
        );
    }

    #[test]
    fn zoom_in_shrinks_every_edge() {
        let mid = Point::new(40.0, 70.0);
        let before = edge_distances(viewport(), mid);
        for ratio in [1.01, 1.5, 4.0] {
            let next = compute_zoom(mid, viewport(), ratio, 0.02, 0.0).unwrap();
            let after = edge_distances(next, mid);
            for (a, b) in after.iter().zip(before) {
                assert!(*a < b, "{a} should be < {b}");
                assert!((a - b * 0.98).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn zoom_out_grows_every_edge() {
        let mid = Point::new(150.0, 20.0);
        let before = edge_distances(viewport(), mid);
        for ratio in [0.99, 0.5, 0.01] {
            let next = compute_zoom(mid, viewport(), ratio, 0.02, 0.0).unwrap();
            let after = edge_distances(next, mid);
            for (a, b) in after.iter().zip(before) {
                assert!(*a > b, "{a} should be > {b}");
            }
        }
    }

    #[test]
    fn zoom_keeps_midpoint_fixed_and_orientation() {
        let mid = Point::new(10.0, 90.0);
        let next = compute_zoom(mid, viewport(), 2.0, 0.02, 0.0).unwrap();
        assert!(next.top_left.domain < next.bottom_right.domain);
        assert!(next.top_left.range > next.bottom_right.range);
        let frac_before = (mid.domain - 0.0) / 200.0;
        let frac_after =
            (mid.domain - next.top_left.domain) / (next.bottom_right.domain - next.top_left.domain);
        assert!((frac_before - frac_after).abs() < 1e-12);
    }

    #[test]
    fn unit_ratio_zooms_in() {
        assert_eq!(ZoomDirection::from_ratio(1.0), ZoomDirection::In);
        let next = compute_zoom(viewport().center(), viewport(), 1.0, 0.02, 0.0).unwrap();
        assert!(next.width() < viewport().width());
    }

    #[test]
    fn zoom_rejects_bad_input() {
        let mid = viewport().center();
        assert_eq!(
            compute_zoom(mid, viewport(), 0.0, 0.02, 0.0),
            Err(GestureError::InvalidZoomRatio(0.0))
        );
        assert!(matches!(
            compute_zoom(mid, viewport(), f64::NAN, 0.02, 0.0),
            Err(GestureError::InvalidZoomRatio(_))
        ));
        let flat = Viewport::new(Point::new(0.0, 1.0), Point::new(1.0, 1.0));
        assert_eq!(
            compute_zoom(mid, flat, 2.0, 0.02, 0.0),
            Err(GestureError::DegenerateViewport)
        );
    }

    #[test]
    fn zoom_respects_min_extent() {
        let small = Viewport::new(Point::new(0.0, 1.0), Point::new(1.0, 0.0));
        let mid = small.center();
        assert_eq!(
            compute_zoom(mid, small, 2.0, 0.02, 0.99),
            Err(GestureError::DegenerateViewport)
        );
        assert!(compute_zoom(mid, small, 0.5, 0.02, 0.99).is_ok());
    }

    #[test]
    fn pinch_hysteresis() {
        assert_eq!(classify_pinch(101.0, 100.0, Some(100.0), 2.0), PinchGesture::Pan);
        assert_eq!(classify_pinch(102.4, 100.0, Some(100.0), 2.0), PinchGesture::Pan);
        match classify_pinch(120.0, 100.0, Some(100.0), 2.0) {
            PinchGesture::Zoom { ratio } => assert!((ratio - 100.0 / 120.0).abs() < 1e-12),
            PinchGesture::Pan => panic!("expected zoom"),
        }
    }

    #[test]
    fn pinch_pan_near_previous_distance() {
        assert_eq!(classify_pinch(131.0, 100.0, Some(130.0), 2.0), PinchGesture::Pan);
        match classify_pinch(80.0, 100.0, None, 2.0) {
            PinchGesture::Zoom { ratio } => assert!((ratio - 1.25).abs() < 1e-12),
            PinchGesture::Pan => panic!("expected zoom"),
        }
    }
}
