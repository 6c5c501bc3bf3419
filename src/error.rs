//! Diagnostic conditions reported by the gesture engine.

use thiserror::Error;

use crate::engine::GestureKind;

/// Reason a gesture operation was ignored.
///
/// Every engine operation that returns this error has left the viewport
/// untouched; hosts may log it or drop it.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GestureError {
    /// A new gesture was requested while another one is active.
    #[error("cannot start {requested:?} while {active:?} is active")]
    GestureConflict {
        /// Gesture currently in progress.
        active: GestureKind,
        /// Gesture that was refused.
        requested: GestureKind,
    },
    /// The resulting viewport would have zero, negative or non-finite extent.
    #[error("viewport would collapse below the minimum extent")]
    DegenerateViewport,
    /// The operation belongs to a gesture that is not in progress.
    #[error("no matching gesture is in progress")]
    NotActive,
    /// No pointer position has been tracked yet.
    #[error("no pointer position is tracked")]
    NoPointer,
    /// A marquee ended before both corners were recorded.
    #[error("marquee is missing a corner")]
    IncompleteMarquee,
    /// The element bounds have zero or non-finite size.
    #[error("element bounds have no area")]
    InvalidBounds,
    /// An element position or touch point has a non-finite coordinate.
    #[error("element position is not finite")]
    InvalidPosition,
    /// Zoom ratios must be finite and positive.
    #[error("invalid zoom ratio {0}")]
    InvalidZoomRatio(f64),
}

/// Invalid [`EngineConfig`](crate::config::EngineConfig) value.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// Zoom step must lie in `(0, 1)`.
    #[error("zoom amount must be in (0, 1), got {0}")]
    ZoomAmount(f64),
    /// Pinch tolerance must be finite and non-negative.
    #[error("pinch tolerance must be finite and non-negative, got {0}")]
    PinchTolerance(f64),
    /// Minimum extent must be finite and non-negative.
    #[error("minimum extent must be finite and non-negative, got {0}")]
    MinExtent(f64),
    /// Initial viewport has no usable extent.
    #[error("initial viewport is degenerate")]
    Viewport,
}
