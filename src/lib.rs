//! gpui_liveplot_gestures navigates a time-series plot viewport with pan,
//! zoom, marquee select and pinch gestures.
//! The engine is framework independent; the `gpui` feature adds an adapter
//! for GPUI input events.

#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod geom;
pub mod interaction;
pub mod link;
pub mod transform;
pub mod view;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use config::EngineConfig;
pub use engine::{GestureKind, GestureState, ObserverId, PinchState, PointerMode, ViewportEngine};
pub use error::{ConfigError, GestureError};
pub use event::{
    InputEvent, InputKind, ModifierKey, Modifiers, Notification, Touches, ViewportObserver,
};
pub use geom::{Bounds, ElementPoint, MarqueeBox, Point};
pub use interaction::{
    PinchGesture, ZoomDirection, classify_pinch, compute_zoom, marquee_viewport, pan_viewport,
};
pub use link::{LinkMemberId, LinkOptions, ViewportLinkGroup};
pub use transform::{Transform, element_to_plot_point, plot_to_element_point};
pub use view::Viewport;
