//! GPUI integration for the viewport gesture engine.
//!
//! GPUI views forward their mouse, scroll and modifier events through
//! [`GestureInput`], which normalizes them into [`InputEvent`](crate::InputEvent)s
//! relative to the plot area and hands them to a
//! [`ViewportEngine`](crate::ViewportEngine).

mod input;

pub use input::{GestureInput, scroll_ratio};
