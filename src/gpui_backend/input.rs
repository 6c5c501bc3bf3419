use gpui::{
    Bounds as GpuiBounds, ModifiersChangedEvent, MouseButton, MouseDownEvent, MouseMoveEvent,
    MouseUpEvent, Pixels, Point, ScrollWheelEvent, px,
};

use crate::engine::ViewportEngine;
use crate::error::GestureError;
use crate::event::{InputEvent, InputKind, Modifiers};
use crate::geom::{Bounds, ElementPoint};

const SCROLL_LINE_HEIGHT: f32 = 16.0;
const SCROLL_ZOOM_SPEED: f64 = 0.002;

/// Zoom ratio for a vertical scroll delta in pixels.
///
/// Scrolling up zooms in. Returns `None` for deltas too small to matter.
pub fn scroll_ratio(delta_y: f32) -> Option<f64> {
    let zoom_delta = -delta_y;
    if zoom_delta.abs() < 0.01 {
        return None;
    }
    Some((1.0 + zoom_delta as f64 * SCROLL_ZOOM_SPEED).clamp(0.1, 10.0))
}

/// Translates GPUI input events into engine events.
///
/// Record the plot area with [`GestureInput::set_bounds`] during prepaint;
/// events arriving before the first layout are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureInput {
    bounds: Option<Bounds>,
}

impl GestureInput {
    /// Create an adapter with no known plot area.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the window-space plot area.
    pub fn set_bounds(&mut self, bounds: GpuiBounds<Pixels>) {
        self.bounds = Some(Bounds::new(
            f32::from(bounds.origin.x) as f64,
            f32::from(bounds.origin.y) as f64,
            f32::from(bounds.size.width) as f64,
            f32::from(bounds.size.height) as f64,
        ));
    }

    /// Last recorded plot area.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Normalize a mouse-down event. Only the left button drives gestures.
    pub fn mouse_down(&self, ev: &MouseDownEvent) -> Option<InputEvent> {
        if ev.button != MouseButton::Left {
            return None;
        }
        self.event(InputKind::PointerDown, ev.position, &ev.modifiers)
    }

    /// Normalize a mouse-move event.
    pub fn mouse_move(&self, ev: &MouseMoveEvent) -> Option<InputEvent> {
        self.event(InputKind::PointerMove, ev.position, &ev.modifiers)
    }

    /// Normalize a mouse-up event.
    pub fn mouse_up(&self, ev: &MouseUpEvent) -> Option<InputEvent> {
        if ev.button != MouseButton::Left {
            return None;
        }
        self.event(InputKind::PointerUp, ev.position, &ev.modifiers)
    }

    /// Normalize a scroll event into a zoom about the cursor.
    pub fn scroll(&self, ev: &ScrollWheelEvent) -> Option<InputEvent> {
        let delta = ev.delta.pixel_delta(px(SCROLL_LINE_HEIGHT));
        let ratio = scroll_ratio(f32::from(delta.y))?;
        self.event(InputKind::Wheel { ratio }, ev.position, &ev.modifiers)
    }

    /// Normalize a modifier change. The position is irrelevant and left at
    /// the element origin.
    pub fn modifiers_changed(&self, ev: &ModifiersChangedEvent) -> Option<InputEvent> {
        let bounds = self.bounds?;
        Some(
            InputEvent::new(
                InputKind::ModifiersChanged,
                ElementPoint::new(0.0, 0.0),
                bounds,
            )
            .with_modifiers(modifiers(&ev.modifiers)),
        )
    }

    /// Event cancelling the gesture in progress, e.g. when the view loses
    /// focus.
    pub fn interrupt(&self) -> Option<InputEvent> {
        let bounds = self.bounds?;
        Some(InputEvent::new(
            InputKind::Interrupt,
            ElementPoint::new(0.0, 0.0),
            bounds,
        ))
    }

    /// Feed a normalized event to the engine, logging refused gestures.
    pub fn forward(
        engine: &mut ViewportEngine,
        event: Option<InputEvent>,
    ) -> Result<(), GestureError> {
        let Some(event) = event else {
            return Ok(());
        };
        engine.handle(&event).inspect_err(|err| {
            tracing::debug!(kind = ?event.kind, %err, "gpui input ignored");
        })
    }

    fn event(
        &self,
        kind: InputKind,
        position: Point<Pixels>,
        held: &gpui::Modifiers,
    ) -> Option<InputEvent> {
        let bounds = self.bounds?;
        let position = bounds.to_element(
            f32::from(position.x) as f64,
            f32::from(position.y) as f64,
        );
        Some(InputEvent::new(kind, position, bounds).with_modifiers(modifiers(held)))
    }
}

fn modifiers(held: &gpui::Modifiers) -> Modifiers {
    Modifiers {
        shift: held.shift,
        ctrl: held.control,
        alt: held.alt,
        meta: held.platform,
    }
}
