//! Normalized input events and the notifications the engine emits.
//!
//! Hosts translate their native pointer, wheel, touch and keyboard events into
//! [`InputEvent`]s before handing them to the engine. Observers receive
//! [`Notification`]s whenever the viewport or the marquee rectangle changes.

use crate::geom::{Bounds, ElementPoint, MarqueeBox};
use crate::view::Viewport;

/// Keyboard modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Check whether the given key is held.
    pub fn is_held(&self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::Shift => self.shift,
            ModifierKey::Ctrl => self.ctrl,
            ModifierKey::Alt => self.alt,
            ModifierKey::Meta => self.meta,
        }
    }
}

/// A single modifier key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierKey {
    /// Shift.
    Shift,
    /// Ctrl.
    Ctrl,
    /// Alt / Option.
    Alt,
    /// Meta / Command.
    Meta,
}

/// Active fingers of a touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Touches {
    /// One finger.
    One(ElementPoint),
    /// Two fingers.
    Two(ElementPoint, ElementPoint),
}

impl Touches {
    /// Midpoint of the active fingers.
    pub fn midpoint(&self) -> ElementPoint {
        match *self {
            Self::One(point) => point,
            Self::Two(a, b) => a.midpoint(b),
        }
    }
}

/// Kind of a normalized input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputKind {
    /// Mouse button pressed.
    PointerDown,
    /// Pointer moved.
    PointerMove,
    /// Mouse button released.
    PointerUp,
    /// Wheel or trackpad zoom; `ratio > 1` zooms in.
    Wheel {
        /// Zoom ratio about the event position.
        ratio: f64,
    },
    /// Fingers touched down.
    TouchStart(Touches),
    /// Fingers moved.
    TouchMove(Touches),
    /// Fingers lifted.
    TouchEnd,
    /// Held modifier keys changed.
    ModifiersChanged,
    /// Out-of-band cancellation, such as lost pointer capture.
    Interrupt,
}

/// An input event normalized to element space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    /// What happened.
    pub kind: InputKind,
    /// Pointer (or touch midpoint) position relative to `bounds`.
    pub position: ElementPoint,
    /// Plot area bounds at the time of the event.
    pub bounds: Bounds,
    /// Modifier keys held.
    pub modifiers: Modifiers,
}

impl InputEvent {
    /// Create an event with no modifiers held.
    pub fn new(kind: InputKind, position: ElementPoint, bounds: Bounds) -> Self {
        Self {
            kind,
            position,
            bounds,
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach modifier state to the event.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Build a touch event; the position is the touch midpoint.
    pub fn touch(kind: fn(Touches) -> InputKind, touches: Touches, bounds: Bounds) -> Self {
        Self::new(kind(touches), touches.midpoint(), bounds)
    }
}

/// Message sent to observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    /// A viewport-changing gesture began.
    ViewportChangeStart,
    /// The viewport changed during a gesture.
    ViewportChanged(Viewport),
    /// A viewport-changing gesture finished with this viewport.
    ViewportChangeEnd(Viewport),
    /// The live marquee rectangle changed; `None` clears it.
    MarqueeChanged(Option<MarqueeBox>),
}

/// Receiver of engine notifications.
pub trait ViewportObserver {
    /// Handle one notification.
    fn notify(&mut self, notification: &Notification);
}

impl<F> ViewportObserver for F
where
    F: FnMut(&Notification),
{
    fn notify(&mut self, notification: &Notification) {
        self(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_lookup() {
        let modifiers = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        assert!(modifiers.is_held(ModifierKey::Ctrl));
        assert!(!modifiers.is_held(ModifierKey::Shift));
    }

    #[test]
    fn touch_event_uses_midpoint() {
        let bounds = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let touches = Touches::Two(ElementPoint::new(10.0, 10.0), ElementPoint::new(30.0, 50.0));
        let event = InputEvent::touch(InputKind::TouchStart, touches, bounds);
        assert_eq!(event.position, ElementPoint::new(20.0, 30.0));
        assert_eq!(event.kind, InputKind::TouchStart(touches));
    }

    #[test]
    fn closures_are_observers() {
        let mut seen = Vec::new();
        {
            let mut observer = |n: &Notification| seen.push(*n);
            observer.notify(&Notification::ViewportChangeStart);
        }
        assert_eq!(seen, vec![Notification::ViewportChangeStart]);
    }
}
