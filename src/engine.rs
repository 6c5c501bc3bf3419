//! The viewport gesture engine.
//!
//! [`ViewportEngine`] owns a [`Viewport`] and the transient [`GestureState`]
//! of the interaction in progress. Hosts either call the gesture operations
//! directly or feed normalized [`InputEvent`]s through
//! [`ViewportEngine::handle`], which dispatches on the current state.
//!
//! At most one gesture is active at a time:
//!
//! ```text
//! Idle -> Dragging   -> Idle   (mouse drag, pan mode)
//! Idle -> Marqueeing -> Idle   (mouse drag, marquee mode)
//! Idle -> Pinching   -> Idle   (two fingers)
//! Idle -> Panning    -> Idle   (one finger)
//! ```

use std::fmt;
use std::mem;

use crate::config::EngineConfig;
use crate::error::{ConfigError, GestureError};
use crate::event::{InputEvent, InputKind, Modifiers, Notification, Touches, ViewportObserver};
use crate::geom::{Bounds, ElementPoint, MarqueeBox, Point};
use crate::interaction::{
    PinchGesture, classify_pinch, compute_zoom, marquee_viewport, pan_viewport,
};
use crate::link::{LinkBinding, LinkOptions, ViewportLinkGroup};
use crate::transform::Transform;
use crate::view::Viewport;

/// Kind of gesture, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Mouse drag panning the viewport.
    Drag,
    /// Mouse drag selecting a new viewport.
    Marquee,
    /// Wheel zoom.
    Zoom,
    /// Two-finger pan/zoom.
    Pinch,
    /// One-finger pan.
    Pan,
    /// Viewport replaced by the host.
    Reset,
}

/// What a mouse drag does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerMode {
    /// Drag pans the viewport.
    #[default]
    Pan,
    /// Drag draws a marquee that becomes the new viewport.
    Marquee,
}

impl PointerMode {
    fn gesture(self) -> GestureKind {
        match self {
            Self::Pan => GestureKind::Drag,
            Self::Marquee => GestureKind::Marquee,
        }
    }
}

/// Two-finger gesture context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchState {
    /// Finger positions when the gesture began.
    pub first_touches: [ElementPoint; 2],
    /// Finger spacing when the gesture began.
    pub first_distance: f64,
    /// Finger spacing at the previous move.
    pub last_distance: Option<f64>,
    /// Data point under the initial midpoint.
    pub anchor: Point,
}

/// Transient state of the interaction in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Mouse drag in pan mode.
    Dragging {
        /// Data point under the pointer when the drag began.
        start: Point,
    },
    /// Mouse drag in marquee mode.
    Marqueeing {
        /// Rectangle drawn so far.
        marquee: MarqueeBox,
    },
    /// Two fingers down.
    Pinching(PinchState),
    /// One finger down.
    Panning {
        /// Data point under the finger when the touch began.
        anchor: Point,
    },
}

impl GestureState {
    /// Kind of the active gesture, or `None` when idle.
    pub fn kind(&self) -> Option<GestureKind> {
        match self {
            Self::Idle => None,
            Self::Dragging { .. } => Some(GestureKind::Drag),
            Self::Marqueeing { .. } => Some(GestureKind::Marquee),
            Self::Pinching(_) => Some(GestureKind::Pinch),
            Self::Panning { .. } => Some(GestureKind::Pan),
        }
    }
}

/// Identifier returned by [`ViewportEngine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Debug, Clone, Copy)]
struct Pointer {
    position: ElementPoint,
    bounds: Bounds,
}

/// Viewport navigation engine for one plot.
pub struct ViewportEngine {
    config: EngineConfig,
    viewport: Viewport,
    state: GestureState,
    mode: PointerMode,
    pointer: Option<Pointer>,
    committed: bool,
    observers: Vec<(ObserverId, Box<dyn ViewportObserver>)>,
    next_observer_id: u64,
    link: Option<LinkBinding>,
}

impl fmt::Debug for ViewportEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportEngine")
            .field("config", &self.config)
            .field("viewport", &self.viewport)
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl ViewportEngine {
    /// Create an engine showing `viewport`.
    pub fn new(viewport: Viewport, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if !viewport.has_min_extent(config.min_extent) {
            return Err(ConfigError::Viewport);
        }
        Ok(Self {
            config,
            viewport,
            state: GestureState::Idle,
            mode: PointerMode::default(),
            pointer: None,
            committed: false,
            observers: Vec::new(),
            next_observer_id: 0,
            link: None,
        })
    }

    /// Create an engine with the default configuration.
    pub fn with_viewport(viewport: Viewport) -> Result<Self, ConfigError> {
        Self::new(viewport, EngineConfig::default())
    }

    /// Share committed viewports with other members of `group`.
    pub fn with_link_group(mut self, group: ViewportLinkGroup, options: LinkOptions) -> Self {
        self.link = Some(LinkBinding::new(group, options));
        self
    }

    /// Access the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Access the current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Access the gesture state.
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Access the mouse drag mode.
    pub fn mode(&self) -> PointerMode {
        self.mode
    }

    /// Check whether no gesture is in progress.
    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    /// Marquee rectangle being drawn, if any.
    pub fn marquee(&self) -> Option<MarqueeBox> {
        match self.state {
            GestureState::Marqueeing { marquee } => Some(marquee),
            _ => None,
        }
    }

    /// Register an observer for viewport notifications.
    pub fn subscribe(&mut self, observer: impl ViewportObserver + 'static) -> ObserverId {
        self.next_observer_id = self.next_observer_id.wrapping_add(1);
        let id = ObserverId(self.next_observer_id);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Replace the viewport from outside a gesture, e.g. a reset button.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), GestureError> {
        if let Some(active) = self.state.kind() {
            return Err(GestureError::GestureConflict {
                active,
                requested: GestureKind::Reset,
            });
        }
        if !viewport.has_min_extent(self.config.min_extent) {
            return Err(GestureError::DegenerateViewport);
        }
        self.apply(viewport);
        self.committed = false;
        Ok(())
    }

    /// Switch the mouse drag mode. Only legal while idle.
    pub fn set_mode(&mut self, mode: PointerMode) -> Result<(), GestureError> {
        if mode == self.mode {
            return Ok(());
        }
        if let Some(active) = self.state.kind() {
            return Err(GestureError::GestureConflict {
                active,
                requested: mode.gesture(),
            });
        }
        tracing::debug!(?mode, "pointer mode changed");
        self.mode = mode;
        Ok(())
    }

    /// Mode selected by the held modifier keys.
    pub fn mode_for(&self, modifiers: Modifiers) -> PointerMode {
        if modifiers.is_held(self.config.marquee_modifier) {
            PointerMode::Marquee
        } else {
            PointerMode::Pan
        }
    }

    /// Record the pointer position and return the data point under it.
    pub fn track_pointer(
        &mut self,
        position: ElementPoint,
        bounds: Bounds,
    ) -> Result<Point, GestureError> {
        let point = self.plot_point(position, bounds)?;
        self.pointer = Some(Pointer { position, bounds });
        Ok(point)
    }

    /// Data point under the tracked pointer in the current viewport.
    pub fn current_point(&self) -> Option<Point> {
        let pointer = self.pointer?;
        self.plot_point(pointer.position, pointer.bounds).ok()
    }

    /// Begin panning with the mouse at the tracked pointer position.
    pub fn start_drag(&mut self) -> Result<(), GestureError> {
        self.ensure_idle(GestureKind::Drag)?;
        let start = self.current_point().ok_or(GestureError::NoPointer)?;
        tracing::debug!(?start, "drag started");
        self.state = GestureState::Dragging { start };
        self.committed = false;
        self.emit(Notification::ViewportChangeStart);
        Ok(())
    }

    /// Move the viewport so the drag start point sits under the pointer.
    pub fn update_drag(&mut self) -> Result<Viewport, GestureError> {
        let GestureState::Dragging { start } = self.state else {
            return Err(GestureError::NotActive);
        };
        let current = self.current_point().ok_or(GestureError::NoPointer)?;
        let next = pan_viewport(self.viewport, start, current, self.config.min_extent)
            .inspect_err(|err| tracing::debug!(?current, %err, "drag step refused"))?;
        self.apply(next);
        Ok(next)
    }

    /// Finish the drag.
    pub fn end_drag(&mut self) -> Result<Viewport, GestureError> {
        if !matches!(self.state, GestureState::Dragging { .. }) {
            return Err(GestureError::NotActive);
        }
        self.finish()
    }

    /// Begin a marquee at the tracked pointer position.
    pub fn start_marquee(&mut self) -> Result<(), GestureError> {
        self.ensure_idle(GestureKind::Marquee)?;
        let start = self.current_point().ok_or(GestureError::NoPointer)?;
        tracing::debug!(?start, "marquee started");
        self.state = GestureState::Marqueeing {
            marquee: MarqueeBox::starting_at(start),
        };
        self.committed = false;
        Ok(())
    }

    /// Move the marquee's free corner to the tracked pointer position.
    pub fn update_marquee(&mut self) -> Result<(), GestureError> {
        let GestureState::Marqueeing { mut marquee } = self.state else {
            return Err(GestureError::NotActive);
        };
        marquee.end = self.current_point();
        self.state = GestureState::Marqueeing { marquee };
        let shown = marquee.is_complete().then_some(marquee);
        self.emit(Notification::MarqueeChanged(shown));
        Ok(())
    }

    /// Install the marquee rectangle as the new viewport.
    ///
    /// A marquee missing a corner or without area is cancelled: the box is
    /// cleared and the viewport stays unchanged.
    pub fn end_marquee(&mut self) -> Result<Viewport, GestureError> {
        let GestureState::Marqueeing { marquee } = self.state else {
            return Err(GestureError::NotActive);
        };
        self.state = GestureState::Idle;
        if marquee.is_complete() {
            self.emit(Notification::MarqueeChanged(None));
        }
        let next = match marquee_viewport(&marquee, self.config.min_extent) {
            Ok(next) => next,
            Err(err) => {
                tracing::debug!(?marquee, %err, "marquee cancelled");
                self.committed = false;
                return Err(err);
            }
        };
        self.apply(next);
        self.committed = false;
        tracing::debug!(viewport = ?next, "marquee applied");
        self.emit(Notification::ViewportChangeEnd(next));
        Ok(next)
    }

    /// Zoom one step about `midpoint`; `ratio > 1` zooms in.
    pub fn zoom(&mut self, midpoint: Point, ratio: f64) -> Result<Viewport, GestureError> {
        self.ensure_idle(GestureKind::Zoom)?;
        let next = self.zoomed(midpoint, ratio)?;
        self.emit(Notification::ViewportChangeStart);
        self.apply(next);
        self.committed = false;
        self.emit(Notification::ViewportChangeEnd(next));
        Ok(next)
    }

    /// Zoom one step about the data point displayed at `position`.
    pub fn zoom_at(
        &mut self,
        position: ElementPoint,
        bounds: Bounds,
        ratio: f64,
    ) -> Result<Viewport, GestureError> {
        let midpoint = self.track_pointer(position, bounds)?;
        self.zoom(midpoint, ratio)
    }

    /// Begin a two-finger gesture.
    pub fn pinch_start(
        &mut self,
        touches: [ElementPoint; 2],
        bounds: Bounds,
    ) -> Result<(), GestureError> {
        self.ensure_idle(GestureKind::Pinch)?;
        let [a, b] = touches;
        let anchor = self.plot_point(a.midpoint(b), bounds)?;
        let first_distance = finite_distance(a, b)?;
        tracing::debug!(?anchor, first_distance, "pinch started");
        self.state = GestureState::Pinching(PinchState {
            first_touches: touches,
            first_distance,
            last_distance: None,
            anchor,
        });
        self.committed = false;
        self.emit(Notification::ViewportChangeStart);
        Ok(())
    }

    /// Apply a two-finger move as either a pan or a zoom.
    ///
    /// The previous distance is updated even when the resulting zoom is
    /// refused, since it tracks the fingers rather than the viewport. After
    /// an applied zoom the pan anchor moves to the new finger midpoint, so a
    /// following pan continues from where the fingers are.
    pub fn pinch_change(
        &mut self,
        touches: [ElementPoint; 2],
        bounds: Bounds,
    ) -> Result<PinchGesture, GestureError> {
        let GestureState::Pinching(mut pinch) = self.state else {
            return Err(GestureError::NotActive);
        };
        let [a, b] = touches;
        let midpoint = self.plot_point(a.midpoint(b), bounds)?;
        let distance = finite_distance(a, b)?;
        let gesture = classify_pinch(
            distance,
            pinch.first_distance,
            pinch.last_distance,
            self.config.pinch_tolerance,
        );
        pinch.last_distance = Some(distance);
        self.state = GestureState::Pinching(pinch);
        tracing::trace!(?gesture, distance, "pinch classified");

        let next = match gesture {
            PinchGesture::Pan => {
                pan_viewport(self.viewport, pinch.anchor, midpoint, self.config.min_extent)
                    .inspect_err(|err| tracing::debug!(?midpoint, %err, "pinch pan refused"))?
            }
            PinchGesture::Zoom { ratio } => {
                let next = self.zoomed(midpoint, ratio)?;
                pinch.anchor = midpoint;
                self.state = GestureState::Pinching(pinch);
                next
            }
        };
        self.apply(next);
        Ok(gesture)
    }

    /// Begin a one-finger pan.
    pub fn pan_start(&mut self, position: ElementPoint, bounds: Bounds) -> Result<(), GestureError> {
        self.ensure_idle(GestureKind::Pan)?;
        let anchor = self.plot_point(position, bounds)?;
        tracing::debug!(?anchor, "touch pan started");
        self.state = GestureState::Panning { anchor };
        self.committed = false;
        self.emit(Notification::ViewportChangeStart);
        Ok(())
    }

    /// Move the viewport so the original touch point sits under the finger.
    pub fn pan_change(
        &mut self,
        position: ElementPoint,
        bounds: Bounds,
    ) -> Result<Viewport, GestureError> {
        let GestureState::Panning { anchor } = self.state else {
            return Err(GestureError::NotActive);
        };
        let current = self.plot_point(position, bounds)?;
        let next = pan_viewport(self.viewport, anchor, current, self.config.min_extent)
            .inspect_err(|err| tracing::debug!(?current, %err, "touch pan refused"))?;
        self.apply(next);
        Ok(next)
    }

    /// Finish a touch gesture.
    pub fn touch_end(&mut self) -> Result<Viewport, GestureError> {
        if !matches!(
            self.state,
            GestureState::Pinching(_) | GestureState::Panning { .. }
        ) {
            return Err(GestureError::NotActive);
        }
        self.finish()
    }

    /// Abandon the gesture in progress.
    ///
    /// Reports the viewport as final only if the gesture already moved it.
    pub fn cancel(&mut self) {
        let previous = mem::take(&mut self.state);
        if previous == GestureState::Idle {
            return;
        }
        tracing::debug!(gesture = ?previous.kind(), committed = self.committed, "gesture cancelled");
        if let GestureState::Marqueeing { marquee } = previous
            && marquee.is_complete()
        {
            self.emit(Notification::MarqueeChanged(None));
        }
        if mem::take(&mut self.committed) {
            self.emit(Notification::ViewportChangeEnd(self.viewport));
        }
    }

    /// Dispatch one normalized input event on the current gesture state.
    pub fn handle(&mut self, event: &InputEvent) -> Result<(), GestureError> {
        tracing::trace!(kind = ?event.kind, state = ?self.state.kind(), "input event");
        match event.kind {
            InputKind::ModifiersChanged => self.set_mode(self.mode_for(event.modifiers)),
            InputKind::PointerDown => {
                self.track_pointer(event.position, event.bounds)?;
                let mode = self.mode_for(event.modifiers);
                self.set_mode(mode)?;
                match mode {
                    PointerMode::Pan => self.start_drag(),
                    PointerMode::Marquee => self.start_marquee(),
                }
            }
            InputKind::PointerMove => {
                self.track_pointer(event.position, event.bounds)?;
                match self.state {
                    GestureState::Dragging { .. } => self.update_drag().map(drop),
                    GestureState::Marqueeing { .. } => self.update_marquee(),
                    _ => Ok(()),
                }
            }
            InputKind::PointerUp => match self.state {
                GestureState::Dragging { .. } => self.end_drag().map(drop),
                GestureState::Marqueeing { .. } => self.end_marquee().map(drop),
                _ => Err(GestureError::NotActive),
            },
            InputKind::Wheel { ratio } => {
                self.zoom_at(event.position, event.bounds, ratio).map(drop)
            }
            InputKind::TouchStart(Touches::One(position)) => self.pan_start(position, event.bounds),
            InputKind::TouchStart(Touches::Two(a, b)) => self.pinch_start([a, b], event.bounds),
            InputKind::TouchMove(Touches::One(position)) => {
                self.pan_change(position, event.bounds).map(drop)
            }
            InputKind::TouchMove(Touches::Two(a, b)) => {
                self.pinch_change([a, b], event.bounds).map(drop)
            }
            InputKind::TouchEnd => self.touch_end().map(drop),
            InputKind::Interrupt => {
                self.cancel();
                Ok(())
            }
        }
    }

    /// Apply the newest viewport published by another linked engine.
    ///
    /// Returns true if the viewport changed. Updates arriving mid-gesture are
    /// skipped.
    pub fn sync_link(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        let Some(link) = self.link.as_mut() else {
            return false;
        };
        let options = link.options;
        let Some(update) = link.take_foreign_update() else {
            return false;
        };
        let next = update.apply_to(self.viewport, options);
        if next == self.viewport || !next.has_min_extent(self.config.min_extent) {
            return false;
        }
        tracing::debug!(viewport = ?next, "linked viewport applied");
        self.viewport = next;
        self.emit(Notification::ViewportChanged(next));
        true
    }

    fn ensure_idle(&self, requested: GestureKind) -> Result<(), GestureError> {
        match self.state.kind() {
            None => Ok(()),
            Some(active) => {
                tracing::debug!(?active, ?requested, "gesture conflict");
                Err(GestureError::GestureConflict { active, requested })
            }
        }
    }

    fn plot_point(&self, position: ElementPoint, bounds: Bounds) -> Result<Point, GestureError> {
        if !position.is_finite() {
            return Err(GestureError::InvalidPosition);
        }
        let transform = Transform::new(self.viewport, bounds).ok_or(if bounds.is_valid() {
            GestureError::DegenerateViewport
        } else {
            GestureError::InvalidBounds
        })?;
        let point = transform.element_to_plot(position);
        if !point.is_finite() {
            return Err(GestureError::InvalidPosition);
        }
        Ok(point)
    }

    fn zoomed(&self, midpoint: Point, ratio: f64) -> Result<Viewport, GestureError> {
        compute_zoom(
            midpoint,
            self.viewport,
            ratio,
            self.config.zoom_amount,
            self.config.min_extent,
        )
        .inspect_err(|err| tracing::debug!(ratio, %err, "zoom refused"))
    }

    fn apply(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.committed = true;
        self.emit(Notification::ViewportChanged(viewport));
    }

    fn finish(&mut self) -> Result<Viewport, GestureError> {
        let previous = mem::take(&mut self.state);
        self.committed = false;
        tracing::debug!(gesture = ?previous.kind(), viewport = ?self.viewport, "gesture finished");
        self.emit(Notification::ViewportChangeEnd(self.viewport));
        Ok(self.viewport)
    }

    fn emit(&mut self, notification: Notification) {
        for (_, observer) in &mut self.observers {
            observer.notify(&notification);
        }
        if let (Notification::ViewportChangeEnd(viewport), Some(link)) =
            (notification, self.link.as_ref())
        {
            link.publish(viewport);
        }
    }
}

fn finite_distance(a: ElementPoint, b: ElementPoint) -> Result<f64, GestureError> {
    let distance = a.distance(b);
    if distance.is_finite() {
        Ok(distance)
    } else {
        Err(GestureError::InvalidPosition)
    }
}
