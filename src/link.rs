//! Viewport sharing between plots stacked on the same dashboard.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::geom::Point;
use crate::view::Viewport;

const LINK_EPSILON: f64 = 1e-9;

/// Member identifier inside a viewport link group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkMemberId(u64);

/// Which axes a linked engine shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkOptions {
    /// Share the domain (time) axis.
    pub link_domain: bool,
    /// Share the range (value) axis.
    pub link_range: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            link_domain: true,
            link_range: false,
        }
    }
}

/// Shared group used to synchronize committed viewports between engines.
///
/// Members publish after every finished gesture and pull the newest update
/// from other members with [`ViewportEngine::sync_link`](crate::ViewportEngine::sync_link).
#[derive(Debug, Clone, Default)]
pub struct ViewportLinkGroup {
    inner: Arc<RwLock<LinkGroupState>>,
}

impl ViewportLinkGroup {
    /// Create an empty link group.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, LinkGroupState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LinkGroupState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn register_member(&self) -> LinkMemberId {
        let mut state = self.write();
        state.next_member_id = state.next_member_id.wrapping_add(1);
        LinkMemberId(state.next_member_id)
    }

    pub(crate) fn publish(&self, source: LinkMemberId, viewport: Viewport, options: LinkOptions) {
        if !options.link_domain && !options.link_range {
            return;
        }
        let mut state = self.write();
        if let Some(current) = state.update
            && current.source == source
            && current.options == options
            && viewport_approx_eq(current.viewport, viewport)
        {
            return;
        }
        let seq = state.next_seq();
        state.update = Some(LinkUpdate {
            seq,
            source,
            viewport,
            options,
        });
    }

    pub(crate) fn latest_update(&self) -> Option<LinkUpdate> {
        self.read().update
    }
}

#[derive(Debug, Default)]
struct LinkGroupState {
    next_member_id: u64,
    next_seq: u64,
    update: Option<LinkUpdate>,
}

impl LinkGroupState {
    fn next_seq(&mut self) -> u64 {
        self.next_seq = self.next_seq.wrapping_add(1);
        self.next_seq
    }
}

/// An engine's membership in a link group.
#[derive(Debug, Clone)]
pub(crate) struct LinkBinding {
    pub(crate) group: ViewportLinkGroup,
    pub(crate) member_id: LinkMemberId,
    pub(crate) options: LinkOptions,
    pub(crate) last_seen: u64,
}

impl LinkBinding {
    pub(crate) fn new(group: ViewportLinkGroup, options: LinkOptions) -> Self {
        Self {
            member_id: group.register_member(),
            group,
            options,
            last_seen: 0,
        }
    }

    pub(crate) fn publish(&self, viewport: Viewport) {
        self.group.publish(self.member_id, viewport, self.options);
    }

    /// Take the newest update from another member, if not seen yet.
    pub(crate) fn take_foreign_update(&mut self) -> Option<LinkUpdate> {
        let update = self.group.latest_update()?;
        if update.seq == self.last_seen {
            return None;
        }
        self.last_seen = update.seq;
        (update.source != self.member_id).then_some(update)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LinkUpdate {
    pub(crate) seq: u64,
    pub(crate) source: LinkMemberId,
    pub(crate) viewport: Viewport,
    pub(crate) options: LinkOptions,
}

impl LinkUpdate {
    /// Merge the shared axes of this update into `local`.
    ///
    /// Only axes both sides link are copied.
    pub(crate) fn apply_to(&self, local: Viewport, options: LinkOptions) -> Viewport {
        let mut next = local;
        if self.options.link_domain && options.link_domain {
            next.top_left.domain = self.viewport.top_left.domain;
            next.bottom_right.domain = self.viewport.bottom_right.domain;
        }
        if self.options.link_range && options.link_range {
            next.top_left.range = self.viewport.top_left.range;
            next.bottom_right.range = self.viewport.bottom_right.range;
        }
        next
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= LINK_EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.domain, b.domain) && approx_eq(a.range, b.range)
}

fn viewport_approx_eq(a: Viewport, b: Viewport) -> bool {
    point_approx_eq(a.top_left, b.top_left) && point_approx_eq(a.bottom_right, b.bottom_right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(offset: f64) -> Viewport {
        Viewport::new(Point::new(offset, 1.0), Point::new(offset + 10.0, -1.0))
    }

    #[test]
    fn publish_deduplicates_same_payload() {
        let group = ViewportLinkGroup::new();
        let member = group.register_member();

        group.publish(member, viewport(0.0), LinkOptions::default());
        let first = group.latest_update().expect("link update");
        group.publish(member, viewport(0.0), LinkOptions::default());
        let second = group.latest_update().expect("link update");

        assert_eq!(first.seq, second.seq);
    }

    #[test]
    fn foreign_updates_are_taken_once() {
        let group = ViewportLinkGroup::new();
        let mut a = LinkBinding::new(group.clone(), LinkOptions::default());
        let mut b = LinkBinding::new(group, LinkOptions::default());

        a.publish(viewport(5.0));
        assert!(a.take_foreign_update().is_none());
        let update = b.take_foreign_update().expect("update from a");
        assert_eq!(update.source, a.member_id);
        assert!(b.take_foreign_update().is_none());
    }

    #[test]
    fn apply_copies_only_linked_axes() {
        let update = LinkUpdate {
            seq: 1,
            source: LinkMemberId(1),
            viewport: Viewport::new(Point::new(100.0, 50.0), Point::new(200.0, 40.0)),
            options: LinkOptions {
                link_domain: true,
                link_range: true,
            },
        };
        let merged = update.apply_to(viewport(0.0), LinkOptions::default());
        assert_eq!(merged.top_left, Point::new(100.0, 1.0));
        assert_eq!(merged.bottom_right, Point::new(200.0, -1.0));
    }
}
