// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for platform integrations.
//!
//! The controllers never touch a DOM directly. A *host* (the web backend in
//! practice, fakes in tests) provides:
//!
//! - **Elements**: [`HostElement`] handles for the class list, inline
//!   style, the id attribute, and the bounding box.
//! - **Observers**: an [`ObserverSet`] of intersection observers, one per
//!   threshold, that the trigger controller attaches elements to.
//! - **Scroll loop**: a [`ScrollLoop`] that the parallax controller starts
//!   when its first node arrives and stops when its last node leaves. While
//!   running it feeds scroll, resize, and animation-frame events back into
//!   the [`EventHorizon`](crate::EventHorizon).
//! - **Viewport samples**: a [`Viewport`] read at the time of each event.
//!
//! # Event flow
//!
//! ```text
//!   binder ── register / unregister ──► EventHorizon
//!                                        │        │
//!               ┌────────────────────────┘        └──────────────┐
//!               ▼                                                ▼
//!   TriggerController ──observe──► ObserverSet      ParallaxController ──start/stop──► ScrollLoop
//!               ▲                       │                        ▲                         │
//!               └── on_visibility_change┘                        └─ on_scroll/on_resize/on_frame
//! ```
//!
//! [`Backend`] bundles the associated types so generic code names one
//! parameter instead of four.

use kurbo::Rect;

use crate::id::NodeId;

/// A non-owning handle to a page element.
///
/// Handles are cheap to clone and compare by element identity. All methods
/// take `&self`; the page owns the element and mutation goes through it.
pub trait HostElement: Clone + PartialEq {
    /// Reads the [`NodeId`] stored in the element's id attribute.
    fn node_id(&self) -> Option<NodeId>;

    /// Stores `id` in the element's id attribute.
    fn set_node_id(&self, id: NodeId);

    /// The element's border box relative to the viewport.
    fn bounding_rect(&self) -> Rect;

    /// Adds a class to the element's class list.
    fn add_class(&self, class: &str);

    /// Removes a class from the element's class list.
    fn remove_class(&self, class: &str);

    /// Sets an inline style property.
    fn set_style(&self, property: &str, value: &str);
}

/// One intersection observer per threshold, addressed by threshold index.
pub trait ObserverSet<E> {
    /// Starts delivering visibility changes for `element` at `threshold`.
    fn observe(&mut self, threshold: usize, element: &E);

    /// Stops delivering visibility changes for `element` at `threshold`.
    fn unobserve(&mut self, threshold: usize, element: &E);
}

/// The scroll/resize listeners and animation-frame loop.
pub trait ScrollLoop {
    /// Attaches listeners and requests the first frame.
    fn start(&mut self);

    /// Removes listeners and cancels the pending frame.
    fn stop(&mut self);
}

/// The host types an [`EventHorizon`](crate::EventHorizon) is built over.
pub trait Backend {
    /// Element handle type.
    type Element: HostElement;
    /// Intersection observer set.
    type Observers: ObserverSet<Self::Element>;
    /// Scroll/frame loop.
    type Loop: ScrollLoop;
    /// User callback invoked on visibility changes. The controllers only
    /// store and hand back clones; invoking it is the host's business.
    type Callback: Clone;
}

/// Document scroll offset and viewport height, sampled by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Vertical scroll offset of the document.
    pub scroll_y: f64,
    /// Height of the layout viewport.
    pub height: f64,
}

impl Viewport {
    /// Creates a viewport sample.
    #[must_use]
    pub const fn new(scroll_y: f64, height: f64) -> Self {
        Self { scroll_y, height }
    }
}

/// One visibility change delivered by a threshold observer.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityEntry<E> {
    /// The observed element.
    pub target: E,
    /// Whether the element now intersects the threshold's root.
    pub is_intersecting: bool,
    /// The element's bounding box at the time of the change.
    pub bounding_rect: Rect,
}
