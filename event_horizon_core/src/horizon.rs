// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The context object that owns both controllers.
//!
//! [`EventHorizon`] is the single entry point a host talks to. It allocates
//! [`NodeId`]s, routes registrations to the trigger or parallax controller,
//! and throttles scroll and resize events before they reach the parallax
//! controller.
//!
//! The context owns no timers. Throttled entry points return the deadline at
//! which the host must call back ([`on_scroll_timer`], [`on_resize_timer`]),
//! or the host can drive both throttles from its own clock with [`poll`].
//!
//! [`on_scroll_timer`]: EventHorizon::on_scroll_timer
//! [`on_resize_timer`]: EventHorizon::on_resize_timer
//! [`poll`]: EventHorizon::poll

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::host::{Backend, Viewport, VisibilityEntry};
use crate::id::{IdAllocator, NodeId};
use crate::options::{EffectKind, EffectOptions, Modifiers};
use crate::parallax::ParallaxController;
use crate::threshold::Thresholds;
use crate::throttle::{Call, LeadingEdge, Throttle};
use crate::time::{Duration, FrameTick, HostTime};
use crate::trace::Tracer;
use crate::trigger::{Notification, TriggerController};

/// Tunables for an [`EventHorizon`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HorizonConfig {
    /// Number of visibility thresholds, within `1..=64`.
    pub event_horizons: usize,
    /// Trailing window of the scroll throttle.
    pub scroll_delay: Duration,
    /// Trailing window of the resize throttle.
    pub resize_delay: Duration,
}

impl HorizonConfig {
    /// Five thresholds, 10 ms scroll window, 100 ms resize window.
    #[must_use]
    pub const fn web() -> Self {
        Self {
            event_horizons: 5,
            scroll_delay: Duration::from_millis(10),
            resize_delay: Duration::from_millis(100),
        }
    }

    /// Returns a copy with a different threshold count.
    #[must_use]
    pub const fn with_event_horizons(mut self, event_horizons: usize) -> Self {
        self.event_horizons = event_horizons;
        self
    }
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self::web()
    }
}

/// Vertical scroll direction, the gating state of the scroll throttle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Scroll offset increased or stayed put.
    Down,
    /// Scroll offset decreased.
    Up,
}

/// Everything needed to register one element.
#[derive(Clone, Debug)]
pub struct Registration<E, C> {
    /// Which controller tracks the element.
    pub kind: EffectKind,
    /// The element.
    pub element: E,
    /// Parallax tracks and range end. Ignored for triggers.
    pub options: EffectOptions,
    /// Trigger modifiers. Ignored for parallax.
    pub modifiers: Modifiers,
    /// Visibility callback. Ignored for parallax.
    pub callback: Option<C>,
    /// Threshold at which the enter callback fires.
    pub callback_threshold: f64,
}

impl<E, C> Registration<E, C> {
    /// A trigger registration with no modifiers and no callback.
    #[must_use]
    pub fn trigger(element: E) -> Self {
        Self {
            kind: EffectKind::Trigger,
            element,
            options: EffectOptions::new(),
            modifiers: Modifiers::default(),
            callback: None,
            callback_threshold: 0.0,
        }
    }

    /// A parallax registration.
    #[must_use]
    pub fn parallax(element: E, options: EffectOptions) -> Self {
        Self {
            kind: EffectKind::Parallax,
            element,
            options,
            modifiers: Modifiers::default(),
            callback: None,
            callback_threshold: 0.0,
        }
    }

    /// Sets the trigger modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Sets the visibility callback and the threshold its enter edge fires
    /// at.
    #[must_use]
    pub fn with_callback(mut self, callback: C, callback_threshold: f64) -> Self {
        self.callback = Some(callback);
        self.callback_threshold = callback_threshold;
        self
    }
}

/// What [`EventHorizon::update`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The id is not registered.
    Unknown,
    /// Options were equal, or the node has no options to change.
    Unchanged,
    /// Parallax options were replaced in place.
    Reconfigured,
    /// Options were cleared, so the node was unregistered.
    Unregistered,
}

/// Owns the trigger and parallax controllers and routes host events to them.
pub struct EventHorizon<B: Backend> {
    config: HorizonConfig,
    ids: IdAllocator,
    kinds: HashMap<NodeId, EffectKind>,
    trigger: TriggerController<B::Element, B::Observers, B::Callback>,
    parallax: ParallaxController<B::Element, B::Loop>,
    scroll: Throttle<ScrollDirection, f64>,
    resize: Throttle<(), ()>,
    last_scroll_y: Option<f64>,
}

impl<B: Backend> core::fmt::Debug for EventHorizon<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventHorizon")
            .field("config", &self.config)
            .field("trigger_nodes", &self.trigger.len())
            .field("parallax_nodes", &self.parallax.len())
            .field("last_scroll_y", &self.last_scroll_y)
            .finish_non_exhaustive()
    }
}

impl<B: Backend> EventHorizon<B> {
    /// Creates a context over the host's observers and scroll loop.
    ///
    /// `observers` must hold one observer per threshold of
    /// [`Thresholds::evenly_spaced`]`(config.event_horizons)`, in order.
    ///
    /// # Panics
    ///
    /// Panics if `config.event_horizons` is outside `1..=64`.
    #[must_use]
    pub fn new(config: HorizonConfig, observers: B::Observers, scroll_loop: B::Loop) -> Self {
        let thresholds = Thresholds::evenly_spaced(config.event_horizons);
        Self {
            config,
            ids: IdAllocator::default(),
            kinds: HashMap::new(),
            trigger: TriggerController::new(thresholds, observers),
            parallax: ParallaxController::new(scroll_loop),
            scroll: Throttle::new(config.scroll_delay, LeadingEdge::Always),
            resize: Throttle::new(config.resize_delay, LeadingEdge::Never),
            last_scroll_y: None,
        }
    }

    /// The configuration this context was built with.
    #[must_use]
    pub fn config(&self) -> &HorizonConfig {
        &self.config
    }

    /// The trigger controller.
    #[must_use]
    pub fn trigger(&self) -> &TriggerController<B::Element, B::Observers, B::Callback> {
        &self.trigger
    }

    /// The parallax controller.
    #[must_use]
    pub fn parallax(&self) -> &ParallaxController<B::Element, B::Loop> {
        &self.parallax
    }

    /// The controller `id` is registered with.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<EffectKind> {
        self.kinds.get(&id).copied()
    }

    /// Number of registered nodes across both controllers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Registers an element and returns its id.
    ///
    /// Registering an element that is already tracked by the same controller
    /// replaces its descriptor and returns the existing id.
    pub fn register(
        &mut self,
        registration: Registration<B::Element, B::Callback>,
        viewport: Viewport,
        tracer: &mut Tracer<'_>,
    ) -> NodeId {
        let Registration {
            kind,
            element,
            options,
            modifiers,
            callback,
            callback_threshold,
        } = registration;

        let id = match kind {
            EffectKind::Trigger => self
                .trigger
                .find(&element)
                .unwrap_or_else(|| self.ids.allocate()),
            EffectKind::Parallax => self
                .parallax
                .find(&element)
                .unwrap_or_else(|| self.ids.allocate()),
        };

        match kind {
            EffectKind::Trigger => {
                let _ = self.trigger.observe_node(
                    id,
                    element,
                    modifiers,
                    callback,
                    callback_threshold,
                    tracer,
                );
            }
            EffectKind::Parallax => {
                let _ = self
                    .parallax
                    .observe_node(id, element, options, viewport, tracer);
            }
        }
        self.kinds.insert(id, kind);
        id
    }

    /// Unregisters `id`. Unknown ids are a no-op returning `false`.
    ///
    /// Pending scroll and resize flushes are dropped once no parallax node
    /// remains.
    pub fn unregister(&mut self, id: NodeId, tracer: &mut Tracer<'_>) -> bool {
        let Some(kind) = self.kinds.remove(&id) else {
            return false;
        };
        match kind {
            EffectKind::Trigger => self.trigger.unobserve_node(id, tracer),
            EffectKind::Parallax => {
                let removed = self.parallax.unobserve_node(id, tracer);
                if self.parallax.is_empty() {
                    self.scroll.cancel();
                    self.resize.cancel();
                }
                removed
            }
        }
    }

    /// Applies new options from the binder's update hook.
    ///
    /// Equal options are a no-op. `None` unregisters the node. Changed
    /// parallax options are applied in place.
    pub fn update(
        &mut self,
        id: NodeId,
        options: Option<EffectOptions>,
        viewport: Viewport,
        tracer: &mut Tracer<'_>,
    ) -> UpdateOutcome {
        let Some(kind) = self.kind(id) else {
            return UpdateOutcome::Unknown;
        };
        let Some(options) = options else {
            let _ = self.unregister(id, tracer);
            return UpdateOutcome::Unregistered;
        };
        if kind == EffectKind::Trigger || self.parallax.options(id) == Some(&options) {
            return UpdateOutcome::Unchanged;
        }
        let _ = self.parallax.reconfigure(id, options, viewport, tracer);
        UpdateOutcome::Reconfigured
    }

    /// Re-adds the recorded threshold classes of a trigger node.
    pub fn restore_classes(&self, id: NodeId) -> bool {
        self.trigger.restore_classes(id)
    }

    /// Forwards a batch of visibility changes to the trigger controller.
    ///
    /// The returned callbacks must be invoked by the caller, after any
    /// borrow of the context has been released.
    pub fn on_visibility_change(
        &mut self,
        threshold_index: usize,
        entries: impl IntoIterator<Item = VisibilityEntry<B::Element>>,
        tracer: &mut Tracer<'_>,
    ) -> Vec<Notification<B::Element, B::Callback>> {
        self.trigger
            .on_visibility_change(threshold_index, entries, tracer)
    }

    /// Handles a scroll event.
    ///
    /// Progress is updated right away on the leading edge. Returns the
    /// deadline for the trailing flush when the host must (re)arm its scroll
    /// timer, or `None` when an already armed timer stays valid.
    pub fn on_scroll(
        &mut self,
        now: HostTime,
        viewport: Viewport,
        tracer: &mut Tracer<'_>,
    ) -> Option<HostTime> {
        let scroll_y = viewport.scroll_y;
        let direction = match self.last_scroll_y {
            Some(last) if scroll_y < last => ScrollDirection::Up,
            _ => ScrollDirection::Down,
        };
        self.last_scroll_y = Some(scroll_y);

        match self.scroll.call(now, direction, scroll_y) {
            Call::Coalesced => None,
            Call::Scheduled { leading, deadline } => {
                if let Some((_, scroll_y)) = leading {
                    self.parallax.update_progress(scroll_y, tracer);
                }
                Some(deadline)
            }
        }
    }

    /// The scroll timer fired: flushes the latest scroll offset.
    pub fn on_scroll_timer(&mut self, tracer: &mut Tracer<'_>) {
        if let Some((_, scroll_y)) = self.scroll.flush() {
            self.parallax.update_progress(scroll_y, tracer);
        }
    }

    /// Handles a resize event. Returns the deadline for the trailing flush
    /// when the host must (re)arm its resize timer.
    pub fn on_resize(&mut self, now: HostTime) -> Option<HostTime> {
        match self.resize.call(now, (), ()) {
            Call::Coalesced => None,
            Call::Scheduled { deadline, .. } => Some(deadline),
        }
    }

    /// The resize timer fired: recomputes every range against `viewport`,
    /// then progress at its scroll offset.
    pub fn on_resize_timer(&mut self, viewport: Viewport, tracer: &mut Tracer<'_>) {
        if self.resize.flush().is_some() {
            self.relayout(viewport, tracer);
        }
    }

    /// Flushes whichever throttle is due at `now`.
    ///
    /// For hosts that drive time themselves instead of arming timers.
    pub fn poll(&mut self, now: HostTime, viewport: Viewport, tracer: &mut Tracer<'_>) {
        if let Some((_, scroll_y)) = self.scroll.poll(now) {
            self.parallax.update_progress(scroll_y, tracer);
        }
        if self.resize.poll(now).is_some() {
            self.relayout(viewport, tracer);
        }
    }

    /// Runs the per-frame style pass.
    pub fn on_frame(&mut self, tick: FrameTick, tracer: &mut Tracer<'_>) {
        self.parallax.tick(tick, tracer);
    }

    fn relayout(&mut self, viewport: Viewport, tracer: &mut Tracer<'_>) {
        self.parallax.update_all_ranges(viewport, tracer);
        self.parallax.update_progress(viewport.scroll_y, tracer);
    }
}
