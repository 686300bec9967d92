// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-threshold visibility tracking.
//!
//! The [`TriggerController`] attaches every trigger element to one observer
//! per threshold. Each (element, threshold) pair is a two-state machine,
//! `Outside` and `Intersecting`, driven by edge-triggered visibility changes:
//!
//! ```text
//!            enter: add `trigger-<t>`
//!   Outside ─────────────────────────► Intersecting
//!      ▲                                    │
//!      └────────────────────────────────────┘
//!            exit: remove `trigger-<t>`
//!            (kept if the element left through the viewport top,
//!             unless `cleanup` is set)
//! ```
//!
//! With `once`, the first enter detaches the element from that threshold's
//! observer, so the class stays for good.
//!
//! User callbacks are not invoked here. [`on_visibility_change`] returns them
//! as [`Notification`]s so the host can call out after its own borrow of the
//! controller has ended.
//!
//! [`on_visibility_change`]: TriggerController::on_visibility_change

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::host::{HostElement, ObserverSet, VisibilityEntry};
use crate::id::NodeId;
use crate::options::{EffectKind, Modifiers};
use crate::threshold::{ThresholdSet, Thresholds};
use crate::trace::{NodeAction, NodeEvent, ThresholdEvent, Tracer, Transition};

/// A callback the host must invoke with `(element, visible)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Notification<E, C> {
    /// The user callback.
    pub callback: C,
    /// The element the callback is about.
    pub element: E,
    /// `true` on enter, `false` on exit.
    pub visible: bool,
}

#[derive(Debug)]
struct TriggerNode<E, C> {
    element: E,
    modifiers: Modifiers,
    callback: Option<C>,
    callback_threshold: f64,
    /// Thresholds whose class is currently applied.
    applied: ThresholdSet,
    /// Thresholds this element was detached from by `once`.
    detached: ThresholdSet,
}

/// Tracks trigger elements against a fixed set of thresholds.
#[derive(Debug)]
pub struct TriggerController<E, O, C> {
    thresholds: Thresholds,
    observers: O,
    nodes: HashMap<NodeId, TriggerNode<E, C>>,
}

impl<E, O, C> TriggerController<E, O, C>
where
    E: HostElement,
    O: ObserverSet<E>,
    C: Clone,
{
    /// Creates a controller over `observers`, which must hold one observer
    /// per entry of `thresholds`, in the same order.
    #[must_use]
    pub fn new(thresholds: Thresholds, observers: O) -> Self {
        Self {
            thresholds,
            observers,
            nodes: HashMap::new(),
        }
    }

    /// The configured thresholds.
    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// The observer set.
    #[must_use]
    pub fn observers(&self) -> &O {
        &self.observers
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Finds the id `element` is registered under.
    ///
    /// The element's id attribute is only a hint: an attribute copied onto
    /// another element does not match.
    #[must_use]
    pub fn find(&self, element: &E) -> Option<NodeId> {
        if let Some(id) = element.node_id()
            && self.nodes.get(&id).is_some_and(|n| n.element == *element)
        {
            return Some(id);
        }
        self.nodes
            .iter()
            .find(|(_, n)| n.element == *element)
            .map(|(id, _)| *id)
    }

    /// Registers `element` under `id` and attaches it to every observer.
    ///
    /// If `id` is already registered, the previous element is detached first
    /// and the descriptor replaced. Classes already applied to the same
    /// element stay recorded. Returns `true` if a descriptor was replaced.
    pub fn observe_node(
        &mut self,
        id: NodeId,
        element: E,
        modifiers: Modifiers,
        callback: Option<C>,
        callback_threshold: f64,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let mut applied = ThresholdSet::EMPTY;
        let replaced = match self.nodes.remove(&id) {
            Some(previous) => {
                self.detach(&previous);
                if previous.element == element {
                    applied = previous.applied;
                }
                true
            }
            None => false,
        };

        element.set_node_id(id);
        for (index, _) in self.thresholds.iter() {
            self.observers.observe(index, &element);
        }
        self.nodes.insert(
            id,
            TriggerNode {
                element,
                modifiers,
                callback,
                callback_threshold,
                applied,
                detached: ThresholdSet::EMPTY,
            },
        );

        tracer.node(&NodeEvent {
            id,
            kind: EffectKind::Trigger,
            action: if replaced {
                NodeAction::Replaced
            } else {
                NodeAction::Observed
            },
        });
        replaced
    }

    /// Detaches the node from every observer and forgets it.
    ///
    /// Applied classes are left on the element so that outgoing transitions
    /// keyed on them can still run. Returns `false` for an unknown id.
    pub fn unobserve_node(&mut self, id: NodeId, tracer: &mut Tracer<'_>) -> bool {
        let Some(node) = self.nodes.remove(&id) else {
            return false;
        };
        self.detach(&node);
        tracer.node(&NodeEvent {
            id,
            kind: EffectKind::Trigger,
            action: NodeAction::Unobserved,
        });
        true
    }

    /// Handles a batch of visibility changes from the observer at
    /// `threshold_index`.
    ///
    /// Entries whose target carries no known id are ignored. Returns the
    /// callbacks to invoke, in entry order.
    pub fn on_visibility_change(
        &mut self,
        threshold_index: usize,
        entries: impl IntoIterator<Item = VisibilityEntry<E>>,
        tracer: &mut Tracer<'_>,
    ) -> Vec<Notification<E, C>> {
        let mut notifications = Vec::new();
        let (Some(threshold), Some(class)) = (
            self.thresholds.percent(threshold_index),
            self.thresholds.class(threshold_index),
        ) else {
            return notifications;
        };

        for entry in entries {
            let Some(id) = entry.target.node_id() else {
                continue;
            };
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };

            let transition = if node.detached.contains(threshold_index) {
                Transition::Detached
            } else if entry.is_intersecting {
                entry.target.add_class(class);
                node.applied.insert(threshold_index);
                if node.modifiers.once {
                    self.observers.unobserve(threshold_index, &entry.target);
                    node.detached.insert(threshold_index);
                }
                if let Some(callback) = &node.callback
                    && threshold == node.callback_threshold
                {
                    notifications.push(Notification {
                        callback: callback.clone(),
                        element: node.element.clone(),
                        visible: true,
                    });
                }
                Transition::Enter
            } else if !node.modifiers.cleanup && entry.bounding_rect.y1 <= 0.0 {
                Transition::SkippedPastViewport
            } else {
                entry.target.remove_class(class);
                node.applied.remove(threshold_index);
                if let Some(callback) = &node.callback
                    && threshold == 0.0
                {
                    notifications.push(Notification {
                        callback: callback.clone(),
                        element: node.element.clone(),
                        visible: false,
                    });
                }
                Transition::Exit
            };

            tracer.threshold(&ThresholdEvent {
                id,
                threshold,
                transition,
            });
        }
        notifications
    }

    /// Re-adds every class recorded as applied to the node's element.
    ///
    /// Hosts call this after something outside the controller rewrote the
    /// element's class list. Returns `false` for an unknown id.
    pub fn restore_classes(&self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        for index in node.applied.iter() {
            if let Some(class) = self.thresholds.class(index) {
                node.element.add_class(class);
            }
        }
        true
    }

    /// Thresholds whose class is currently applied to the node.
    #[must_use]
    pub fn applied(&self, id: NodeId) -> Option<ThresholdSet> {
        self.nodes.get(&id).map(|node| node.applied)
    }

    /// Class names currently applied to the node, in threshold order.
    #[must_use]
    pub fn applied_classes(&self, id: NodeId) -> Vec<&str> {
        let Some(node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        node.applied
            .iter()
            .filter_map(|index| self.thresholds.class(index))
            .collect()
    }

    fn detach(&mut self, node: &TriggerNode<E, C>) {
        for (index, _) in self.thresholds.iter() {
            if !node.detached.contains(index) {
                self.observers.unobserve(index, &node.element);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_host::{FakeElement, FakeObservers};
    use kurbo::Rect;

    type Controller = TriggerController<FakeElement, FakeObservers, &'static str>;

    fn controller() -> Controller {
        TriggerController::new(Thresholds::evenly_spaced(5), FakeObservers::default())
    }

    fn observe(
        c: &mut Controller,
        id: NodeId,
        el: &FakeElement,
        modifiers: Modifiers,
        callback: Option<&'static str>,
        callback_threshold: f64,
    ) -> bool {
        c.observe_node(
            id,
            el.clone(),
            modifiers,
            callback,
            callback_threshold,
            &mut Tracer::none(),
        )
    }

    fn entry(el: &FakeElement, is_intersecting: bool) -> VisibilityEntry<FakeElement> {
        VisibilityEntry {
            target: el.clone(),
            is_intersecting,
            bounding_rect: el.rect(),
        }
    }

    fn past_top(el: &FakeElement) -> VisibilityEntry<FakeElement> {
        VisibilityEntry {
            target: el.clone(),
            is_intersecting: false,
            bounding_rect: Rect::new(0.0, -300.0, 100.0, -20.0),
        }
    }

    #[test]
    fn observe_attaches_to_every_threshold_and_tags_element() {
        let mut c = controller();
        let el = FakeElement::new("hero", Rect::new(0.0, 800.0, 100.0, 900.0));
        let id = NodeId(7);
        assert!(!observe(&mut c, id, &el, Modifiers::default(), None, 0.0));

        assert_eq!(el.node_id(), Some(id));
        for index in 0..5 {
            assert!(c.observers().is_observing(index, &el), "threshold {index} must observe");
        }
        assert_eq!(c.observers().len(), 5);
    }

    #[test]
    fn classes_follow_intersecting_thresholds() {
        let mut c = controller();
        let el = FakeElement::new("card", Rect::new(0.0, 100.0, 100.0, 200.0));
        let id = NodeId(1);
        let _ = observe(&mut c, id, &el, Modifiers::default(), None, 0.0);

        for index in [0, 1] {
            let _ = c.on_visibility_change(index, [entry(&el, true)], &mut Tracer::none());
        }
        assert_eq!(el.classes(), ["trigger-0", "trigger-25"]);
        assert_eq!(c.applied_classes(id), ["trigger-0", "trigger-25"]);

        let _ = c.on_visibility_change(1, [entry(&el, false)], &mut Tracer::none());
        assert_eq!(el.classes(), ["trigger-0"]);
    }

    #[test]
    fn unknown_targets_are_ignored() {
        let mut c = controller();
        let stranger = FakeElement::new("stranger", Rect::ZERO);
        let out = c.on_visibility_change(0, [entry(&stranger, true)], &mut Tracer::none());
        assert!(out.is_empty(), "no callback for unknown element");
        assert!(stranger.classes().is_empty(), "unknown element must not be touched");

        stranger.set_node_id(NodeId(99));
        let _ = c.on_visibility_change(0, [entry(&stranger, true)], &mut Tracer::none());
        assert!(stranger.classes().is_empty(), "stale id must not resolve");
    }

    #[test]
    fn enter_callback_fires_at_callback_threshold_only() {
        let mut c = controller();
        let el = FakeElement::new("a", Rect::new(0.0, 100.0, 100.0, 200.0));
        let _ = observe(&mut c, NodeId(1), &el, Modifiers::default(), Some("cb"), 50.0);

        assert!(c.on_visibility_change(0, [entry(&el, true)], &mut Tracer::none()).is_empty());
        let out = c.on_visibility_change(2, [entry(&el, true)], &mut Tracer::none());
        assert_eq!(
            out,
            [Notification {
                callback: "cb",
                element: el.clone(),
                visible: true
            }]
        );
    }

    #[test]
    fn exit_callback_fires_at_baseline_only() {
        let mut c = controller();
        let el = FakeElement::new("a", Rect::new(0.0, 100.0, 100.0, 200.0));
        let _ = observe(&mut c, NodeId(1), &el, Modifiers::default(), Some("cb"), 50.0);

        assert!(c.on_visibility_change(2, [entry(&el, false)], &mut Tracer::none()).is_empty());
        let out = c.on_visibility_change(0, [entry(&el, false)], &mut Tracer::none());
        assert_eq!(out.len(), 1);
        assert!(!out[0].visible, "exit notifies with false");
    }

    #[test]
    fn scrolled_past_exit_keeps_class_without_cleanup() {
        let mut c = controller();
        let el = FakeElement::new("a", Rect::new(0.0, 100.0, 100.0, 200.0));
        let _ = observe(&mut c, NodeId(1), &el, Modifiers::default(), Some("cb"), 0.0);
        let _ = c.on_visibility_change(0, [entry(&el, true)], &mut Tracer::none());

        let out = c.on_visibility_change(0, [past_top(&el)], &mut Tracer::none());
        assert!(out.is_empty(), "skipped exit must not notify");
        assert_eq!(el.classes(), ["trigger-0"]);
    }

    #[test]
    fn cleanup_removes_class_when_scrolled_past() {
        let mut c = controller();
        let el = FakeElement::new("a", Rect::new(0.0, 100.0, 100.0, 200.0));
        let modifiers = Modifiers {
            once: false,
            cleanup: true,
        };
        let _ = observe(&mut c, NodeId(1), &el, modifiers, None, 0.0);
        let _ = c.on_visibility_change(0, [entry(&el, true)], &mut Tracer::none());
        let _ = c.on_visibility_change(0, [past_top(&el)], &mut Tracer::none());
        assert!(el.classes().is_empty(), "cleanup must remove the class");
    }

    #[test]
    fn once_detaches_and_ignores_later_entries() {
        let mut c = controller();
        let el = FakeElement::new("a", Rect::new(0.0, 100.0, 100.0, 200.0));
        let modifiers = Modifiers {
            once: true,
            cleanup: false,
        };
        let _ = observe(&mut c, NodeId(1), &el, modifiers, Some("cb"), 0.0);

        let first = c.on_visibility_change(0, [entry(&el, true)], &mut Tracer::none());
        assert_eq!(first.len(), 1);
        assert!(!c.observers().is_observing(0, &el), "once must detach threshold 0");
        assert!(c.observers().is_observing(1, &el), "other thresholds stay attached");

        // An entry already in flight when the observer let go.
        let late = c.on_visibility_change(
            0,
            [entry(&el, false), entry(&el, true)],
            &mut Tracer::none(),
        );
        assert!(late.is_empty(), "detached pair must not notify");
        assert_eq!(el.classes(), ["trigger-0"]);
    }

    #[test]
    fn unobserve_detaches_but_keeps_classes() {
        let mut c = controller();
        let el = FakeElement::new("a", Rect::new(0.0, 100.0, 100.0, 200.0));
        let _ = observe(&mut c, NodeId(1), &el, Modifiers::default(), None, 0.0);
        let _ = c.on_visibility_change(0, [entry(&el, true)], &mut Tracer::none());

        assert!(c.unobserve_node(NodeId(1), &mut Tracer::none()));
        assert!(!c.unobserve_node(NodeId(1), &mut Tracer::none()));
        assert_eq!(c.observers().len(), 0);
        assert_eq!(el.classes(), ["trigger-0"]);
        assert!(c.is_empty());
    }

    #[test]
    fn double_registration_replaces_without_duplicate_attachments() {
        let mut c = controller();
        let el = FakeElement::new("a", Rect::new(0.0, 100.0, 100.0, 200.0));
        let _ = observe(&mut c, NodeId(1), &el, Modifiers::default(), None, 0.0);
        let _ = c.on_visibility_change(3, [entry(&el, true)], &mut Tracer::none());

        assert!(observe(&mut c, NodeId(1), &el, Modifiers::default(), Some("new"), 0.0));
        assert_eq!(c.len(), 1);
        assert_eq!(c.observers().len(), 5);
        assert_eq!(c.applied_classes(NodeId(1)), ["trigger-75"]);
    }

    #[test]
    fn restore_classes_reapplies_recorded_set() {
        let mut c = controller();
        let el = FakeElement::new("a", Rect::new(0.0, 100.0, 100.0, 200.0));
        let _ = observe(&mut c, NodeId(1), &el, Modifiers::default(), None, 0.0);
        for index in [0, 1, 2] {
            let _ = c.on_visibility_change(index, [entry(&el, true)], &mut Tracer::none());
        }

        el.clear_classes();
        assert!(c.restore_classes(NodeId(1)));
        assert_eq!(el.classes(), ["trigger-0", "trigger-25", "trigger-50"]);
        assert!(!c.restore_classes(NodeId(2)));
    }
}
